// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clusterlogging::config::Config;
use clusterlogging::forwarder::{pull, ClusterLogForwarderBuilder};
use clusterlogging::kubernetes::wait_for_forwarder_crd;
use clusterlogging::types::ClusterLogForwarder;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: forwarder={}/{}",
        config.namespace, config.name
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for ClusterLogForwarder CRD to become available...");
    wait_for_forwarder_crd(&client).await?;

    let forwarder = match &config.manifest {
        Some(path) => apply(client, &config, path).await?,
        None => pull(client, &config.name, &config.namespace).await?,
    };

    print!("{}", serde_yaml::to_string(&forwarder)?);
    Ok(())
}

/// Create the forwarder from a manifest, or update it if it already exists
async fn apply(client: Client, config: &Config, path: &std::path::Path) -> Result<ClusterLogForwarder> {
    let manifest = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let mut definition: ClusterLogForwarder = serde_yaml::from_str(&manifest)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    definition
        .metadata
        .namespace
        .get_or_insert_with(|| config.namespace.clone());

    let mut builder = ClusterLogForwarderBuilder::from_definition(client, definition)?
        .with_recreate_timeout(config.wait_timeout);
    if builder.exists().await {
        let outcome = builder.update(config.force_update).await?;
        info!("Clusterlogforwarder {} applied: {:?}", builder.name(), outcome);
    } else {
        builder.create().await?;
        info!("Clusterlogforwarder {} created", builder.name());
    }

    builder.wait_until_ready(config.wait_timeout).await?;
    Ok(builder.get().await?)
}
