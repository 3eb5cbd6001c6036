// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::RECREATE_TIMEOUT_SECS;
use crate::error::{ClusterLoggingError, Result};
use crate::types::clusterlogforwarder::{
    ClusterLogForwarder, ClusterLogForwarderSpec, FilterSpec, InputSpec, OutputSpec,
    PipelineSpec, ServiceAccount,
};
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    runtime::wait::{await_condition, conditions},
    Api, Client, ResourceExt,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

/// Result of probing the cluster for the forwarder.
#[derive(Debug)]
pub enum Existence {
    Present,
    Absent,
    /// The API could not answer; the object may or may not exist
    Unknown(ClusterLoggingError),
}

impl Existence {
    pub fn is_present(&self) -> bool {
        matches!(self, Existence::Present)
    }
}

/// Pairs a desired ClusterLogForwarder definition with the last object observed
/// in the cluster.
pub struct ClusterLogForwarderBuilder {
    /// Desired state, sent to the API on create and update
    pub definition: ClusterLogForwarder,
    /// Last object observed in the cluster; `None` until fetched and after delete
    pub object: Option<ClusterLogForwarder>,
    client: Client,
    /// How long a forced update waits for the old object to go away
    pub(crate) recreate_timeout: Duration,
}

/// Retrieve an existing ClusterLogForwarder from the cluster.
#[instrument(skip(client))]
pub async fn pull(client: Client, name: &str, namespace: &str) -> Result<ClusterLogForwarder> {
    debug!(
        "Pulling existing clusterlogforwarder {} in namespace {}",
        name, namespace
    );

    let mut builder = ClusterLogForwarderBuilder::new(client, name, namespace)?;

    match builder.existence().await {
        Existence::Present => builder.object.ok_or_else(|| ClusterLoggingError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }),
        Existence::Absent => Err(ClusterLoggingError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }),
        Existence::Unknown(e) => Err(e),
    }
}

impl ClusterLogForwarderBuilder {
    /// Start a builder for a forwarder with an empty spec.
    pub fn new(client: Client, name: &str, namespace: &str) -> Result<Self> {
        let definition = ClusterLogForwarder {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: ClusterLogForwarderSpec::default(),
            status: None,
        };

        Self::from_definition(client, definition)
    }

    /// Start a builder from a complete definition, e.g. one read from a manifest.
    pub fn from_definition(client: Client, definition: ClusterLogForwarder) -> Result<Self> {
        let builder = Self {
            definition,
            object: None,
            client,
            recreate_timeout: Duration::from_secs(RECREATE_TIMEOUT_SECS),
        };
        builder.validate()?;

        Ok(builder)
    }

    pub fn name(&self) -> &str {
        self.definition.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.definition
            .metadata
            .namespace
            .as_deref()
            .unwrap_or_default()
    }

    /// Bound the wait for deletion between the delete and create of a forced update
    pub fn with_recreate_timeout(mut self, wait: Duration) -> Self {
        self.recreate_timeout = wait;
        self
    }

    /// Set the service account the collector runs as
    pub fn with_service_account(mut self, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(ClusterLoggingError::InvalidDefinition(
                "service account name cannot be empty".to_string(),
            ));
        }

        self.definition.spec.service_account = Some(ServiceAccount {
            name: name.to_string(),
        });

        Ok(self)
    }

    pub fn with_input(mut self, input: InputSpec) -> Result<Self> {
        check_entry_name("input", &input.name, self.definition.spec.inputs.iter().map(|i| &i.name))?;
        self.definition.spec.inputs.push(input);

        Ok(self)
    }

    pub fn with_output(mut self, output: OutputSpec) -> Result<Self> {
        check_entry_name("output", &output.name, self.definition.spec.outputs.iter().map(|o| &o.name))?;
        if output.output_type.is_empty() {
            return Err(ClusterLoggingError::InvalidDefinition(format!(
                "output '{}' has no type",
                output.name
            )));
        }
        self.definition.spec.outputs.push(output);

        Ok(self)
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Result<Self> {
        check_entry_name("filter", &filter.name, self.definition.spec.filters.iter().map(|f| &f.name))?;
        self.definition.spec.filters.push(filter);

        Ok(self)
    }

    /// Add a pipeline; it must route at least one input to at least one output
    pub fn with_pipeline(mut self, pipeline: PipelineSpec) -> Result<Self> {
        check_entry_name(
            "pipeline",
            &pipeline.name,
            self.definition.spec.pipelines.iter().map(|p| &p.name),
        )?;
        if pipeline.input_refs.is_empty() || pipeline.output_refs.is_empty() {
            return Err(ClusterLoggingError::InvalidDefinition(format!(
                "pipeline '{}' must reference at least one input and one output",
                pipeline.name
            )));
        }
        self.definition.spec.pipelines.push(pipeline);

        Ok(self)
    }

    /// Fetch the forwarder from the cluster. Remote errors, including not found,
    /// are returned unchanged.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn get(&self) -> Result<ClusterLogForwarder> {
        self.validate()?;

        debug!(
            "Getting clusterlogforwarder {} in namespace {}",
            self.name(),
            self.namespace()
        );

        Ok(self.api().get(self.name()).await?)
    }

    /// Create the forwarder unless it already exists.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        self.validate()?;

        debug!(
            "Creating the clusterlogforwarder {} in namespace {}",
            self.name(),
            self.namespace()
        );

        match self.existence().await {
            Existence::Present => {
                debug!("Clusterlogforwarder {} already exists", self.name());
            }
            Existence::Absent => self.post_definition().await?,
            Existence::Unknown(e) => return Err(e),
        }

        Ok(self)
    }

    /// Delete the forwarder; fails if it does not exist.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn delete(&mut self) -> Result<()> {
        self.validate()?;

        debug!(
            "Deleting the clusterlogforwarder {} in namespace {}",
            self.name(),
            self.namespace()
        );

        match self.existence().await {
            Existence::Present => {}
            Existence::Absent => return Err(ClusterLoggingError::DeleteNonExistent),
            Existence::Unknown(e) => return Err(e),
        }

        self.api()
            .delete(self.name(), &DeleteParams::default())
            .await
            .map_err(ClusterLoggingError::Delete)?;

        info!(
            "Clusterlogforwarder {} deleted from namespace {}",
            self.name(),
            self.namespace()
        );
        self.object = None;

        Ok(())
    }

    /// Probe the cluster, recording the fetched object. Errors other than not
    /// found are reported as `Unknown` rather than taken as existence.
    pub async fn existence(&mut self) -> Existence {
        if let Err(e) = self.validate() {
            return Existence::Unknown(e);
        }

        debug!(
            "Checking if clusterlogforwarder {} exists in namespace {}",
            self.name(),
            self.namespace()
        );

        match self.get().await {
            Ok(object) => {
                self.object = Some(object);
                Existence::Present
            }
            Err(e) if e.is_not_found() => {
                self.object = None;
                Existence::Absent
            }
            Err(e) => {
                self.object = None;
                Existence::Unknown(e)
            }
        }
    }

    /// True only if the forwarder was found; invalid builders and API failures
    /// report false.
    pub async fn exists(&mut self) -> bool {
        self.existence().await.is_present()
    }

    /// Wait until the logging operator reports the forwarder as Ready.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn wait_until_ready(&mut self, wait: Duration) -> Result<()> {
        self.validate()?;

        let ready = await_condition(
            self.api(),
            self.name(),
            |obj: Option<&ClusterLogForwarder>| obj.is_some_and(ClusterLogForwarder::is_ready),
        );

        match timeout(wait, ready).await {
            Ok(observed) => {
                self.object = observed?;
                info!("Clusterlogforwarder {} is ready", self.name());
                Ok(())
            }
            Err(_) => Err(ClusterLoggingError::Timeout(wait, self.name().to_string())),
        }
    }

    /// Wait until the forwarder is gone from the cluster.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn wait_until_deleted(&mut self, wait: Duration) -> Result<()> {
        let uid = match self.get().await {
            Ok(object) => object.uid().unwrap_or_default(),
            Err(e) if e.is_not_found() => {
                self.object = None;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let deleted = await_condition(self.api(), self.name(), conditions::is_deleted(&uid));

        match timeout(wait, deleted).await {
            Ok(observed) => {
                observed?;
                self.object = None;
                Ok(())
            }
            Err(_) => Err(ClusterLoggingError::Timeout(wait, self.name().to_string())),
        }
    }

    /// POST the definition without probing first; an existing object is a conflict.
    pub(crate) async fn post_definition(&mut self) -> Result<()> {
        let mut fresh = self.definition.clone();
        fresh.metadata.resource_version = None;
        fresh.metadata.uid = None;

        let created = self.api().create(&PostParams::default(), &fresh).await?;
        info!(
            "Clusterlogforwarder {} created in namespace {}",
            self.name(),
            self.namespace()
        );
        self.adopt(&created);

        Ok(())
    }

    /// Take the server-assigned identity of a written object into the definition
    /// and record the definition as the observed object.
    pub(crate) fn adopt(&mut self, written: &ClusterLogForwarder) {
        self.definition.metadata.resource_version = written.metadata.resource_version.clone();
        self.definition.metadata.uid = written.metadata.uid.clone();
        self.object = Some(self.definition.clone());
    }

    pub(crate) fn api(&self) -> Api<ClusterLogForwarder> {
        Api::namespaced(self.client.clone(), self.namespace())
    }

    /// Check that the definition identifies an object before any remote call.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name().is_empty() {
            debug!("The name of the clusterlogforwarder is empty");
            return Err(ClusterLoggingError::EmptyName);
        }

        if self.namespace().is_empty() {
            debug!("The namespace of the clusterlogforwarder is empty");
            return Err(ClusterLoggingError::EmptyNamespace);
        }

        Ok(())
    }
}

fn check_entry_name<'a>(
    kind: &str,
    name: &str,
    mut existing: impl Iterator<Item = &'a String>,
) -> Result<()> {
    if name.is_empty() {
        return Err(ClusterLoggingError::InvalidDefinition(format!(
            "{} name cannot be empty",
            kind
        )));
    }

    if existing.any(|n| n == name) {
        return Err(ClusterLoggingError::InvalidDefinition(format!(
            "{} '{}' is already defined",
            kind, name
        )));
    }

    Ok(())
}
