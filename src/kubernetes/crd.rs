// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Discovery of the logging API, so that forwarder operations are not attempted
//! before the logging operator has installed its CRDs.

use crate::constants::api::{GROUP, KIND, VERSION};
use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Block until `clusterlogforwarders` is served under logging.openshift.io/v1.
///
/// A freshly installed logging operator registers its CRDs some time after the
/// subscription is created; discovery failures are logged and polled through.
pub async fn wait_for_forwarder_crd(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    while !forwarder_crd_ready(client, interval).await {
        sleep(Duration::from_secs(interval)).await;
        interval = next_interval(interval);
    }

    info!("{} is served by {}/{}", KIND, GROUP, VERSION);
    Ok(())
}

async fn forwarder_crd_ready(client: &Client, interval: u64) -> bool {
    match forwarder_crd_exists(client).await {
        Ok(found) => {
            if !found {
                debug!("{} not served yet, next check in {}s", KIND, interval);
            }
            found
        }
        Err(e) => {
            warn!("Discovery of {} failed: {}, next check in {}s", GROUP, e, interval);
            false
        }
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

/// Whether the preferred version of the logging group serves ClusterLogForwarder v1.
pub async fn forwarder_crd_exists(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[GROUP])
        .run()
        .await?;

    let Some(group) = discovery.get(GROUP) else {
        return Ok(false);
    };
    let found = group
        .recommended_resources()
        .iter()
        .any(|(ar, _)| ar.kind == KIND && ar.version == VERSION);

    Ok(found)
}
