// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-place update with an optional delete and recreate fallback.

use crate::error::Result;
use crate::forwarder::builder::ClusterLogForwarderBuilder;
use crate::types::clusterlogforwarder::ClusterLogForwarder;
use kube::api::PostParams;
use tracing::{debug, info, instrument, warn};

/// How a successful update was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The definition replaced the live object in place
    Replaced,
    /// The live object was deleted and created again from the definition
    Recreated,
}

/// Stages of an update. A rejected replace only moves on to `Delete` when forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    Replace,
    Delete,
    Recreate,
    Done(UpdateOutcome),
}

impl UpdateStep {
    /// Step that follows a rejected replace, or `None` if the error ends the update
    pub fn after_rejected_replace(force: bool) -> Option<UpdateStep> {
        force.then_some(UpdateStep::Delete)
    }
}

impl ClusterLogForwarderBuilder {
    /// Apply the definition to the existing object.
    ///
    /// With `force`, a rejected update falls back to deleting the object, waiting
    /// for it to disappear and creating it again. A failed delete or an object
    /// that outlives the recreate timeout ends the update before anything is
    /// recreated.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn update(&mut self, force: bool) -> Result<UpdateOutcome> {
        self.validate()?;

        debug!(
            "Updating clusterlogforwarder {} in namespace {}",
            self.name(),
            self.namespace()
        );

        let mut step = UpdateStep::Replace;
        loop {
            step = match step {
                UpdateStep::Replace => match self.replace().await {
                    Ok(()) => UpdateStep::Done(UpdateOutcome::Replaced),
                    Err(e) => match UpdateStep::after_rejected_replace(force) {
                        Some(next) => {
                            warn!(
                                "Failed to update the clusterlogforwarder {} in namespace {}: {}. Force flag set, deleting and recreating instead",
                                self.name(),
                                self.namespace(),
                                e
                            );
                            next
                        }
                        None => return Err(e),
                    },
                },
                UpdateStep::Delete => {
                    if let Err(e) = self.delete().await {
                        warn!(
                            "Failed to update the clusterlogforwarder {} in namespace {} due to error in delete: {}",
                            self.name(),
                            self.namespace(),
                            e
                        );
                        return Err(e);
                    }
                    UpdateStep::Recreate
                }
                UpdateStep::Recreate => {
                    self.wait_until_deleted(self.recreate_timeout).await?;
                    self.post_definition().await?;
                    UpdateStep::Done(UpdateOutcome::Recreated)
                }
                UpdateStep::Done(outcome) => {
                    info!(
                        "Clusterlogforwarder {} updated ({:?})",
                        self.name(),
                        outcome
                    );
                    return Ok(outcome);
                }
            };
            debug!(?step, "Clusterlogforwarder update moved on");
        }
    }

    async fn replace(&mut self) -> Result<()> {
        let replacement = self.replacement();
        let replaced = self
            .api()
            .replace(self.name(), &PostParams::default(), &replacement)
            .await?;
        self.adopt(&replaced);

        Ok(())
    }

    /// The definition to send on replace. The API server requires a
    /// resourceVersion, so one is taken from the last observed object when the
    /// definition carries none.
    fn replacement(&self) -> ClusterLogForwarder {
        let mut replacement = self.definition.clone();
        if replacement.metadata.resource_version.is_none() {
            replacement.metadata.resource_version = self
                .object
                .as_ref()
                .and_then(|o| o.metadata.resource_version.clone());
        }
        replacement
    }
}
