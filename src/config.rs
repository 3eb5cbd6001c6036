// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_FORWARDER_NAME;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 120;

/// Tool configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace the forwarder lives in
    pub namespace: String,
    pub name: String,
    /// YAML definition to apply; when unset the forwarder is only pulled and printed
    pub manifest: Option<PathBuf>,
    /// Fall back to delete and recreate when an in-place update is rejected
    pub force_update: bool,
    pub wait_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("FORWARDER_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .context("FORWARDER_NAMESPACE environment variable not set")?;
        let name = lookup("FORWARDER_NAME").unwrap_or_else(|| DEFAULT_FORWARDER_NAME.to_string());
        let manifest = lookup("FORWARDER_MANIFEST").map(PathBuf::from);
        let force_update = lookup("FORCE_UPDATE")
            .map(|v| v.parse::<bool>())
            .transpose()
            .context("FORCE_UPDATE must be 'true' or 'false'")?
            .unwrap_or(false);
        let wait_timeout = lookup("WAIT_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("WAIT_TIMEOUT_SECS must be a number of seconds")?
            .unwrap_or(DEFAULT_WAIT_TIMEOUT_SECS);

        Ok(Config {
            namespace,
            name,
            manifest,
            force_update,
            wait_timeout: Duration::from_secs(wait_timeout),
        })
    }
}
