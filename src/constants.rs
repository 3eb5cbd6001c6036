// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API coordinates of the ClusterLogForwarder custom resource
pub mod api {
    pub const GROUP: &str = "logging.openshift.io";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "ClusterLogForwarder";
}

/// Name the logging operator reconciles when none is given
pub const DEFAULT_FORWARDER_NAME: &str = "instance";

/// Status condition reported once the forwarder configuration is accepted
pub const READY_CONDITION: &str = "Ready";

/// Seconds a forced update waits for the deleted object to disappear before recreating it
pub const RECREATE_TIMEOUT_SECS: u64 = 120;

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
