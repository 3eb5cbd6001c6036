// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builder for pulling, creating, updating and deleting ClusterLogForwarder objects.

pub mod builder;
pub mod update;

pub use builder::{pull, ClusterLogForwarderBuilder, Existence};
pub use update::{UpdateOutcome, UpdateStep};
