// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types.

pub mod clusterlogforwarder;

pub use clusterlogforwarder::{ClusterLogForwarder, ClusterLogForwarderSpec};
