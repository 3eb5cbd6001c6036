// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterLoggingError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("clusterlogforwarder 'name' cannot be empty")]
    EmptyName,

    #[error("clusterlogforwarder 'namespace' cannot be empty")]
    EmptyNamespace,

    #[error("invalid clusterlogforwarder definition: {0}")]
    InvalidDefinition(String),

    #[error("clusterlogforwarder object {name} doesn't exist in namespace {namespace}")]
    NotFound { name: String, namespace: String },

    #[error("clusterlogforwarder cannot be deleted because it does not exist")]
    DeleteNonExistent,

    #[error("can not delete clusterlogforwarder: {0}")]
    Delete(#[source] kube::Error),

    #[error("Failed waiting for clusterlogforwarder: {0}")]
    Wait(#[from] kube::runtime::wait::Error),

    #[error("Timed out after {0:?} waiting for clusterlogforwarder {1}")]
    Timeout(std::time::Duration, String),
}

impl ClusterLoggingError {
    /// True when the API server answered 404 for the requested object
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Kube(kube::Error::Api(err)) if err.code == 404)
    }
}

pub type Result<T> = std::result::Result<T, ClusterLoggingError>;
