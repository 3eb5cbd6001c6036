// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Route = (String, String);

#[derive(Clone)]
enum Reply {
    Respond(u16, String),
    /// Never answers, like a watch with no events
    Pending,
}

/// A mock HTTP service that answers from scripted responses per method and path
/// and records every request it receives.
///
/// Each route holds a queue of responses; the last one is repeated once the queue
/// is drained, so a single scripted response behaves like a static one.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Route, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<Route>>>,
    bodies: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Queue a response for requests matching the exact method and path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.queue(method, path, Reply::Respond(status, body.to_string()))
    }

    /// Queue a GET that never completes
    pub fn on_get_pending(self, path: &str) -> Self {
        self.queue("GET", path, Reply::Pending)
    }

    fn queue(self, method: &str, path: &str, reply: Reply) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Methods and paths of all requests seen so far, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests seen for the given method
    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Request methods in order, e.g. `["GET", "DELETE", "GET", "POST"]`
    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }

    /// JSON bodies sent with the given method, in order
    pub fn bodies(&self, method: &str) -> Vec<serde_json::Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<Reply> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.calls
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let reply = self
            .next_response(&method, &path)
            .unwrap_or_else(|| Reply::Respond(404, not_found_json("clusterlogforwarders", "unknown")));
        let bodies = self.bodies.clone();

        Box::pin(async move {
            let sent = req.into_body().collect().await?.to_bytes();
            if let Ok(json) = serde_json::from_slice(&sent) {
                bodies.lock().unwrap().push((method, json));
            }

            match reply {
                Reply::Respond(status, body) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                Reply::Pending => std::future::pending().await,
            }
        })
    }
}

/// Path of a single forwarder object
pub fn forwarder_path(namespace: &str, name: &str) -> String {
    format!("{}/{}", forwarders_path(namespace), name)
}

/// Path of the forwarder collection in a namespace, the target of creates
pub fn forwarders_path(namespace: &str) -> String {
    format!(
        "/apis/logging.openshift.io/v1/namespaces/{}/clusterlogforwarders",
        namespace
    )
}

/// Create a mock ClusterLogForwarder JSON response
pub fn forwarder_json(namespace: &str, name: &str) -> String {
    forwarder_value(namespace, name, "1").to_string()
}

/// Same as `forwarder_json` with a specific resourceVersion
pub fn forwarder_json_at(namespace: &str, name: &str, resource_version: &str) -> String {
    forwarder_value(namespace, name, resource_version).to_string()
}

/// Create a list response holding one forwarder with a Ready condition of the given status
pub fn forwarder_list_json(namespace: &str, name: &str, ready: &str) -> String {
    let mut item = forwarder_value(namespace, name, "5");
    item["status"] = serde_json::json!({
        "conditions": [{ "type": "Ready", "status": ready }]
    });

    serde_json::json!({
        "apiVersion": "logging.openshift.io/v1",
        "kind": "ClusterLogForwarderList",
        "metadata": { "resourceVersion": "5" },
        "items": [item]
    })
    .to_string()
}

fn forwarder_value(namespace: &str, name: &str, resource_version: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "logging.openshift.io/v1",
        "kind": "ClusterLogForwarder",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid",
            "resourceVersion": resource_version
        },
        "spec": {}
    })
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a failure Status body with the given code and reason
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
