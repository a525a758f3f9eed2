//! Scripted compute client shared by the provisioner integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use cloudcontrol_compute::{
    BoxFuture, ComputeClient, ComputeError, DeployNetworkDomain, EditNetworkDomain, NetworkDomain,
};
use tokio::time::Instant;

/// One answer to `get_network_domain`.
#[derive(Debug, Clone)]
pub enum Reply {
    Domain(NetworkDomain),
    Absent,
    Fail(String),
}

pub fn domain(id: &str, state: &str) -> NetworkDomain {
    NetworkDomain {
        id: id.to_string(),
        name: "web".to_string(),
        description: String::new(),
        plan: "ESSENTIALS".to_string(),
        nat_ipv4_address: String::new(),
        datacenter_id: "NA9".to_string(),
        state: state.to_string(),
    }
}

pub fn status(state: &str) -> Reply {
    Reply::Domain(domain("nd-1", state))
}

fn api_error(message: &str) -> ComputeError {
    ComputeError::Api {
        status: 500,
        response_code: "UNEXPECTED_ERROR".to_string(),
        message: message.to_string(),
    }
}

#[derive(Default)]
struct Inner {
    replies: VecDeque<Reply>,
    next_id: usize,
    deploy_error: Option<String>,
    edit_error: Option<String>,
    delete_error: Option<String>,
    poll_times: Vec<Instant>,
    deploys: Vec<DeployNetworkDomain>,
    edits: Vec<EditNetworkDomain>,
    deletes: Vec<String>,
}

/// Compute client that answers lookups from a queue of replies.
///
/// The last queued reply repeats forever; an empty queue reports absence.
/// Deploy hands out ids `nd-1`, `nd-2`, ...
#[derive(Default)]
pub struct ScriptedClient {
    inner: Mutex<Inner>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.inner.lock().unwrap().replies.push_back(reply);
        self
    }

    pub fn replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.inner.lock().unwrap().replies.extend(replies);
        self
    }

    pub fn fail_deploy(self, message: &str) -> Self {
        self.inner.lock().unwrap().deploy_error = Some(message.to_string());
        self
    }

    pub fn fail_edit(self, message: &str) -> Self {
        self.inner.lock().unwrap().edit_error = Some(message.to_string());
        self
    }

    pub fn fail_delete(self, message: &str) -> Self {
        self.inner.lock().unwrap().delete_error = Some(message.to_string());
        self
    }

    /// Queue more replies after construction.
    pub fn push(&self, replies: impl IntoIterator<Item = Reply>) {
        self.inner.lock().unwrap().replies.extend(replies);
    }

    pub fn gets(&self) -> usize {
        self.inner.lock().unwrap().poll_times.len()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.inner.lock().unwrap().poll_times.clone()
    }

    pub fn deploys(&self) -> Vec<DeployNetworkDomain> {
        self.inner.lock().unwrap().deploys.clone()
    }

    pub fn edits(&self) -> Vec<EditNetworkDomain> {
        self.inner.lock().unwrap().edits.clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.inner.lock().unwrap().deletes.clone()
    }

    fn next_reply(&self) -> Reply {
        let mut inner = self.inner.lock().unwrap();
        inner.poll_times.push(Instant::now());
        if inner.replies.len() > 1 {
            inner.replies.pop_front().unwrap()
        } else {
            inner.replies.front().cloned().unwrap_or(Reply::Absent)
        }
    }
}

impl ComputeClient for ScriptedClient {
    fn deploy_network_domain<'a>(
        &'a self,
        request: &'a DeployNetworkDomain,
    ) -> BoxFuture<'a, Result<String, ComputeError>> {
        let result = {
            let mut inner = self.inner.lock().unwrap();
            inner.deploys.push(request.clone());
            if let Some(message) = inner.deploy_error.clone() {
                Err(api_error(&message))
            } else {
                inner.next_id += 1;
                Ok(format!("nd-{}", inner.next_id))
            }
        };
        Box::pin(async move { result })
    }

    fn get_network_domain<'a>(
        &'a self,
        _id: &'a str,
    ) -> BoxFuture<'a, Result<Option<NetworkDomain>, ComputeError>> {
        let result = match self.next_reply() {
            Reply::Domain(domain) => Ok(Some(domain)),
            Reply::Absent => Ok(None),
            Reply::Fail(message) => Err(api_error(&message)),
        };
        Box::pin(async move { result })
    }

    fn edit_network_domain<'a>(
        &'a self,
        edit: &'a EditNetworkDomain,
    ) -> BoxFuture<'a, Result<(), ComputeError>> {
        let result = {
            let mut inner = self.inner.lock().unwrap();
            inner.edits.push(edit.clone());
            match &inner.edit_error {
                Some(message) => Err(api_error(message)),
                None => Ok(()),
            }
        };
        Box::pin(async move { result })
    }

    fn delete_network_domain<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<(), ComputeError>> {
        let result = {
            let mut inner = self.inner.lock().unwrap();
            inner.deletes.push(id.to_string());
            match &inner.delete_error {
                Some(message) => Err(api_error(message)),
                None => Ok(()),
            }
        };
        Box::pin(async move { result })
    }
}
