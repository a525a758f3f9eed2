//! cloudcontrol-compute
//!
//! Client for the CloudControl compute API, limited to network domains.
//!
//! - `ComputeClient`: the dyn-compatible seam the provisioner drives
//! - `HttpComputeClient`: REST implementation against CAAS 2.x
//! - `NetworkDomain`: the remote record as the API reports it

pub mod error;
pub mod http;
pub mod network_domain;

use std::future::Future;
use std::pin::Pin;

pub use crate::error::ComputeError;
pub use crate::http::HttpComputeClient;
pub use crate::network_domain::{
    DeployNetworkDomain, DomainStatus, EditNetworkDomain, FieldChange, NetworkDomain,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations the compute API offers for network domains.
///
/// Deploy and delete only start a transition on the remote side; callers
/// poll `get_network_domain` to learn when it finished.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ComputeClient: Send + Sync {
    /// Start provisioning a network domain. Returns the assigned id.
    fn deploy_network_domain<'a>(
        &'a self,
        request: &'a DeployNetworkDomain,
    ) -> BoxFuture<'a, Result<String, ComputeError>>;

    /// Fetch a network domain. Returns `Ok(None)` if no such domain exists.
    fn get_network_domain<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<NetworkDomain>, ComputeError>>;

    /// Change the mutable fields of a network domain.
    /// Fields left as `FieldChange::Unchanged` are not sent.
    fn edit_network_domain<'a>(
        &'a self,
        edit: &'a EditNetworkDomain,
    ) -> BoxFuture<'a, Result<(), ComputeError>>;

    /// Start decommissioning a network domain.
    fn delete_network_domain<'a>(&'a self, id: &'a str)
    -> BoxFuture<'a, Result<(), ComputeError>>;
}
