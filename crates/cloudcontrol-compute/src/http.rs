use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::network_domain::{DeployNetworkDomain, EditNetworkDomain, NetworkDomain};
use crate::{BoxFuture, ComputeClient};

/// API version segment used for every network call.
pub const API_VERSION: &str = "2.4";

/// Response code the API uses when an id does not resolve to a record.
pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";

/// Base URL of the public API endpoint for a region code such as "NA" or "AU".
pub fn region_endpoint(region: &str) -> String {
    format!("https://api-{}.dimensiondata.com", region.to_lowercase())
}

/// REST client for CloudControl network domains.
pub struct HttpComputeClient {
    http: reqwest::Client,
    base_url: String,
    organization_id: String,
    username: String,
    password: String,
}

impl HttpComputeClient {
    pub fn new(
        base_url: impl Into<String>,
        organization_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ComputeError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization_id: organization_id.into(),
            username: username.into(),
            password: password.into(),
        })
    }

    fn network_url(&self, path: &str) -> String {
        format!(
            "{}/caas/{API_VERSION}/{}/network/{path}",
            self.base_url, self.organization_id
        )
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, String), ComputeError> {
        let url = self.network_url(path);
        tracing::debug!(url = %url, "POST");
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }

    async fn get(&self, path: &str) -> Result<(u16, String), ComputeError> {
        let url = self.network_url(path);
        tracing::debug!(url = %url, "GET");
        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

impl ComputeClient for HttpComputeClient {
    fn deploy_network_domain<'a>(
        &'a self,
        request: &'a DeployNetworkDomain,
    ) -> BoxFuture<'a, Result<String, ComputeError>> {
        Box::pin(async move {
            let body = DeployBody {
                datacenter_id: &request.datacenter_id,
                name: &request.name,
                description: &request.description,
                plan: &request.plan,
            };
            let (status, text) = self.post("deployNetworkDomain", &body).await?;
            parse_deploy_response(status, &text)
        })
    }

    fn get_network_domain<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<NetworkDomain>, ComputeError>> {
        Box::pin(async move {
            let (status, text) = self.get(&format!("networkDomain/{id}")).await?;
            parse_get_response(status, &text)
        })
    }

    fn edit_network_domain<'a>(
        &'a self,
        edit: &'a EditNetworkDomain,
    ) -> BoxFuture<'a, Result<(), ComputeError>> {
        Box::pin(async move {
            let body = EditBody {
                id: &edit.id,
                name: edit.name.as_set().map(String::as_str),
                description: edit.description.as_set().map(String::as_str),
                plan: edit.plan.as_set().map(String::as_str),
            };
            let (status, text) = self.post("editNetworkDomain", &body).await?;
            parse_api_response(status, &text).map(|_| ())
        })
    }

    fn delete_network_domain<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<(), ComputeError>> {
        Box::pin(async move {
            let (status, text) = self.post("deleteNetworkDomain", &IdBody { id }).await?;
            parse_api_response(status, &text).map(|_| ())
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployBody<'a> {
    datacenter_id: &'a str,
    name: &'a str,
    description: &'a str,
    #[serde(rename = "type")]
    plan: &'a str,
}

#[derive(Serialize)]
struct EditBody<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    plan: Option<&'a str>,
}

#[derive(Serialize)]
struct IdBody<'a> {
    id: &'a str,
}

/// Envelope the API returns for every write and for every failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiResponse {
    pub operation: String,
    pub response_code: String,
    pub message: String,
    pub info: Vec<NameValue>,
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl ApiResponse {
    pub fn info(&self, name: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|nv| nv.name == name)
            .map(|nv| nv.value.as_str())
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse a response envelope, turning non-2xx answers into `ComputeError::Api`.
pub fn parse_api_response(status: u16, body: &str) -> Result<ApiResponse, ComputeError> {
    if is_success(status) {
        return Ok(serde_json::from_str(body)?);
    }
    Err(api_error(status, body))
}

fn api_error(status: u16, body: &str) -> ComputeError {
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(resp) => ComputeError::Api {
            status,
            response_code: resp.response_code,
            message: resp.message,
        },
        Err(_) => ComputeError::UnexpectedResponse(format!("HTTP {status}: {body}")),
    }
}

/// Extract the new network domain id from a deploy response.
pub fn parse_deploy_response(status: u16, body: &str) -> Result<String, ComputeError> {
    let resp = parse_api_response(status, body)?;
    resp.info("networkDomainId")
        .map(String::from)
        .ok_or_else(|| {
            ComputeError::UnexpectedResponse(format!(
                "deploy response carried no networkDomainId (request {})",
                resp.request_id
            ))
        })
}

/// Parse a network domain lookup. A `RESOURCE_NOT_FOUND` answer is `Ok(None)`.
pub fn parse_get_response(status: u16, body: &str) -> Result<Option<NetworkDomain>, ComputeError> {
    if is_success(status) {
        let domain: NetworkDomain = serde_json::from_str(body)?;
        return Ok(Some(domain));
    }

    match api_error(status, body) {
        err if err.response_code() == Some(RESOURCE_NOT_FOUND) => Ok(None),
        err => Err(err),
    }
}
