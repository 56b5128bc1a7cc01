use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::time::Duration;

use super::types::*;

/// Error code the management server returns for lookups of unknown objects
const OBJECT_NOT_FOUND: &str = "generic_err_object_not_found";

/// Raw HTTP answer from the management server
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Typed error for non-200 API responses, so callers can tell a missing
/// object apart from every other failure.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub endpoint: String,
    pub status: u16,
    pub body: String,
}

impl ApiError {
    /// The server answered "no such object" (as opposed to auth, transport or server errors)
    pub fn is_not_found(&self) -> bool {
        if self.status == 404 {
            return true;
        }
        serde_json::from_str::<ApiErrorBody>(&self.body)
            .map(|b| b.code == OBJECT_NOT_FOUND)
            .unwrap_or(false)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API call {} failed ({}): {}", self.endpoint, self.status, self.body)
    }
}

impl std::error::Error for ApiError {}

/// Sends one JSON POST and returns the raw answer
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn post(&self, url: &str, sid: Option<&str>, body: &serde_json::Value) -> Result<ApiResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(insecure_tls: bool) -> Result<Self> {
        if insecure_tls {
            tracing::warn!("TLS certificate verification is disabled for the management API");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn post(&self, url: &str, sid: Option<&str>, body: &serde_json::Value) -> Result<ApiResponse> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(sid) = sid {
            request = request.header("X-chkp-sid", sid);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {} ({})", url, status))?;
        Ok(ApiResponse { status, body })
    }
}

/// Check Point management API client. Holds the session id after login.
pub struct CheckPointClient {
    base_url: String,
    transport: Box<dyn ApiTransport>,
    sid: Option<String>,
}

impl CheckPointClient {
    pub fn new(url: &str, transport: Box<dyn ApiTransport>) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            transport,
            sid: None,
        }
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/web_api/{}", self.base_url, endpoint)
    }

    /// POST `payload` to `endpoint`; anything but 200 is an [`ApiError`]
    async fn call<B, T>(&self, endpoint: &str, payload: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(payload)?;
        let resp = self
            .transport
            .post(&self.api_url(endpoint), self.sid.as_deref(), &body)
            .await
            .with_context(|| format!("API call {} could not be sent", endpoint))?;

        if resp.status != 200 {
            return Err(ApiError {
                endpoint: endpoint.to_string(),
                status: resp.status,
                body: resp.body,
            }
            .into());
        }

        let body = if resp.body.trim().is_empty() { "{}" } else { resp.body.as_str() };
        serde_json::from_str(body).with_context(|| format!("Invalid {} response", endpoint))
    }

    #[cfg(test)]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub async fn login(&mut self, user: &str, password: &str, domain: &str) -> Result<LoginResponse> {
        let resp: LoginResponse = self
            .call("login", &LoginRequest {
                user: user.to_string(),
                password: password.to_string(),
                domain: domain.to_string(),
            })
            .await?;
        self.sid = Some(resp.sid.clone());
        Ok(resp)
    }

    /// Look up a host object by name. `Ok(None)` only when the server says it does not exist.
    pub async fn show_host(&self, name: &str) -> Result<Option<HostObject>> {
        match self.call("show-host", &ShowObjectRequest { name: name.to_string() }).await {
            Ok(host) => Ok(Some(host)),
            Err(e) => match e.downcast_ref::<ApiError>() {
                Some(api) if api.is_not_found() => Ok(None),
                _ => Err(e),
            },
        }
    }

    pub async fn add_host(&self, name: &str, ip: &str, color: &str, comments: &str) -> Result<HostObject> {
        self.call("add-host", &AddHostRequest {
            name: name.to_string(),
            ip_address: ip.to_string(),
            color: color.to_string(),
            comments: comments.to_string(),
        })
        .await
    }

    pub async fn add_group_member(&self, group: &str, member: &str) -> Result<serde_json::Value> {
        self.call("set-group", &SetGroupRequest {
            name: group.to_string(),
            members: GroupMembers {
                add: vec![member.to_string()],
            },
        })
        .await
    }

    pub async fn publish(&self) -> Result<TaskResponse> {
        self.call("publish", &serde_json::json!({})).await
    }

    pub async fn install_policy(&self, package: &str, targets: &[&str]) -> Result<TaskResponse> {
        self.call("install-policy", &InstallPolicyRequest {
            policy_package: package.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        })
        .await
    }

    pub async fn logout(&mut self) -> Result<()> {
        let _: serde_json::Value = self.call("logout", &serde_json::json!({})).await?;
        self.sid = None;
        Ok(())
    }
}
