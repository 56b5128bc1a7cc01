use anyhow::Result;

use super::client::CheckPointClient;
use super::types::BlockOutcome;
use crate::config::CheckPointConfig;
use crate::report::console;

pub const HOST_COLOR: &str = "red";
pub const HOST_COMMENT: &str = "Automatically added malicious IP";
pub const INSTALL_TARGETS: &[&str] = &["All"];

/// What to block and where
#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub ip: String,
    pub group: String,
    pub policy_package: String,
    pub user: String,
    pub password: String,
    pub domain: String,
}

impl BlockRequest {
    pub fn from_config(cfg: &CheckPointConfig, ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            group: cfg.group.clone(),
            policy_package: cfg.policy_package.clone(),
            user: cfg.user.clone(),
            password: cfg.password.clone(),
            domain: cfg.domain.clone(),
        }
    }
}

/// Block an IP: login, ensure the host object, add it to the block group,
/// publish, install policy, logout.
///
/// Calls run strictly in order. The first failing call aborts the sequence
/// and nothing after it is sent, logout included.
pub async fn block_ip(client: &mut CheckPointClient, req: &BlockRequest) -> Result<BlockOutcome> {
    let mut outcome = BlockOutcome::default();

    console::step("Logging into Check Point Management...");
    let login = client.login(&req.user, &req.password, &req.domain).await?;
    console::step("Login successful");
    tracing::debug!(
        "Management API version {}",
        login.api_server_version.as_deref().unwrap_or("unknown")
    );

    console::step("Checking if IP object exists...");
    match client.show_host(&req.ip).await? {
        Some(host) => {
            console::step("IP object already exists");
            tracing::debug!(
                "Existing host object {} (uid {}, address {})",
                host.name,
                host.uid,
                host.ipv4_address.as_deref().unwrap_or("-")
            );
        }
        None => {
            console::step("IP object does not exist, will create it");
            console::step("Creating IP object...");
            client.add_host(&req.ip, &req.ip, HOST_COLOR, HOST_COMMENT).await?;
            outcome.created = true;
            console::step("IP object created");
        }
    }

    console::step(&format!("Adding IP to {} group...", req.group));
    client.add_group_member(&req.group, &req.ip).await?;
    console::step("IP added to block group");

    console::step("Publishing changes...");
    outcome.publish_task = client.publish().await?.task_id;
    console::step("Changes published");

    console::step("Installing policy...");
    outcome.install_task = client
        .install_policy(&req.policy_package, INSTALL_TARGETS)
        .await?
        .task_id;
    console::step("Policy installed");

    console::step("Logging out...");
    client.logout().await?;

    tracing::info!(
        "Blocked {} (group {}, package {}, created={})",
        req.ip,
        req.group,
        req.policy_package,
        outcome.created
    );
    Ok(outcome)
}
