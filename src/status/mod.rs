use async_trait::async_trait;
use std::net::IpAddr;
use std::process::Stdio;
use tokio::process::Command;

use crate::models::PingStatus;

/// Sends one ICMP echo to a host and reports whether it answered
#[async_trait]
pub trait Pinger: Send + Sync {
    /// `Ok(true)` when the probe exited successfully, `Ok(false)` on any other
    /// exit code, `Err` when the probe could not be run at all
    async fn ping(&self, host: &str) -> std::io::Result<bool>;
}

/// Pinger backed by the system `ping` binary
#[derive(Debug, Clone)]
pub struct SystemPinger {
    timeout_secs: u64,
}

impl SystemPinger {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

/// Arguments for a single echo with a wait timeout
fn ping_args(host: &str, timeout_secs: u64) -> Vec<String> {
    if cfg!(windows) {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            (timeout_secs * 1000).to_string(),
            host.to_string(),
        ]
    } else {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            timeout_secs.to_string(),
            host.to_string(),
        ]
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, host: &str) -> std::io::Result<bool> {
        let status = Command::new("ping")
            .args(ping_args(host, self.timeout_secs))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(status.success())
    }
}

/// Classify one host: UP on exit code 0, DOWN otherwise, ERROR if ping could not run
pub async fn check_host(pinger: &dyn Pinger, host: &str) -> PingStatus {
    if !is_valid_ip(host) && !is_valid_hostname(host) {
        return PingStatus::Error(format!("invalid host '{}'", host));
    }

    match pinger.ping(host).await {
        Ok(true) => PingStatus::Up,
        Ok(false) => PingStatus::Down,
        Err(e) => PingStatus::Error(e.to_string()),
    }
}

/// Any IPv4 or IPv6 address literal (e.g., "192.168.1.1", "2001:db8::1")
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Validate a hostname.
/// Allows alphanumeric, hyphens, dots, and underscores, and must not start with
/// a hyphen so it is never taken for a ping option.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > 253 || hostname.starts_with('-') {
        return false;
    }
    hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}
