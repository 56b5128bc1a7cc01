use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub ping_hosts: Vec<String>,
    pub ping_timeout_secs: u64,
    pub status_inventory: Option<String>,
    pub status_report: String,
    pub audit_inventory: String,
    pub audit_report: String,
    pub speed_inventory: String,
    pub speed_report: String,
    pub speed_threshold_mbps: u32,
    pub speed_target_mbps: u32,
    pub ssh_timeout_secs: u64,
    pub ssh_port: u16,
    pub checkpoint: CheckPointConfig,
}

/// Connection and policy settings for the Check Point management API
#[derive(Debug, Clone)]
pub struct CheckPointConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub domain: String,
    pub group: String,
    pub policy_package: String,
    pub insecure_tls: bool,
    pub block_ip: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            ping_hosts: split_list(&get_env("PING_HOSTS", "8.8.8.8,192.168.1.1")),
            ping_timeout_secs: get_env("PING_TIMEOUT_SECS", "2").parse().unwrap_or(2),
            status_inventory: env::var("STATUS_INVENTORY").ok().filter(|s| !s.is_empty()),
            status_report: get_env("STATUS_REPORT", "network_status_report.xlsx"),
            audit_inventory: get_env("AUDIT_INVENTORY", "switch_list.csv"),
            audit_report: get_env("AUDIT_REPORT", "switch_ports_report.xlsx"),
            speed_inventory: get_env("SPEED_INVENTORY", "switches.csv"),
            speed_report: get_env("SPEED_REPORT", "switch_port_speed_audit.xlsx"),
            speed_threshold_mbps: get_env("SPEED_THRESHOLD_MBPS", "100")
                .parse()
                .unwrap_or(100),
            speed_target_mbps: get_env("SPEED_TARGET_MBPS", "1000")
                .parse()
                .unwrap_or(1000),
            ssh_timeout_secs: get_env("SSH_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            ssh_port: get_env("SSH_PORT", "22").parse().unwrap_or(22),
            checkpoint: CheckPointConfig {
                url: get_env("CHECKPOINT_URL", "https://192.168.1.100"),
                user: get_env("CHECKPOINT_USER", "api-admin"),
                password: get_env("CHECKPOINT_PASSWORD", ""),
                domain: get_env("CHECKPOINT_DOMAIN", "SMC User"),
                group: get_env("CHECKPOINT_GROUP", "Malicious_IPs"),
                policy_package: get_env("CHECKPOINT_POLICY_PACKAGE", "Standard"),
                insecure_tls: parse_bool(&get_env("CHECKPOINT_INSECURE_TLS", "false")),
                block_ip: get_env("BLOCK_IP", "8.8.8.8"),
            },
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
