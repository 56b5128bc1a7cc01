use serde::{Deserialize, Serialize};

/// Device represents one row of an inventory: how to reach and log into a switch or firewall
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, alias = "name")]
    pub hostname: String,
    #[serde(default, alias = "host")]
    pub ip: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub device_type: String, // cisco_ios, cisco_nxos, arista_eos, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl Device {
    /// Address to connect to: the IP column when present, otherwise the hostname
    pub fn address(&self) -> &str {
        if self.ip.trim().is_empty() {
            self.hostname.trim()
        } else {
            self.ip.trim()
        }
    }

    /// Name used in reports and logs
    pub fn display_name(&self) -> &str {
        if self.hostname.trim().is_empty() {
            self.ip.trim()
        } else {
            self.hostname.trim()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_prefers_ip() {
        let dev = Device {
            hostname: "access-sw1".to_string(),
            ip: "10.0.0.11".to_string(),
            ..Default::default()
        };
        assert_eq!(dev.address(), "10.0.0.11");
        assert_eq!(dev.display_name(), "access-sw1");
    }

    #[test]
    fn test_address_falls_back_to_hostname() {
        let dev = Device {
            hostname: "core-sw1.lab".to_string(),
            ..Default::default()
        };
        assert_eq!(dev.address(), "core-sw1.lab");

        let dev = Device {
            ip: "10.0.0.12".to_string(),
            ..Default::default()
        };
        assert_eq!(dev.display_name(), "10.0.0.12");
    }
}
