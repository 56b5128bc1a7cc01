use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::models::Device;

/// Load an inventory CSV (header row + one device per row).
///
/// Recognised columns: `hostname`/`name`, `ip`/`host`, `username`, `password`,
/// `device_type`, `vendor`. Unknown columns are ignored and missing ones default
/// to empty. Row order is preserved.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Device>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open inventory {}", path.display()))?;
    let devices = parse_csv(file)
        .with_context(|| format!("Failed to parse inventory {}", path.display()))?;
    tracing::info!("Loaded {} devices from {}", devices.len(), path.display());
    Ok(devices)
}

/// Parse inventory CSV from any reader
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Device>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut devices = Vec::new();
    for (idx, record) in rdr.deserialize::<Device>().enumerate() {
        // Line 1 is the header
        let device = record.with_context(|| format!("Invalid inventory row at line {}", idx + 2))?;
        devices.push(device);
    }
    Ok(devices)
}

/// Built-in device list for the status check when no inventory file is configured
pub fn default_status_devices() -> Vec<Device> {
    [("Firewall1", "192.168.1.10"), ("Firewall2", "192.168.1.20")]
        .into_iter()
        .map(|(name, host)| Device {
            hostname: name.to_string(),
            ip: host.to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            device_type: "cisco_ios".to_string(),
            vendor: Some("cisco".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch_list() {
        let csv = "hostname,username,password,device_type\n\
                   10.0.0.11,admin,secret,cisco_ios\n\
                   10.0.0.12 , admin , secret , cisco_ios\n";
        let devices = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].hostname, "10.0.0.11");
        assert_eq!(devices[0].address(), "10.0.0.11");
        assert_eq!(devices[1].username, "admin");
        assert_eq!(devices[1].device_type, "cisco_ios");
    }

    #[test]
    fn test_parse_switches_with_ip_column() {
        let csv = "hostname,ip,username,password,device_type\n\
                   access-sw1,10.0.0.21,admin,secret,cisco_ios\n";
        let devices = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(devices[0].display_name(), "access-sw1");
        assert_eq!(devices[0].address(), "10.0.0.21");
    }

    #[test]
    fn test_parse_name_host_aliases() {
        let csv = "name,host,username,password,device_type,vendor\n\
                   Firewall1,192.168.1.10,admin,password,cisco_ios,cisco\n";
        let devices = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(devices[0].hostname, "Firewall1");
        assert_eq!(devices[0].ip, "192.168.1.10");
        assert_eq!(devices[0].vendor.as_deref(), Some("cisco"));
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let csv = "hostname,site\nsw1,lab\n";
        let devices = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(devices[0].hostname, "sw1");
        assert!(devices[0].username.is_empty());
        assert!(devices[0].vendor.is_none());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_csv("/nonexistent/switches.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open inventory"));
    }

    #[test]
    fn test_default_status_devices() {
        let devices = default_status_devices();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].display_name(), "Firewall1");
        assert_eq!(devices[1].address(), "192.168.1.20");
    }
}
