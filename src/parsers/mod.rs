//! Parsers for IOS-style CLI output.
//!
//! Every parser is line-oriented and tolerant: lines that do not have the
//! expected shape are skipped rather than reported.

use regex_lite::Regex;
use std::collections::HashMap;

use crate::models::{InterfaceBrief, InterfaceDetail, PortStatus, Speed};

/// Minimum whitespace-separated fields in a `show ip interface brief` row
pub const MIN_BRIEF_FIELDS: usize = 6;
/// Minimum fields in a `show interfaces status` row used for speed decisions
pub const MIN_STATUS_FIELDS: usize = 6;
/// Minimum fields in a `show interface status` row used for the port audit
pub const MIN_AUDIT_FIELDS: usize = 4;

/// Data lines of a tabular command output. Blank lines go first, so the
/// header is dropped even when raw exec output starts with an empty line.
fn data_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter(|l| !l.trim().is_empty()).skip(1)
}

/// Parse `show ip interface brief`.
///
/// ```text
/// Interface              IP-Address      OK? Method Status                Protocol
/// GigabitEthernet0/0     192.168.1.10    YES NVRAM  up                    up
/// ```
pub fn parse_ip_interface_brief(output: &str) -> Vec<InterfaceBrief> {
    data_lines(output)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < MIN_BRIEF_FIELDS {
                return None;
            }
            Some(InterfaceBrief {
                name: parts[0].to_string(),
                status: parts[4].to_string(),
                protocol: parts[5].to_string(),
            })
        })
        .collect()
}

/// Parse `show interfaces status`.
///
/// The Name column is free text and often empty, so the fixed columns are
/// taken from the right: `... Status Vlan Duplex Speed Type`.
pub fn parse_interface_status(output: &str) -> Vec<PortStatus> {
    data_lines(output)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let n = parts.len();
            if n < MIN_STATUS_FIELDS {
                return None;
            }
            let raw_speed = parts[n - 2].to_string();
            Some(PortStatus {
                name: parts[0].to_string(),
                status: parts[n - 5].to_string(),
                vlan: parts[n - 4].to_string(),
                duplex: parts[n - 3].to_string(),
                speed: Speed::parse(&raw_speed),
                raw_speed,
            })
        })
        .collect()
}

/// Port names listed by `show interface status`, for rows with at least
/// [`MIN_AUDIT_FIELDS`] fields.
pub fn parse_status_ports(output: &str) -> Vec<String> {
    data_lines(output)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < MIN_AUDIT_FIELDS {
                return None;
            }
            Some(parts[0].to_string())
        })
        .collect()
}

/// Parse the `interface` / ` speed` lines of a running config into a map of
/// canonical interface name to configured speed (Mbps).
///
/// Works on the full running config or on a filtered one such as
/// `show running-config | include ^interface|^ speed`.
pub fn parse_speed_config(running_config: &str) -> HashMap<String, u32> {
    let mut speeds = HashMap::new();
    let mut current: Option<String> = None;

    for line in running_config.lines() {
        if let Some(name) = line.strip_prefix("interface ") {
            current = Some(canonical_interface_name(name.trim()));
            continue;
        }
        if !line.starts_with(' ') {
            current = None;
            continue;
        }
        let trimmed = line.trim();
        if let (Some(intf), Some(value)) = (current.as_ref(), trimmed.strip_prefix("speed ")) {
            if let Some(mbps) = Speed::parse(value).fixed_mbps() {
                speeds.insert(intf.clone(), mbps);
            }
        }
    }

    speeds
}

/// Parse the header lines of `show interfaces`:
///
/// ```text
/// GigabitEthernet0/1 is administratively down, line protocol is down
/// ```
pub fn parse_show_interfaces(output: &str) -> Vec<InterfaceDetail> {
    let re = match Regex::new(r"^(\S+) is (administratively down|up|down)[^,]*, line protocol is (\w+)") {
        Ok(re) => re,
        Err(e) => {
            tracing::error!("Invalid interface header pattern: {}", e);
            return Vec::new();
        }
    };

    output
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line.trim_end())?;
            Some(InterfaceDetail {
                name: caps[1].to_string(),
                is_enabled: &caps[2] != "administratively down",
                is_up: caps[3].eq_ignore_ascii_case("up"),
            })
        })
        .collect()
}

/// True when `show running-config interface <if> | include power inline`
/// returned a PoE line
pub fn poe_configured(output: &str) -> bool {
    output.to_lowercase().contains("power inline")
}

/// Decide whether `show power inline <if>` shows a powered device on `interface`.
///
/// ```text
/// Interface Admin  Oper       Power   Device              Class Max
///                             (Watts)
/// --------- ------ ---------- ------- ------------------- ----- ----
/// Gi1/0/1   auto   on         6.3     IP Phone 8841       2     30.0
/// ```
///
/// The interface row is matched by canonical name and reports PoE when the
/// oper state is `on` or the power draw is non-zero. When no row matches,
/// any `on` token in the output counts.
pub fn poe_detected(output: &str, interface: &str) -> bool {
    let wanted = canonical_interface_name(interface);

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 || canonical_interface_name(parts[0]) != wanted {
            continue;
        }
        let oper_on = parts[2].eq_ignore_ascii_case("on");
        let drawing = parts
            .get(3)
            .and_then(|p| p.parse::<f64>().ok())
            .map_or(false, |watts| watts > 0.0);
        return oper_on || drawing;
    }

    output
        .split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("on"))
}

/// Expand an abbreviated IOS interface name: `Gi1/0/1` -> `GigabitEthernet1/0/1`.
/// Unknown prefixes are returned unchanged.
pub fn canonical_interface_name(name: &str) -> String {
    const PREFIXES: &[(&str, &str)] = &[
        ("hundredgige", "HundredGigE"),
        ("hu", "HundredGigE"),
        ("fortygigabitethernet", "FortyGigabitEthernet"),
        ("fo", "FortyGigabitEthernet"),
        ("twentyfivegige", "TwentyFiveGigE"),
        ("twe", "TwentyFiveGigE"),
        ("tengigabitethernet", "TenGigabitEthernet"),
        ("te", "TenGigabitEthernet"),
        ("fivegigabitethernet", "FiveGigabitEthernet"),
        ("fi", "FiveGigabitEthernet"),
        ("twogigabitethernet", "TwoGigabitEthernet"),
        ("tw", "TwoGigabitEthernet"),
        ("gigabitethernet", "GigabitEthernet"),
        ("gi", "GigabitEthernet"),
        ("fastethernet", "FastEthernet"),
        ("fa", "FastEthernet"),
        ("ethernet", "Ethernet"),
        ("eth", "Ethernet"),
        ("et", "Ethernet"),
        ("port-channel", "Port-channel"),
        ("po", "Port-channel"),
        ("vlan", "Vlan"),
        ("vl", "Vlan"),
        ("loopback", "Loopback"),
        ("lo", "Loopback"),
    ];

    let trimmed = name.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (prefix, suffix) = trimmed.split_at(split);
    let lower = prefix.to_lowercase();

    for (short, full) in PREFIXES {
        if lower == *short {
            return format!("{}{}", full, suffix);
        }
    }
    trimmed.to_string()
}
