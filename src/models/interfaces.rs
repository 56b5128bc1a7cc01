use serde::Serialize;
use std::fmt;

/// Combined link state of an interface (admin status and line protocol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkState {
    Up,
    Down,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Up => write!(f, "UP"),
            LinkState::Down => write!(f, "DOWN"),
        }
    }
}

/// One row of `show ip interface brief`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceBrief {
    pub name: String,
    pub status: String,
    pub protocol: String,
}

impl InterfaceBrief {
    pub fn link_state(&self) -> LinkState {
        if self.status.eq_ignore_ascii_case("up") && self.protocol.eq_ignore_ascii_case("up") {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }
}

/// One interface header block of `show interfaces`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDetail {
    pub name: String,
    pub is_enabled: bool,
    pub is_up: bool,
}

/// Port speed as printed in the status column of `show interfaces status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Speed {
    /// `auto`: not negotiated yet (port down)
    Auto,
    /// `a-100`, `a-1000`: auto-negotiated rate
    Negotiated(u32),
    /// `100`, `1000`, `10G`: hardcoded in the running config
    Fixed(u32),
    Other(String),
}

impl Speed {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Speed::Auto;
        }
        if let Some(rest) = value.strip_prefix("a-").or_else(|| value.strip_prefix("A-")) {
            return match parse_mbps(rest) {
                Some(mbps) => Speed::Negotiated(mbps),
                None => Speed::Other(value.to_string()),
            };
        }
        match parse_mbps(value) {
            Some(mbps) => Speed::Fixed(mbps),
            None => Speed::Other(value.to_string()),
        }
    }

    /// The hardcoded rate, if the port has one
    pub fn fixed_mbps(&self) -> Option<u32> {
        match self {
            Speed::Fixed(mbps) => Some(*mbps),
            _ => None,
        }
    }
}

/// Parse `100`, `1000`, `10G`, `2.5G`, `100M` into megabits per second
fn parse_mbps(raw: &str) -> Option<u32> {
    let upper = raw.trim().to_uppercase();
    if let Some(num) = upper.strip_suffix('G') {
        let gbps: f64 = num.parse().ok()?;
        return Some((gbps * 1000.0).round() as u32);
    }
    let num = upper.strip_suffix('M').unwrap_or(&upper);
    num.parse().ok()
}

/// One row of `show interface status` / `show interfaces status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortStatus {
    pub name: String,
    pub status: String,
    pub vlan: String,
    pub duplex: String,
    /// Speed column exactly as printed
    pub raw_speed: String,
    pub speed: Speed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_is_case_insensitive() {
        let brief = InterfaceBrief {
            name: "Gi0/1".to_string(),
            status: "Up".to_string(),
            protocol: "UP".to_string(),
        };
        assert_eq!(brief.link_state(), LinkState::Up);

        let brief = InterfaceBrief {
            name: "Gi0/2".to_string(),
            status: "up".to_string(),
            protocol: "down".to_string(),
        };
        assert_eq!(brief.link_state(), LinkState::Down);
    }

    #[test]
    fn test_speed_parse() {
        assert_eq!(Speed::parse("100"), Speed::Fixed(100));
        assert_eq!(Speed::parse("a-100"), Speed::Negotiated(100));
        assert_eq!(Speed::parse("a-1000"), Speed::Negotiated(1000));
        assert_eq!(Speed::parse("auto"), Speed::Auto);
        assert_eq!(Speed::parse("10G"), Speed::Fixed(10000));
        assert_eq!(Speed::parse("2.5G"), Speed::Fixed(2500));
        assert_eq!(Speed::parse("100M"), Speed::Fixed(100));
        assert_eq!(Speed::parse("unknown"), Speed::Other("unknown".to_string()));
    }

    #[test]
    fn test_fixed_mbps_only_for_hardcoded() {
        assert_eq!(Speed::parse("100").fixed_mbps(), Some(100));
        assert_eq!(Speed::parse("a-100").fixed_mbps(), None);
        assert_eq!(Speed::parse("auto").fixed_mbps(), None);
    }
}
