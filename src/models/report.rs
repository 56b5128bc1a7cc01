use serde::Serialize;
use std::fmt;

/// Canonical action values for speed remediation rows
pub mod speed_action {
    pub const CHANGED: &str = "CHANGED";
    pub const SKIPPED: &str = "Skipped";
    pub const DRY_RUN: &str = "DRY-RUN";
    pub const ERROR: &str = "ERROR";
}

/// Canonical reason values for speed remediation rows
pub mod speed_reason {
    pub const PHONE_DETECTED: &str = "Phone detected";
    pub const NO_PHONE: &str = "No phone detected";

    /// Reason for ports not hardcoded at the threshold, e.g. "Not 100M"
    pub fn not_at_threshold(threshold_mbps: u32) -> String {
        format!("Not {}M", threshold_mbps)
    }
}

/// A flat record that can be written as one line of a tabular report.
/// `HEADERS` is written once, then `cells()` for every row in insertion order.
pub trait ReportRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Outcome of a single ping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingStatus {
    Up,
    Down,
    Error(String),
}

impl PingStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, PingStatus::Up)
    }
}

impl fmt::Display for PingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingStatus::Up => write!(f, "UP"),
            PingStatus::Down => write!(f, "DOWN"),
            PingStatus::Error(e) => write!(f, "ERROR ({})", e),
        }
    }
}

impl Serialize for PingStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingRow {
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "Status")]
    pub status: PingStatus,
}

impl ReportRow for PingRow {
    const HEADERS: &'static [&'static str] = &["Host", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![self.host.clone(), self.status.to_string()]
    }
}

/// Name/state pair shown in the interface columns of the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceState {
    pub name: String,
    pub state: String,
}

impl InterfaceState {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }

    /// Placeholder entry for a device whose interfaces could not be read
    pub fn error(reason: impl fmt::Display) -> Self {
        Self::new(format!("ERROR ({})", reason), "N/A")
    }
}

/// Per-device result of the combined ping + interface status check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatusRow {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Ping")]
    pub ping: PingStatus,
    #[serde(rename = "Interfaces")]
    pub interfaces: Vec<InterfaceState>,
    #[serde(rename = "Interface Details")]
    pub interface_details: Vec<InterfaceState>,
}

impl DeviceStatusRow {
    pub fn interfaces_text(&self) -> String {
        join_states(&self.interfaces)
    }

    pub fn interface_details_text(&self) -> String {
        join_states(&self.interface_details)
    }
}

fn join_states(states: &[InterfaceState]) -> String {
    states
        .iter()
        .map(|s| format!("{}: {}", s.name, s.state))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ReportRow for DeviceStatusRow {
    const HEADERS: &'static [&'static str] = &["Device", "Ping", "Interfaces", "Interface Details"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.device.clone(),
            self.ping.to_string(),
            self.interfaces_text(),
            self.interface_details_text(),
        ]
    }
}

/// A port hardcoded at the threshold speed with PoE configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortAuditRow {
    #[serde(rename = "Switch")]
    pub switch: String,
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename = "Current Speed")]
    pub current_speed: String,
    #[serde(rename = "Recommended Speed")]
    pub recommended_speed: String,
}

impl PortAuditRow {
    pub fn connection_failed(switch: &str, reason: impl fmt::Display) -> Self {
        Self {
            switch: switch.to_string(),
            interface: "N/A".to_string(),
            current_speed: "ERROR".to_string(),
            recommended_speed: format!("Connection failed: {}", reason),
        }
    }

    pub fn is_error(&self) -> bool {
        self.current_speed == "ERROR"
    }
}

impl ReportRow for PortAuditRow {
    const HEADERS: &'static [&'static str] =
        &["Switch", "Interface", "Current Speed", "Recommended Speed"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.switch.clone(),
            self.interface.clone(),
            self.current_speed.clone(),
            self.recommended_speed.clone(),
        ]
    }
}

/// Outcome of the speed remediation decision for one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeedChangeRow {
    #[serde(rename = "Switch")]
    pub switch: String,
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename = "Old Speed")]
    pub old_speed: String,
    #[serde(rename = "New Speed")]
    pub new_speed: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl SpeedChangeRow {
    pub fn error(switch: &str, reason: impl fmt::Display) -> Self {
        Self {
            switch: switch.to_string(),
            interface: "N/A".to_string(),
            old_speed: String::new(),
            new_speed: String::new(),
            action: speed_action::ERROR.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.action == speed_action::ERROR
    }
}

impl ReportRow for SpeedChangeRow {
    const HEADERS: &'static [&'static str] =
        &["Switch", "Interface", "Old Speed", "New Speed", "Action", "Reason"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.switch.clone(),
            self.interface.clone(),
            self.old_speed.clone(),
            self.new_speed.clone(),
            self.action.clone(),
            self.reason.clone(),
        ]
    }
}
