use colored::*;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{DeviceStatusRow, PingStatus, ReportRow};

/// One coloured line per pinged host
pub fn ping_line(host: &str, status: &PingStatus) -> String {
    match status {
        PingStatus::Up => format!("{} is UP", host).green().to_string(),
        PingStatus::Down => format!("{} is DOWN", host).red().to_string(),
        PingStatus::Error(e) => format!("{} check failed: {}", host, e).red().to_string(),
    }
}

/// Progress line for the firewall call sequence
pub fn step(message: &str) {
    println!("{} {}", "[+]".green().bold(), message);
}

pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

fn header_row(headers: &[&str]) -> Vec<Cell> {
    headers
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// The "Network Device Status" table: cyan device, magenta ping, green/yellow interface columns
pub fn device_status_table(rows: &[DeviceStatusRow]) -> Table {
    let mut table = new_table();
    table.set_header(header_row(DeviceStatusRow::HEADERS));

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.device).fg(Color::Cyan),
            Cell::new(row.ping.to_string()).fg(Color::Magenta),
            Cell::new(row.interfaces_text()).fg(Color::Green),
            Cell::new(row.interface_details_text()).fg(Color::Yellow),
        ]);
    }
    table
}

/// Plain table for any report row type
pub fn report_table<T: ReportRow>(rows: &[T]) -> Table {
    let mut table = new_table();
    table.set_header(header_row(T::HEADERS));
    for row in rows {
        table.add_row(row.cells());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterfaceState, SpeedChangeRow};

    #[test]
    fn test_ping_line_text() {
        colored::control::set_override(false);
        assert_eq!(ping_line("8.8.8.8", &PingStatus::Up), "8.8.8.8 is UP");
        assert_eq!(ping_line("192.168.1.1", &PingStatus::Down), "192.168.1.1 is DOWN");
        assert_eq!(
            ping_line("10.0.0.1", &PingStatus::Error("boom".to_string())),
            "10.0.0.1 check failed: boom"
        );
    }

    #[test]
    fn test_device_status_table_contains_rows() {
        let rows = vec![DeviceStatusRow {
            device: "Firewall1".to_string(),
            ping: PingStatus::Up,
            interfaces: vec![InterfaceState::new("Gi0/0", "UP")],
            interface_details: vec![InterfaceState::new("Gi0/0", "true")],
        }];
        let rendered = device_status_table(&rows).to_string();
        assert!(rendered.contains("Firewall1"));
        assert!(rendered.contains("Gi0/0: UP"));
    }

    #[test]
    fn test_report_table_has_headers() {
        let rows = vec![SpeedChangeRow::error("sw1", "connect failed: refused")];
        let rendered = report_table(&rows).to_string();
        assert!(rendered.contains("Old Speed"));
        assert!(rendered.contains("sw1"));
    }
}
