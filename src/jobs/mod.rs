//! Inventory-driven jobs. Each one walks its device list strictly in order,
//! one device and one command at a time, and turns every outcome (including
//! failures) into report rows.

pub mod ping_sweep;
pub mod port_audit;
pub mod speed_fix;
pub mod status_check;

/// Human-readable rate: 100 -> "100 Mbps", 1000 -> "1 Gbps", 2500 -> "2500 Mbps"
pub fn format_speed(mbps: u32) -> String {
    if mbps >= 1000 && mbps % 1000 == 0 {
        format!("{} Gbps", mbps / 1000)
    } else {
        format!("{} Mbps", mbps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(100), "100 Mbps");
        assert_eq!(format_speed(1000), "1 Gbps");
        assert_eq!(format_speed(10000), "10 Gbps");
        assert_eq!(format_speed(2500), "2500 Mbps");
    }
}
