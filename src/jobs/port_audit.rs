use super::format_speed;
use crate::models::{Device, PortAuditRow};
use crate::parsers;
use crate::session::{close_session, Connector, RemoteSession, SessionError};

/// Interface headers and their speed lines from the running config
pub const SPEED_CONFIG_COMMAND: &str = "show running-config | include ^interface|^ speed";
pub const STATUS_COMMAND: &str = "show interface status";

pub fn poe_config_command(interface: &str) -> String {
    format!("show running-config interface {} | include power inline", interface)
}

/// Report-only audit: find ports hardcoded at `threshold_mbps` that also have
/// PoE configured, and recommend `recommended_mbps` for them.
pub async fn run(
    connector: &dyn Connector,
    devices: &[Device],
    threshold_mbps: u32,
    recommended_mbps: u32,
) -> Vec<PortAuditRow> {
    let mut rows = Vec::new();

    for device in devices {
        let name = device.display_name();
        tracing::info!("Auditing ports on {}", name);

        let mut session = match connector.connect(device).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Could not connect to {}: {}", name, e);
                rows.push(PortAuditRow::connection_failed(name, e));
                continue;
            }
        };

        let result = audit_switch(
            session.as_mut(),
            name,
            threshold_mbps,
            recommended_mbps,
            &mut rows,
        )
        .await;
        close_session(session, name).await;

        if let Err(e) = result {
            tracing::warn!("Port audit on {} failed: {}", name, e);
            rows.push(PortAuditRow::connection_failed(name, e));
        }
    }

    rows
}

/// Append one row per flagged port; rows found before a failure are kept
async fn audit_switch(
    session: &mut dyn RemoteSession,
    switch: &str,
    threshold_mbps: u32,
    recommended_mbps: u32,
    rows: &mut Vec<PortAuditRow>,
) -> Result<(), SessionError> {
    let speed_config = session.send_command(SPEED_CONFIG_COMMAND).await?;
    let configured = parsers::parse_speed_config(&speed_config);

    let status = session.send_command(STATUS_COMMAND).await?;

    for port in parsers::parse_status_ports(&status) {
        let canonical = parsers::canonical_interface_name(&port);
        if configured.get(&canonical) != Some(&threshold_mbps) {
            continue;
        }

        let poe = session.send_command(&poe_config_command(&port)).await?;
        if parsers::poe_configured(&poe) {
            tracing::info!("{} {} is fixed at {} with PoE", switch, port, format_speed(threshold_mbps));
            rows.push(PortAuditRow {
                switch: switch.to_string(),
                interface: port,
                current_speed: format_speed(threshold_mbps),
                recommended_speed: format_speed(recommended_mbps),
            });
        }
    }

    Ok(())
}
