use crate::models::{speed_action, speed_reason, Device, PortStatus, SpeedChangeRow};
use crate::parsers;
use crate::session::{close_session, Connector, RemoteSession, SessionError};

pub const STATUS_COMMAND: &str = "show interfaces status";

pub fn poe_status_command(interface: &str) -> String {
    format!("show power inline {}", interface)
}

/// When and how to raise a port's speed
#[derive(Debug, Clone, Copy)]
pub struct SpeedPolicy {
    /// Ports hardcoded at this speed are candidates
    pub threshold_mbps: u32,
    /// Speed to configure on candidates with a powered device attached
    pub target_mbps: u32,
    /// Record what would change without sending any config
    pub dry_run: bool,
}

impl Default for SpeedPolicy {
    fn default() -> Self {
        Self {
            threshold_mbps: 100,
            target_mbps: 1000,
            dry_run: false,
        }
    }
}

impl SpeedPolicy {
    pub fn config_set(&self, interface: &str) -> Vec<String> {
        vec![
            format!("interface {}", interface),
            format!("speed {}", self.target_mbps),
            "end".to_string(),
        ]
    }
}

/// Check every port on every switch and raise hardcoded threshold-speed
/// ports that have a phone attached. One row per parsed port; a switch that
/// fails adds a single ERROR row.
pub async fn run(
    connector: &dyn Connector,
    devices: &[Device],
    policy: SpeedPolicy,
) -> Vec<SpeedChangeRow> {
    let mut rows = Vec::new();

    for device in devices {
        let name = device.display_name();
        tracing::info!("Connecting to {}", name);

        let mut session = match connector.connect(device).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", name, e);
                rows.push(SpeedChangeRow::error(name, e));
                continue;
            }
        };

        let result = fix_switch(session.as_mut(), name, &policy, &mut rows).await;
        close_session(session, name).await;

        if let Err(e) = result {
            tracing::warn!("Speed check on {} failed: {}", name, e);
            rows.push(SpeedChangeRow::error(name, e));
        }
    }

    let changed = rows.iter().filter(|r| r.action == speed_action::CHANGED).count();
    tracing::info!("Speed check finished: {} rows, {} ports changed", rows.len(), changed);
    rows
}

async fn fix_switch(
    session: &mut dyn RemoteSession,
    switch: &str,
    policy: &SpeedPolicy,
    rows: &mut Vec<SpeedChangeRow>,
) -> Result<(), SessionError> {
    let output = session.send_command(STATUS_COMMAND).await?;

    for port in parsers::parse_interface_status(&output) {
        let row = decide(session, switch, &port, policy).await?;
        rows.push(row);
    }

    Ok(())
}

async fn decide(
    session: &mut dyn RemoteSession,
    switch: &str,
    port: &PortStatus,
    policy: &SpeedPolicy,
) -> Result<SpeedChangeRow, SessionError> {
    let mut row = SpeedChangeRow {
        switch: switch.to_string(),
        interface: port.name.clone(),
        old_speed: port.raw_speed.clone(),
        new_speed: port.raw_speed.clone(),
        action: speed_action::SKIPPED.to_string(),
        reason: speed_reason::not_at_threshold(policy.threshold_mbps),
    };

    if port.speed.fixed_mbps() != Some(policy.threshold_mbps) {
        return Ok(row);
    }

    let poe = session.send_command(&poe_status_command(&port.name)).await?;
    if !parsers::poe_detected(&poe, &port.name) {
        row.reason = speed_reason::NO_PHONE.to_string();
        return Ok(row);
    }

    row.reason = speed_reason::PHONE_DETECTED.to_string();
    row.new_speed = policy.target_mbps.to_string();

    if policy.dry_run {
        tracing::info!(
            "{} {} has phone and is {}Mb -> would upgrade (dry run)",
            switch,
            port.name,
            policy.threshold_mbps
        );
        row.action = speed_action::DRY_RUN.to_string();
        return Ok(row);
    }

    tracing::info!(
        "{} {} has phone and is {}Mb -> upgrading",
        switch,
        port.name,
        policy.threshold_mbps
    );
    session.send_config_set(&policy.config_set(&port.name)).await?;
    row.action = speed_action::CHANGED.to_string();
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock::MockConnector;

    const STATUS: &str = "\
Port      Name               Status       Vlan       Duplex  Speed Type
Gi1/0/1   Lobby Phone        connected    10         full    100   10/100/1000BaseTX
Gi1/0/2                      connected    10         a-full  a-100 10/100/1000BaseTX
Gi1/0/3                      connected    20         full    100   10/100/1000BaseTX
Gi1/0/4   too short
";

    const POE_ON: &str = "\
Interface Admin  Oper       Power   Device              Class Max
                            (Watts)
--------- ------ ---------- ------- ------------------- ----- ----
Gi1/0/1   auto   on         6.3     IP Phone 8841       2     30.0
";

    const POE_OFF: &str = "\
Interface Admin  Oper       Power   Device              Class Max
                            (Watts)
--------- ------ ---------- ------- ------------------- ----- ----
Gi1/0/3   auto   off        0.0     n/a                 n/a   30.0
";

    fn switch() -> Device {
        Device {
            hostname: "access-sw1".to_string(),
            ip: "10.0.0.21".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            device_type: "cisco_ios".to_string(),
            vendor: None,
        }
    }

    fn connector() -> MockConnector {
        MockConnector::new()
            .respond(STATUS_COMMAND, STATUS)
            .respond(&poe_status_command("Gi1/0/1"), POE_ON)
            .respond(&poe_status_command("Gi1/0/3"), POE_OFF)
    }

    #[tokio::test]
    async fn test_threshold_port_with_phone_is_changed_once() {
        let connector = connector();
        let rows = run(&connector, &[switch()], SpeedPolicy::default()).await;

        // the short line contributes no row
        assert_eq!(rows.len(), 3);

        let changed: Vec<&SpeedChangeRow> = rows
            .iter()
            .filter(|r| r.action == speed_action::CHANGED)
            .collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].interface, "Gi1/0/1");
        assert_eq!(changed[0].old_speed, "100");
        assert_eq!(changed[0].new_speed, "1000");
        assert_eq!(changed[0].reason, speed_reason::PHONE_DETECTED);

        let recorded = connector.recorded();
        assert_eq!(
            recorded.config_sets,
            vec![vec![
                "interface Gi1/0/1".to_string(),
                "speed 1000".to_string(),
                "end".to_string()
            ]]
        );
        assert_eq!(recorded.disconnects, 1);
    }

    #[tokio::test]
    async fn test_skip_reasons() {
        let connector = connector();
        let rows = run(&connector, &[switch()], SpeedPolicy::default()).await;

        // auto-negotiated 100 is not a hardcoded speed
        assert_eq!(rows[1].interface, "Gi1/0/2");
        assert_eq!(rows[1].action, speed_action::SKIPPED);
        assert_eq!(rows[1].reason, "Not 100M");
        assert_eq!(rows[1].old_speed, "a-100");
        assert_eq!(rows[1].new_speed, "a-100");

        assert_eq!(rows[2].interface, "Gi1/0/3");
        assert_eq!(rows[2].action, speed_action::SKIPPED);
        assert_eq!(rows[2].reason, speed_reason::NO_PHONE);
        assert_eq!(rows[2].new_speed, "100");

        // PoE is only queried for ports fixed at the threshold
        let recorded = connector.recorded();
        let poe_queries = recorded
            .commands
            .iter()
            .filter(|c| c.starts_with("show power inline"))
            .count();
        assert_eq!(poe_queries, 2);
    }

    #[tokio::test]
    async fn test_dry_run_sends_no_config() {
        let connector = connector();
        let policy = SpeedPolicy {
            dry_run: true,
            ..Default::default()
        };
        let rows = run(&connector, &[switch()], policy).await;

        assert_eq!(rows[0].action, speed_action::DRY_RUN);
        assert_eq!(rows[0].new_speed, "1000");
        assert!(connector.recorded().config_sets.is_empty());
    }

    #[tokio::test]
    async fn test_connect_failure_is_one_error_row() {
        let connector = connector().refuse("10.0.0.21");
        let rows = run(&connector, &[switch()], SpeedPolicy::default()).await;

        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_error());
        assert_eq!(rows[0].switch, "access-sw1");
        assert_eq!(rows[0].reason, "connect failed: connection refused");
    }

    #[tokio::test]
    async fn test_command_failure_is_one_error_row_and_disconnects() {
        let connector = connector().fail_command(STATUS_COMMAND);
        let rows = run(&connector, &[switch(), switch()], SpeedPolicy::default()).await;

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_error()));
        assert_eq!(connector.recorded().disconnects, 2);
    }

    #[tokio::test]
    async fn test_rejected_config_is_one_error_row_per_switch() {
        let connector = connector().fail_config();
        let rows = run(&connector, &[switch(), switch()], SpeedPolicy::default()).await;

        // the first candidate fails on each switch; the second switch is still visited
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_error()));
        assert_eq!(rows[0].reason, "config failed: device rejected config (Invalid input detected)");

        let recorded = connector.recorded();
        assert_eq!(recorded.connects.len(), 2);
        assert_eq!(recorded.config_sets.len(), 2);
        assert_eq!(recorded.disconnects, 2);
    }

    #[tokio::test]
    async fn test_failed_disconnect_keeps_rows_and_next_switch() {
        let connector = connector().fail_disconnect();
        let rows = run(&connector, &[switch(), switch()], SpeedPolicy::default()).await;

        assert_eq!(rows.len(), 6);
        assert!(!rows.iter().any(|r| r.is_error()));
        assert_eq!(connector.recorded().disconnects, 2);
    }

    #[test]
    fn test_config_set_uses_target() {
        let policy = SpeedPolicy {
            target_mbps: 2500,
            ..Default::default()
        };
        assert_eq!(
            policy.config_set("Gi1/0/7"),
            vec!["interface Gi1/0/7", "speed 2500", "end"]
        );
    }
}
