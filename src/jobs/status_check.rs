use crate::models::{Device, DeviceStatusRow, InterfaceDetail, InterfaceState};
use crate::parsers;
use crate::session::{close_session, Connector, RemoteSession};
use crate::status::{check_host, Pinger};

pub const BRIEF_COMMAND: &str = "show ip interface brief";
pub const DETAIL_COMMAND: &str = "show interfaces";

/// Ping each device, then read its interface tables over one CLI session
pub async fn run(
    pinger: &dyn Pinger,
    connector: &dyn Connector,
    devices: &[Device],
) -> Vec<DeviceStatusRow> {
    let mut rows = Vec::with_capacity(devices.len());
    for device in devices {
        rows.push(check_device(pinger, connector, device).await);
    }
    rows
}

async fn check_device(
    pinger: &dyn Pinger,
    connector: &dyn Connector,
    device: &Device,
) -> DeviceStatusRow {
    let name = device.display_name();
    let ping = check_host(pinger, device.address()).await;
    tracing::info!("{} ({}) ping: {}", name, device.address(), ping);

    let (interfaces, interface_details) = match connector.connect(device).await {
        Ok(mut session) => {
            let interfaces = brief_states(session.as_mut(), name).await;
            let details = detail_states(session.as_mut(), name).await;
            close_session(session, name).await;
            (interfaces, details)
        }
        Err(e) => {
            tracing::warn!("Could not open session to {}: {}", name, e);
            (vec![InterfaceState::error(&e)], vec![InterfaceState::error(&e)])
        }
    };

    DeviceStatusRow {
        device: name.to_string(),
        ping,
        interfaces,
        interface_details,
    }
}

async fn brief_states(session: &mut dyn RemoteSession, device: &str) -> Vec<InterfaceState> {
    match session.send_command(BRIEF_COMMAND).await {
        Ok(output) => parsers::parse_ip_interface_brief(&output)
            .iter()
            .map(|i| InterfaceState::new(&i.name, i.link_state().to_string()))
            .collect(),
        Err(e) => {
            tracing::warn!("{} on {} failed: {}", BRIEF_COMMAND, device, e);
            vec![InterfaceState::error(e)]
        }
    }
}

async fn detail_states(session: &mut dyn RemoteSession, device: &str) -> Vec<InterfaceState> {
    match session.send_command(DETAIL_COMMAND).await {
        Ok(output) => parsers::parse_show_interfaces(&output)
            .iter()
            .map(|d| InterfaceState::new(&d.name, detail_label(d)))
            .collect(),
        Err(e) => {
            tracing::warn!("{} on {} failed: {}", DETAIL_COMMAND, device, e);
            vec![InterfaceState::error(e)]
        }
    }
}

fn detail_label(detail: &InterfaceDetail) -> &'static str {
    if !detail.is_enabled {
        "ADMIN DOWN"
    } else if detail.is_up {
        "UP"
    } else {
        "DOWN"
    }
}
