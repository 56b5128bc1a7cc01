use crate::models::PingRow;
use crate::report::console;
use crate::status::{check_host, Pinger};

/// Ping every host once, in list order, printing each result as it arrives
pub async fn run(pinger: &dyn Pinger, hosts: &[String]) -> Vec<PingRow> {
    let mut rows = Vec::with_capacity(hosts.len());

    for host in hosts {
        let status = check_host(pinger, host).await;
        println!("{}", console::ping_line(host, &status));
        rows.push(PingRow {
            host: host.clone(),
            status,
        });
    }

    let up = rows.iter().filter(|r| r.status.is_up()).count();
    tracing::info!("Ping sweep finished: {}/{} hosts up", up, rows.len());
    rows
}
