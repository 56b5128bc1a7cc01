mod checkpoint;
mod cli;
mod config;
mod inventory;
mod jobs;
mod models;
mod parsers;
mod report;
mod session;
mod status;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkpoint::{BlockRequest, CheckPointClient, HttpTransport};
use cli::{CommandLine, Commands};
use config::Config;
use jobs::speed_fix::SpeedPolicy;
use report::console;
use session::SshConnector;
use status::SystemPinger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netops=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let commands = CommandLine::parse_args();

    // Load configuration
    let mut cfg = Config::load();
    commands.command.apply_overrides(&mut cfg);

    match commands.command {
        Commands::Ping { report, .. } => run_ping(&cfg, report.as_deref()).await,
        Commands::Status { .. } => run_status(&cfg).await,
        Commands::PortAudit { .. } => run_port_audit(&cfg).await,
        Commands::SpeedFix { dry_run, .. } => run_speed_fix(&cfg, dry_run).await,
        Commands::BlockIp { .. } => run_block_ip(&cfg).await,
    }
}

async fn run_ping(cfg: &Config, report: Option<&str>) -> anyhow::Result<()> {
    let pinger = SystemPinger::new(cfg.ping_timeout_secs);
    let rows = jobs::ping_sweep::run(&pinger, &cfg.ping_hosts).await;

    if let Some(path) = report {
        report::write_report(path, "Ping Sweep", &rows)?;
    }
    Ok(())
}

async fn run_status(cfg: &Config) -> anyhow::Result<()> {
    let devices = match &cfg.status_inventory {
        Some(path) => inventory::load_csv(path)?,
        None => inventory::default_status_devices(),
    };
    tracing::info!("Checking {} devices", devices.len());

    let pinger = SystemPinger::new(cfg.ping_timeout_secs);
    let connector = SshConnector::new(cfg.ssh_port, cfg.ssh_timeout_secs);
    let rows = jobs::status_check::run(&pinger, &connector, &devices).await;

    println!("Network Device Status");
    println!("{}", console::device_status_table(&rows));

    report::write_report(&cfg.status_report, "Network Device Status", &rows)?;
    console::success(&format!("Report saved to {}", cfg.status_report));
    Ok(())
}

async fn run_port_audit(cfg: &Config) -> anyhow::Result<()> {
    let devices = inventory::load_csv(&cfg.audit_inventory)?;
    let connector = SshConnector::new(cfg.ssh_port, cfg.ssh_timeout_secs);

    let rows = jobs::port_audit::run(
        &connector,
        &devices,
        cfg.speed_threshold_mbps,
        cfg.speed_target_mbps,
    )
    .await;

    let failed = rows.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        tracing::warn!("{} switch(es) could not be audited", failed);
    }

    report::write_report(&cfg.audit_report, "Switch Port Report", &rows)?;
    println!("Report saved to {}", cfg.audit_report);
    Ok(())
}

async fn run_speed_fix(cfg: &Config, dry_run: bool) -> anyhow::Result<()> {
    let devices = inventory::load_csv(&cfg.speed_inventory)?;
    let connector = SshConnector::new(cfg.ssh_port, cfg.ssh_timeout_secs);
    let policy = SpeedPolicy {
        threshold_mbps: cfg.speed_threshold_mbps,
        target_mbps: cfg.speed_target_mbps,
        dry_run,
    };

    let rows = jobs::speed_fix::run(&connector, &devices, policy).await;
    let failed = rows.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        tracing::warn!("{} switch(es) reported errors", failed);
    }
    println!("{}", console::report_table(&rows));

    report::write_report(&cfg.speed_report, "Switch Port Speed Audit", &rows)?;
    console::success(&format!("Report written to {}", cfg.speed_report));
    Ok(())
}

async fn run_block_ip(cfg: &Config) -> anyhow::Result<()> {
    let cp = &cfg.checkpoint;
    if cp.password.is_empty() {
        tracing::warn!("CHECKPOINT_PASSWORD is empty; login will likely fail");
    }

    let transport = HttpTransport::new(cp.insecure_tls)?;
    let mut client = CheckPointClient::new(&cp.url, Box::new(transport));
    let request = BlockRequest::from_config(cp, &cp.block_ip);

    checkpoint::block_ip(&mut client, &request).await?;
    console::success("Done. Malicious IP blocked successfully.");
    Ok(())
}
