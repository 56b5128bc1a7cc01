use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "netops")]
#[command(about = "Network operations toolkit: ping sweeps, switch port audits and firewall blocking.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping each host once and print UP/DOWN
    #[command(alias = "p")]
    Ping {
        /// Hosts to ping (defaults to PING_HOSTS)
        hosts: Vec<String>,
        /// Also write the results to a .xlsx/.csv/.json file
        #[arg(long)]
        report: Option<String>,
    },
    /// Ping devices and read their interface status over SSH
    #[command(alias = "s")]
    Status {
        /// Inventory CSV (defaults to the built-in firewall list)
        #[arg(long)]
        inventory: Option<String>,
        /// Report file, .xlsx/.csv/.json (defaults to STATUS_REPORT)
        #[arg(long)]
        report: Option<String>,
    },
    /// Report ports hardcoded at the threshold speed that have PoE configured
    #[command(alias = "a")]
    PortAudit {
        /// Switch inventory CSV (defaults to AUDIT_INVENTORY)
        #[arg(long)]
        inventory: Option<String>,
        /// Report file, .xlsx/.csv/.json (defaults to AUDIT_REPORT)
        #[arg(long)]
        report: Option<String>,
        /// Hardcoded speed (Mbps) to look for
        #[arg(long)]
        threshold: Option<u32>,
    },
    /// Raise hardcoded threshold-speed ports with a phone attached
    #[command(alias = "f")]
    SpeedFix {
        /// Switch inventory CSV (defaults to SPEED_INVENTORY)
        #[arg(long)]
        inventory: Option<String>,
        /// Report file, .xlsx/.csv/.json (defaults to SPEED_REPORT)
        #[arg(long)]
        report: Option<String>,
        /// Hardcoded speed (Mbps) that marks a port for upgrade
        #[arg(long)]
        threshold: Option<u32>,
        /// Speed (Mbps) to configure
        #[arg(long)]
        target: Option<u32>,
        /// Decide and report, but send no configuration
        #[arg(long)]
        dry_run: bool,
    },
    /// Block an IP on the Check Point management server
    #[command(alias = "b")]
    BlockIp {
        /// Address to block (defaults to BLOCK_IP)
        ip: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    /// Fold command line overrides into the loaded configuration
    pub fn apply_overrides(&self, cfg: &mut Config) {
        match self {
            Commands::Ping { hosts, .. } => {
                if !hosts.is_empty() {
                    cfg.ping_hosts = hosts.clone();
                }
            }
            Commands::Status { inventory, report } => {
                if inventory.is_some() {
                    cfg.status_inventory = inventory.clone();
                }
                if let Some(report) = report {
                    cfg.status_report = report.clone();
                }
            }
            Commands::PortAudit { inventory, report, threshold } => {
                if let Some(inventory) = inventory {
                    cfg.audit_inventory = inventory.clone();
                }
                if let Some(report) = report {
                    cfg.audit_report = report.clone();
                }
                if let Some(threshold) = threshold {
                    cfg.speed_threshold_mbps = *threshold;
                }
            }
            Commands::SpeedFix { inventory, report, threshold, target, .. } => {
                if let Some(inventory) = inventory {
                    cfg.speed_inventory = inventory.clone();
                }
                if let Some(report) = report {
                    cfg.speed_report = report.clone();
                }
                if let Some(threshold) = threshold {
                    cfg.speed_threshold_mbps = *threshold;
                }
                if let Some(target) = target {
                    cfg.speed_target_mbps = *target;
                }
            }
            Commands::BlockIp { ip } => {
                if let Some(ip) = ip {
                    cfg.checkpoint.block_ip = ip.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_subcommands_run_without_flags() {
        for sub in ["ping", "status", "port-audit", "speed-fix", "block-ip"] {
            assert!(CommandLine::try_parse_from(["netops", sub]).is_ok(), "{}", sub);
        }
    }

    #[test]
    fn test_speed_fix_overrides() {
        let cli = CommandLine::try_parse_from([
            "netops",
            "speed-fix",
            "--inventory",
            "lab.csv",
            "--threshold",
            "10",
            "--target",
            "100",
            "--dry-run",
        ])
        .unwrap();

        let mut cfg = Config::load();
        cli.command.apply_overrides(&mut cfg);

        assert_eq!(cfg.speed_inventory, "lab.csv");
        assert_eq!(cfg.speed_threshold_mbps, 10);
        assert_eq!(cfg.speed_target_mbps, 100);
        assert!(matches!(cli.command, Commands::SpeedFix { dry_run: true, .. }));
    }

    #[test]
    fn test_every_flag_has_help() {
        let cmd = CommandLine::command();
        for sub in cmd.get_subcommands() {
            for arg in sub.get_arguments() {
                if arg.get_id() == "help" {
                    continue;
                }
                assert!(
                    arg.get_help().is_some(),
                    "{} --{} has no help text",
                    sub.get_name(),
                    arg.get_id()
                );
            }
        }
    }

    #[test]
    fn test_ping_hosts_override() {
        let cli = CommandLine::try_parse_from(["netops", "ping", "10.0.0.1", "10.0.0.2"]).unwrap();
        let mut cfg = Config::load();
        cli.command.apply_overrides(&mut cfg);
        assert_eq!(cfg.ping_hosts, vec!["10.0.0.1", "10.0.0.2"]);
    }
}
