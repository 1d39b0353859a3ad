use std::path::PathBuf;

use clap::{Parser, Subcommand};
use status_core::domain::ServiceState;

fn parse_state(raw: &str) -> Result<ServiceState, String> {
    raw.parse::<ServiceState>().map_err(|e| {
        format!(
            "{} (expected one of operational, degraded, outage, maintenance)",
            e.details.unwrap_or(e.message)
        )
    })
}

#[derive(Debug, Parser)]
#[command(
    name = "statusboard",
    about = "Terminal dashboard for service incidents reported by the status API",
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Base URL of the status API (overrides STATUSBOARD_API_URL and the config file)"
    )]
    pub api_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_CONFIG",
        help = "JSON config file with api_url, timeout_ms and recent_count"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Per-request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(
        long,
        global = true,
        help = "Use an in-memory demo API instead of the network"
    )]
    pub demo: bool,

    #[arg(short, long, global = true, help = "Debug-level logs on stderr")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Disable ANSI colors")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the most recent incidents.
    List {
        #[arg(long, help = "Number of incidents to fetch (1-50)")]
        count: Option<u32>,
        #[arg(long, help = "Only incidents created at or after this ISO timestamp")]
        since: Option<String>,
        #[arg(long, help = "Fetch and show each incident's history")]
        history: bool,
    },
    /// Ask the server to synthesize a new incident.
    Generate {
        #[arg(long, value_parser = parse_state, help = "Requested state; random when omitted")]
        state: Option<ServiceState>,
    },
    /// Mark incidents operational. All requests are issued at once.
    Resolve {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Show the state history of one incident.
    History { id: i64 },
    /// Check API liveness.
    Health,
    /// Read commands from stdin while responses arrive in the background.
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_state_with_legacy_alias() {
        let cli = Cli::try_parse_from(["statusboard", "generate", "--state", "MAJOR"]).expect("parse");
        match cli.command {
            Command::Generate { state } => assert_eq!(state, Some(ServiceState::Outage)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_state_and_empty_resolve() {
        assert!(Cli::try_parse_from(["statusboard", "generate", "--state", "melting"]).is_err());
        assert!(Cli::try_parse_from(["statusboard", "resolve"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["statusboard", "resolve", "3", "4", "--demo", "-v"]).expect("parse");
        assert!(cli.demo);
        assert!(cli.verbose);
        match cli.command {
            Command::Resolve { ids } => assert_eq!(ids, vec![3, 4]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
