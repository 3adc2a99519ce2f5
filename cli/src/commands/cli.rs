use clap::{Args as ClapArgs, Parser, Subcommand};
use planlog_core::api::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "planlog", version, about = "Follow the live log of a remote plan run")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Service address, e.g. https://app.terraform.io (overrides config and PLANLOG_ADDRESS).
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// API token (overrides config and PLANLOG_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Read config from this file instead of the default search path.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a plan's log to stdout until the plan finishes.
    Logs(LogsArgs),
    /// Print the plan record as JSON.
    Show(PlanIdArgs),
    /// Print the JSON execution plan.
    JsonOutput(PlanIdArgs),
    /// Print the resources a plan changes.
    ResourceChanges(PlanIdArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlanIdArgs {
    pub plan_id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LogsArgs {
    pub plan_id: String,

    /// Initial delay between polls while the plan is quiet, in milliseconds.
    #[arg(long)]
    pub poll_min_ms: Option<u64>,

    /// Upper bound of the poll delay, in milliseconds.
    #[arg(long)]
    pub poll_max_ms: Option<u64>,
}

impl Args {
    /// CLI flags take priority over config file and environment.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(address) = self.address.as_deref().filter(|s| !s.trim().is_empty()) {
            cfg.api.address = address.to_string();
        }
        if let Some(token) = self.token.as_deref() {
            cfg.api.token = token.to_string();
        }
        if let Commands::Logs(logs) = &self.command {
            if let Some(v) = logs.poll_min_ms {
                cfg.stream.poll_min_ms = v;
            }
            if let Some(v) = logs.poll_max_ms {
                cfg.stream.poll_max_ms = v;
            }
        }
    }
}
