use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "prdrift")]
#[command(about = "Report issues whose workflow state disagrees with their linked pull requests")]
pub struct CliConfig {
    #[arg(
        long,
        default_value = "5m",
        value_parser = humantime::parse_duration,
        help = "Deadline for the whole pass (e.g. 300ms, 90s, 2h45m)"
    )]
    pub timeout: Duration,

    #[arg(long, help = "Optional TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "webhook-payload.json")]
    pub summary_path: PathBuf,

    #[arg(long, help = "Accumulate a markdown summary even outside CI")]
    pub structured: bool,

    #[arg(long, help = "Cap on concurrently evaluated issues (default: unbounded)")]
    pub max_in_flight: Option<usize>,

    #[arg(long, env = "JIRA_KEY", hide_env_values = true, default_value = "")]
    pub jira_token: String,

    #[arg(long, env = "GH_KEY", hide_env_values = true, default_value = "")]
    pub github_token: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Structured output is on when forced or when running under CI.
    pub fn structured_output(&self) -> bool {
        self.structured || is_ci()
    }
}

pub fn is_ci() -> bool {
    std::env::var("CI").map(|v| v == "true").unwrap_or(false)
}
