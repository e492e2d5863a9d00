use clap::Parser;
use prdrift::adapters::storage::write_summary;
use prdrift::utils::logger;
use prdrift::{
    load_settings, CliConfig, DriftReporter, GitHubClient, JiraClient, LocalStorage, Reconciler,
    SyncError,
};
use std::sync::Arc;
use tokio::time::Instant;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting prdrift");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Reconciliation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // Anything that reaches here aborted the pass.
        std::process::exit(e.exit_code().max(1));
    }
}

async fn run(config: CliConfig) -> Result<(), SyncError> {
    // One deadline for the whole process, preflight included.
    let deadline = Instant::now() + config.timeout;
    let settings = Arc::new(load_settings(config.config.as_deref())?);

    let jira = JiraClient::new(
        &settings.tracker.url,
        &config.jira_token,
        &settings.tracker.linked_pr_field,
    )?;
    let github = GitHubClient::new(&settings.pull_requests.api_url, &config.github_token)?;
    jira.preflight().await?;
    github.preflight().await?;

    let structured = config.structured_output();
    if structured {
        tracing::info!("Structured output enabled, summary goes to {}", config.summary_path.display());
    }

    let reporter = Arc::new(DriftReporter::new(structured));
    let reconciler = Reconciler::new(
        Arc::new(jira),
        Arc::new(github),
        settings,
        Arc::clone(&reporter),
    )?
    .with_max_in_flight(config.max_in_flight);

    let summary = reconciler.run(deadline).await?;
    println!(
        "✅ {} issues checked, {} drifted, {} failed, {} skipped",
        summary.fetched, summary.drifted, summary.failed, summary.skipped
    );

    if let Some(payload) = reporter.payload() {
        let storage = LocalStorage::new(".".to_string());
        write_summary(&storage, &config.summary_path.to_string_lossy(), &payload).await?;
    }

    Ok(())
}
