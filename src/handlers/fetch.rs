use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use console::{Term, style};
use dialoguer::{Input, Password};

use debrid_dl::config::ConfigManager;
use debrid_dl::credentials::KeyStore;
use debrid_dl::debrid::{DebridClient, PollOptions};
use debrid_dl::download::BatchSummary;
use debrid_dl::pipeline::{self, PipelineOptions};
use debrid_dl::report::ConsoleSink;

/// Run the acquisition pipeline for one or more magnets.
///
/// With a magnet argument this is a single batch invocation: one job, errors
/// propagate and the process exits non-zero. Without one it prompts in a
/// loop, reports each job's outcome, and offers to take another magnet.
pub async fn handle_fetch(
    config_manager: &ConfigManager,
    api_key: Option<String>,
    magnet: Option<String>,
    output: Option<String>,
    poll_seconds: Option<u64>,
    timeout_seconds: Option<u64>,
) -> Result<()> {
    let term = Term::stdout();
    let config = config_manager.config();

    let store = KeyStore::new()?;
    let api_key = resolve_api_key(&store, api_key)?;

    let output_dir =
        PathBuf::from(output.unwrap_or_else(|| config.general.output_directory.clone()));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let options = PipelineOptions {
        output_dir,
        poll: PollOptions {
            interval: Duration::from_secs(
                poll_seconds.unwrap_or(config.general.poll_interval_secs),
            ),
            timeout: Duration::from_secs(
                timeout_seconds.unwrap_or(config.general.timeout_secs),
            ),
        },
    };

    let client = DebridClient::with_base_url(&api_key, &config.remote.base_url)?;
    let sink = ConsoleSink::new();

    let single_shot = magnet.is_some();
    let mut pending = magnet;

    loop {
        let magnet = match pending.take() {
            Some(value) => value,
            None => prompt_magnet()?,
        };

        match pipeline::run_job(&client, &sink, &options, &magnet).await {
            Ok(summary) => report_summary(&term, &summary)?,
            Err(err) => {
                if single_shot {
                    return Err(err);
                }
                term.write_line(&format!("{} Job failed: {err:#}", style("❌").red()))?;
            }
        }

        if single_shot {
            break;
        }

        let next: String = Input::new()
            .with_prompt("Enter another magnet link (leave blank to exit)")
            .allow_empty(true)
            .interact_text()?;
        let next = next.trim().to_string();
        if next.is_empty() {
            break;
        }
        pending = Some(next);
    }

    Ok(())
}

fn report_summary(term: &Term, summary: &BatchSummary) -> Result<()> {
    if summary.completed_clean() {
        term.write_line(&format!("{} Done.", style("✅").green()))?;
    } else {
        term.write_line(&format!(
            "{} Completed with errors. Failed files: {} of {}",
            style("⚠️").yellow(),
            summary.failed,
            summary.attempted
        ))?;
        for failure in &summary.failures {
            term.write_line(&format!(
                "   {} file {}: {}",
                style("•").dim(),
                failure.position,
                failure.detail
            ))?;
        }
    }
    Ok(())
}

/// CLI flag wins, then the stored key, then an interactive prompt. Whatever
/// was used ends up in the store for the next run.
fn resolve_api_key(store: &KeyStore, flag: Option<String>) -> Result<String> {
    let resolved = match flag.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => value,
        _ => match store.load() {
            Some(value) => value,
            None => Password::new()
                .with_prompt("Enter your debrid API key")
                .interact()
                .context("An API key is required")?
                .trim()
                .to_string(),
        },
    };

    if resolved.is_empty() {
        bail!("An API key is required");
    }

    if store.load().as_deref() != Some(resolved.as_str()) {
        store.save(&resolved)?;
    }

    Ok(resolved)
}

fn prompt_magnet() -> Result<String> {
    let value: String = Input::new()
        .with_prompt("Enter magnet link")
        .interact_text()
        .context("A magnet link is required")?;
    let value = value.trim().to_string();
    if value.is_empty() {
        bail!("A magnet link is required");
    }
    Ok(value)
}
