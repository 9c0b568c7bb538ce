//! Stakied Sequencer
//!
//! Off-chain single-writer host for the protocol. Replays a JSON-lines
//! transaction journal through the protocol actor, then reports the final
//! state and optionally writes it out as a JSON snapshot.
//!
//! `--submit <file>` runs new entries after the replay and appends the
//! committed ones to the journal.

mod actor;
mod config;
mod journal;

use actor::{SequencerError, SequencerHandle};
use anyhow::{bail, Context as _, Result};
use config::Config;
use journal::JournalEntry;
use stakied_core::{Context, Protocol};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let pending = match args.as_slice() {
        [flag, path] if flag == "--write-default-config" => return Config::write_default(path),
        [flag, path] if flag == "--submit" => Some(PathBuf::from(path)),
        [] => None,
        other => bail!("Unexpected arguments: {:?}", other),
    };

    log::info!("Starting Stakied sequencer");

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using local defaults", e);
        Config::default_local()
    });
    log::info!("Protocol owner: {}", config.owner);
    log::info!("Journal: {}", config.journal_path().display());

    let genesis = Protocol::genesis(config.owner, config.params, config.genesis_height)
        .context("Invalid protocol parameters")?;
    let journal_path = config.journal_path();
    let entries = match journal::read(&journal_path).await {
        Ok(entries) => entries,
        // a fresh journal starts empty when there is something to submit
        Err(e) if pending.is_some() && !journal_path.exists() => {
            log::warn!("{:#}; starting from genesis", e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let (handle, task) = actor::spawn(genesis, config.queue_capacity);
    let mut report = replay(&handle, entries, None).await?;

    if let Some(path) = pending {
        let submitted = journal::read(&path).await?;
        let added = replay(&handle, submitted, Some(&journal_path)).await?;
        log::info!(
            "Submitted {}: {} appended to journal, {} rejected",
            path.display(),
            added.committed,
            added.rejected
        );
        report.committed += added.committed;
        report.rejected += added.rejected;
    }
    log_summary(&handle.snapshot(), &report);

    drop(handle);
    let protocol = task.await.context("Sequencer task failed")?;

    if let Some(path) = config.snapshot_path() {
        let json = serde_json::to_string_pretty(&protocol).context("Failed to encode snapshot")?;
        tokio::fs::write(&path, json)
            .await
            .context(format!("Failed to write snapshot to {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ReplayReport {
    committed: usize,
    rejected: usize,
}

/// Feed entries through the actor in order. With `journal` set, each
/// committed entry is appended there before the next one runs.
async fn replay(
    handle: &SequencerHandle,
    entries: Vec<JournalEntry>,
    journal: Option<&Path>,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (i, entry) in entries.into_iter().enumerate() {
        let name = entry.command.name();
        let ctx = Context::new(entry.caller, entry.height);
        match handle.submit(ctx, entry.command.clone()).await {
            Ok(receipt) => {
                report.committed += 1;
                log::debug!("#{} {} at {}: {:?}", i, name, entry.height, receipt);
                if let Some(path) = journal {
                    journal::append(path, &entry).await?;
                }
            }
            Err(SequencerError::ShutDown) => {
                log::error!("Sequencer stopped while replaying entry #{}", i);
                bail!(SequencerError::ShutDown);
            }
            Err(e) => {
                report.rejected += 1;
                log::warn!("#{} {} by {} at {}: {}", i, name, entry.caller, entry.height, e);
            }
        }
    }

    Ok(report)
}

fn log_summary(protocol: &Protocol, report: &ReplayReport) {
    log::info!(
        "Replayed {} entries: {} committed, {} rejected",
        report.committed + report.rejected,
        report.committed,
        report.rejected
    );
    log::info!(
        "Height {}, SY supply {}, exchange rate {}",
        protocol.last_block(),
        protocol.sy_total_supply(),
        protocol.exchange_rate()
    );
    for (maturity, book) in protocol.splitter().books() {
        log::info!(
            "Maturity {}: PT/YT supply {}, SY backing {}",
            maturity,
            book.pt.total_supply(),
            book.sy_backing
        );
    }
    for pool in protocol.pools().pools() {
        log::info!(
            "Pool {}: PT reserve {}, SY reserve {}, LP supply {}, swaps {}",
            pool.maturity,
            pool.pt_reserve,
            pool.sy_reserve,
            pool.lp.total_supply(),
            pool.counters.swap_count
        );
    }
}
