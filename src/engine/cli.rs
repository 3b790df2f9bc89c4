//! CLI command handler: hash the images under DIR and print the distinct digests.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::progress::CounterBar;
use crate::pipeline::collect_digests;
use crate::utils::settings_toml::{apply_file_to_opts, load_settings_toml};
use crate::utils::setup_logging;
use crate::{DigestSet, HashCache, HashedFileCounter, Opts};

/// JSON report printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    root: &'a Path,
    hashed_files: u64,
    distinct: usize,
    digests: Vec<&'a str>,
}

/// Settings file first, then explicit flags on top.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    let (file, file_err) = match load_settings_toml(&cli.dir) {
        Ok(file) => (file, None),
        Err(e) => (None, Some(e)),
    };
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    if cli.channel_cap.is_some() {
        opts.channel_cap = cli.channel_cap;
    }
    if let Some(v) = cli.follow_links {
        opts.follow_links = v;
    }
    if let Some(v) = cli.parallel_walk {
        opts.use_parallel_walk = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.json {
        opts.json = v;
    }
    setup_logging(opts.verbose);
    if let Some(e) = file_err {
        warn!("ignoring settings file: {:#}", e);
    }
    if file.is_some() {
        debug!("applied settings file from {}", cli.dir.display());
    }
    opts
}

fn sorted_digests(digests: &DigestSet) -> Vec<&str> {
    let mut sorted: Vec<&str> = digests.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted
}

fn print_report(root: &Path, digests: &DigestSet, hashed_files: u64, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let sorted = sorted_digests(digests);
    if json {
        let report = Report {
            root,
            hashed_files,
            distinct: sorted.len(),
            digests: sorted,
        };
        serde_json::to_writer_pretty(&mut out, &report).context("write JSON report")?;
        writeln!(out).context("write JSON report")?;
    } else {
        for digest in sorted {
            writeln!(out, "{}", digest).context("write digest")?;
        }
    }
    Ok(())
}

/// Run one hashing pass over `cli.dir`. Ctrl+C stops the walk and workers between items.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let mut opts = setup_opts(cli);

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    opts.cancel = Some(cancel_requested);

    let cache = HashCache::new();
    let counter = HashedFileCounter::new();
    let bar = opts.verbose.then(|| CounterBar::spawn(counter.clone()));

    debug!("Hashing images under {}...", cli.dir.display());
    let result = collect_digests(&cli.dir, &opts, &cache, &counter);
    if let Some(bar) = bar {
        bar.finish();
    }
    let digests = result.with_context(|| format!("hash images under {}", cli.dir.display()))?;

    info!(
        "{} distinct digests from {} image files",
        digests.len(),
        counter.get()
    );
    print_report(&cli.dir, &digests, counter.get(), opts.json)
}
