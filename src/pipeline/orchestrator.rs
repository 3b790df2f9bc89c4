use anyhow::Result;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::tools::default_worker_count;
use crate::pipeline;
use crate::utils::config::PathChannelCap;
use crate::{DigestSet, HashCache, HashedFileCounter, Opts};

/// Worker count, walk mode and channel capacity from opts (falling back to live limits).
pub fn setup_pipeline_tuning(opts: &Opts) -> pipeline::PipelineTuning {
    let tuning = pipeline::PipelineTuning {
        num_threads: default_worker_count(opts.num_threads),
        parallel_walk: opts.use_parallel_walk,
        channel_cap: opts
            .channel_cap
            .unwrap_or(PathChannelCap::DEFAULT)
            .max(PathChannelCap::MIN),
    };
    debug!("pipeline tuning: {:?}", tuning);
    tuning
}

/// Start the walk + hash pipeline. Workers are spawned before the walk so the first paths
/// have somewhere to go. Caller must join the handles, then drain `err_rx`.
pub fn run_pipeline(
    root: &Path,
    opts: &Opts,
    cache: &HashCache,
    counter: &HashedFileCounter,
) -> pipeline::PipelineHandles {
    let tuning = setup_pipeline_tuning(opts);
    let channels =
        pipeline::create_pipeline_channels(root, opts, cache, counter, tuning.channel_cap);

    let digests = Arc::clone(&channels.shared.digests);
    let stop = channels.shared.stop.clone();

    let worker_handles = pipeline::spawn_hash_workers(
        channels.path_rx,
        &channels.shared,
        tuning.num_threads,
    );
    let walk_handle = pipeline::spawn_walk_thread(
        channels.path_tx,
        channels.ctx,
        tuning.parallel_walk,
    );

    // Only threads may hold error senders, so err_rx closes once they have all exited.
    drop(channels.shared);
    drop(channels.err_tx);

    pipeline::PipelineHandles {
        walk_handle,
        worker_handles,
        err_rx: channels.err_rx,
        digests,
        stop,
    }
}

/// Join the walk thread, then every worker. Returns `(paths_sent, files_hashed)` for this run.
pub fn shutdown_pipeline_handles(
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<usize>>,
) -> Result<(usize, usize)> {
    let path_count = walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;
    let mut hashed = 0_usize;
    let mut panicked = 0_usize;
    for h in worker_handles {
        match h.join() {
            Ok(n) => hashed += n,
            Err(_) => panicked += 1,
        }
    }
    if panicked > 0 {
        anyhow::bail!("{} hash worker(s) panicked", panicked);
    }
    Ok((path_count, hashed))
}

/// Main orchestrator: hash every image under `root` and return the distinct digests.
/// Walk → path channel → hash workers → digest set. Fails with the first error; no partial set.
pub fn collect_digests(
    root: &Path,
    opts: &Opts,
    cache: &HashCache,
    counter: &HashedFileCounter,
) -> Result<DigestSet> {
    let pipeline::PipelineHandles {
        walk_handle,
        worker_handles,
        err_rx,
        digests,
        stop,
    } = run_pipeline(root, opts, cache, counter);

    let (path_count, hashed) = shutdown_pipeline_handles(walk_handle, worker_handles)?;
    debug!(
        "main: pipeline joined, {} paths walked, {} images hashed",
        path_count, hashed
    );

    pipeline::check_for_first_error(&err_rx, &stop)?;

    let digests = Arc::try_unwrap(digests)
        .map_err(|_| anyhow::anyhow!("digest set still shared after workers joined"))?;
    Ok(digests.into_iter().collect())
}
