//! Pipeline context and tuning: shared state handed to the walk thread and the hash workers.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use dashmap::DashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::error::HashError;
use crate::{HashCache, HashedFileCounter, Opts};

/// Worker count, walk mode and path channel capacity for one run.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    pub parallel_walk: bool,
    pub channel_cap: usize,
}

/// Stop switch checked by the walk and by every worker between items.
///
/// `tripped` is per run and set by the first failure. `cancel` is the caller's flag, if any;
/// the pipeline only reads it.
#[derive(Clone, Debug)]
pub struct StopSignal {
    tripped: Arc<AtomicBool>,
    cancel: Option<Arc<AtomicBool>>,
}

impl StopSignal {
    pub fn new(cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            tripped: Arc::new(AtomicBool::new(false)),
            cancel,
        }
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::Relaxed);
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    pub fn should_stop(&self) -> bool {
        self.is_tripped() || self.cancel_requested()
    }
}

/// What the walk thread needs: where to start, how to walk, where to report.
pub struct PipelineContext {
    pub root: PathBuf,
    pub follow_links: bool,
    pub err_tx: Sender<HashError>,
    pub stop: StopSignal,
}

/// State every hash worker shares. Cloned once per worker.
#[derive(Clone)]
pub struct WorkerShared {
    pub cache: HashCache,
    pub counter: HashedFileCounter,
    pub digests: Arc<DashSet<String>>,
    pub err_tx: Sender<HashError>,
    pub stop: StopSignal,
}

/// Channels and shared state for one run. Walk gets path_tx + ctx; workers get path_rx + shared.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub err_tx: Sender<HashError>,
    pub err_rx: Receiver<HashError>,
    pub ctx: PipelineContext,
    pub shared: WorkerShared,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): join the threads, then drain `err_rx`.
/// The caller holds no error sender, so `err_rx` closes once every thread has exited.
pub struct PipelineHandles {
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<usize>>,
    pub err_rx: Receiver<HashError>,
    pub digests: Arc<DashSet<String>>,
    pub stop: StopSignal,
}

pub fn create_pipeline_channels(
    root: &Path,
    opts: &Opts,
    cache: &HashCache,
    counter: &HashedFileCounter,
    channel_cap: usize,
) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(channel_cap);
    let (err_tx, err_rx) = unbounded::<HashError>();
    let stop = StopSignal::new(opts.cancel.clone());

    let ctx = PipelineContext {
        root: root.to_path_buf(),
        follow_links: opts.follow_links,
        err_tx: err_tx.clone(),
        stop: stop.clone(),
    };

    let shared = WorkerShared {
        cache: cache.clone(),
        counter: counter.clone(),
        digests: Arc::new(DashSet::new()),
        err_tx: err_tx.clone(),
        stop,
    };

    PipelineChannels {
        path_tx,
        path_rx,
        err_tx,
        err_rx,
        ctx,
        shared,
    }
}
