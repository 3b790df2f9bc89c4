//! Public and internal types for the picdigest API and pipeline.

use dashmap::DashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// BLAKE3 digest of a file's full contents.
pub type Digest = [u8; 32];

/// Distinct lowercase-hex digests seen among image files in one run.
pub type DigestSet = HashSet<String>;

/// Memoized `path → digest` map shared by every worker of a run, and by as many runs as the
/// caller likes. Cloning yields another handle to the same map.
///
/// Write-once per path: the first digest stored for a path is kept for the life of the cache.
/// Nothing is ever invalidated; a caller that expects files to change must drop the cache.
#[derive(Clone, Debug, Default)]
pub struct HashCache {
    map: Arc<DashMap<PathBuf, Digest>>,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached digest for exactly this path, if any.
    pub fn get(&self, path: &Path) -> Option<Digest> {
        self.map.get(path).map(|d| *d)
    }

    /// Store `digest` unless a digest is already present, and return whichever is stored.
    /// Two workers that raced on the same uncached path both end up with the winner's value.
    pub fn insert_once(&self, path: PathBuf, digest: Digest) -> Digest {
        *self.map.entry(path).or_insert(digest)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.map.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Monotonic count of image files successfully hashed (cache hits included).
/// Cloning yields another handle to the same counter.
#[derive(Clone, Debug, Default)]
pub struct HashedFileCounter {
    count: Arc<AtomicU64>,
}

impl HashedFileCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Add one and return the new total.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Lib options for [`hash_images_with_opts`](crate::hash_images_with_opts).
#[derive(Clone, Debug, Default)]
pub struct HashOpts {
    /// Override worker count. When None, half the available threads (capped by the FD limit).
    pub num_threads: Option<usize>,
    /// Path channel capacity. When None, [`PathChannelCap::DEFAULT`](crate::utils::PathChannelCap::DEFAULT).
    pub channel_cap: Option<usize>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Walk with jwalk (parallel directory reads) instead of walkdir.
    pub use_parallel_walk: bool,
    /// Caller-owned stop switch. Once set, the walk and workers stop between items and the run
    /// fails with [`HashError::Cancelled`](crate::HashError::Cancelled).
    pub cancel: Option<Arc<AtomicBool>>,
}

impl From<&HashOpts> for Opts {
    fn from(o: &HashOpts) -> Self {
        Opts {
            num_threads: o.num_threads,
            channel_cap: o.channel_cap,
            follow_links: o.follow_links,
            use_parallel_walk: o.use_parallel_walk,
            cancel: o.cancel.clone(),
            verbose: false,
            json: false,
        }
    }
}

/// Full options (CLI). Use [`HashOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    pub num_threads: Option<usize>,
    pub channel_cap: Option<usize>,
    pub follow_links: bool,
    pub use_parallel_walk: bool,
    pub cancel: Option<Arc<AtomicBool>>,
    /// Debug logging and a live counter bar.
    pub verbose: bool,
    /// Print a JSON report instead of one digest per line.
    pub json: bool,
}
