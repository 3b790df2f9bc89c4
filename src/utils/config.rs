//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Per-directory settings file read by the CLI (e.g. `.picdigest.toml`).
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }
}

// ---- Image filter ----

/// Lowercase extensions (without the dot) treated as images. Matching is case-insensitive.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

// ---- Worker threads ----

/// Limits for sizing the hash worker pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Workers get `all_threads / divisor` threads.
    pub divisor: usize,
    /// Never fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            divisor: Self::DIVISOR,
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    /// Hashing is I/O heavy; half the logical CPUs keeps concurrent opens bounded.
    pub const DIVISOR: usize = 2;
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Path channel ----

/// Capacity of the walk → worker path channel. The walk blocks once this many paths are queued.
pub struct PathChannelCap;

impl PathChannelCap {
    pub const DEFAULT: usize = 10_000;
    pub const MIN: usize = 1;
}

// ---- Progress ----

/// How often the CLI counter bar polls the hashed-file counter (milliseconds).
pub const PROGRESS_POLL_MS: u64 = 100;
