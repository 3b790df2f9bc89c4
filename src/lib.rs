//! picdigest: concurrent content hashing of every image under a directory tree.
//!
//! One run walks the tree, feeds non-directory paths to a fixed pool of hash workers, and
//! returns the distinct BLAKE3 digests (lowercase hex) of the image files it found. Digests are
//! memoized per path in a caller-owned [`HashCache`], and every hashed image bumps a
//! caller-owned [`HashedFileCounter`]; both may be shared across runs.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::HashError;
pub use types::*;

pub use engine::hashing::{digest_to_hex, get_or_compute_hash, hash_file};
pub use engine::tools::{is_image_file, worker_count};

use log::debug;
use std::path::Path;

/// Result alias used by public picdigest API. Pipeline failures carry a [`HashError`]
/// (reach it with `err.downcast_ref::<HashError>()`).
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Hash every image under `root` with default options. See [`hash_images_with_opts`].
pub fn hash_images_under_path(
    root: &Path,
    cache: &HashCache,
    counter: &HashedFileCounter,
) -> Result<DigestSet> {
    hash_images_with_opts(root, cache, counter, &HashOpts::default())
}

/// Hash every image under `root` and return the distinct digests.
///
/// - Images are picked by extension (see [`is_image_file`]); everything else is skipped.
/// - Each image's digest comes from `cache` when present, otherwise the file is read and the
///   digest stored in `cache`.
/// - `counter` goes up once per image hashed, duplicates and cache hits included.
///
/// Any walk, open or read failure fails the whole run and no set is returned. Files hashed
/// before the failure stay in `cache`, so a retry only rereads what is missing.
pub fn hash_images_with_opts(
    root: &Path,
    cache: &HashCache,
    counter: &HashedFileCounter,
    opts: &HashOpts,
) -> Result<DigestSet> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::collect_digests(root, &opts, cache, counter)
}
