//! File hashing and the read-through digest cache.

use blake3::Hasher;
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::HashError;
use crate::utils::config::HashingConsts;
use crate::{Digest, HashCache};

/// Hash a file with blake3. Uses memory-mapped I/O for files above threshold, chunked reading otherwise.
pub fn hash_file(path: &Path) -> Result<Digest, HashError> {
    let file = File::open(path).map_err(|source| HashError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let read_err = |source| HashError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = file.metadata().map_err(read_err)?.len();
    let mut hasher = Hasher::new();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        // Mapped file must not be truncated while hashing; same caveat as any mmap reader.
        let mmap = unsafe { Mmap::map(&file) }.map_err(read_err)?;
        hasher.update(&mmap);
    } else {
        let mut reader = BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
        let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buffer).map_err(read_err)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Return the cached digest for `path`, or hash the file and cache the result.
///
/// No per-path lock: concurrent callers on the same uncached path may each hash it, and
/// [`HashCache::insert_once`] keeps the first digest stored. Every caller returns that stored value.
pub fn get_or_compute_hash(path: &Path, cache: &HashCache) -> Result<Digest, HashError> {
    if let Some(digest) = cache.get(path) {
        return Ok(digest);
    }
    let digest = hash_file(path)?;
    debug!("hashed {}", path.display());
    Ok(cache.insert_once(path.to_path_buf(), digest))
}

/// Lowercase hex encoding used as the result-set key.
pub fn digest_to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
