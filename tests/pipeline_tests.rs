//! End-to-end runs of the walk + hash pipeline over scratch directory trees.

use picdigest::{
    DigestSet, HashCache, HashError, HashOpts, HashedFileCounter, digest_to_hex,
    get_or_compute_hash, hash_images_under_path, hash_images_with_opts,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

fn hex_of(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn run(root: &Path) -> (anyhow::Result<DigestSet>, HashCache, HashedFileCounter) {
    let cache = HashCache::new();
    let counter = HashedFileCounter::new();
    let result = hash_images_under_path(root, &cache, &counter);
    (result, cache, counter)
}

fn hash_error(err: &anyhow::Error) -> &HashError {
    err.downcast_ref::<HashError>()
        .expect("pipeline error should carry a HashError")
}

#[test]
fn test_non_image_files_only() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "notes.txt", b"hello");
    write(dir.path(), "a/b/data.bin", b"\x00\x01");
    write(dir.path(), "a/readme", b"no extension");

    let (result, cache, counter) = run(dir.path());
    assert!(result.unwrap().is_empty());
    assert_eq!(counter.get(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let (result, _, counter) = run(dir.path());
    assert!(result.unwrap().is_empty());
    assert_eq!(counter.get(), 0);
}

#[test]
fn test_distinct_images_counted_once_each() {
    let dir = TempDir::new().unwrap();
    let n = 25;
    for i in 0..n {
        write(
            dir.path(),
            &format!("d{}/img{}.jpg", i % 4, i),
            format!("image bytes {i}").as_bytes(),
        );
    }

    let (result, cache, counter) = run(dir.path());
    let digests = result.unwrap();
    assert_eq!(digests.len(), n);
    assert_eq!(counter.get(), n as u64);
    assert_eq!(cache.len(), n);
    assert!(digests.contains(&hex_of(b"image bytes 7")));
}

#[test]
fn test_identical_content_single_digest() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.gif", b"same bytes");
    write(dir.path(), "deep/er/two.BMP", b"same bytes");

    let (result, _, counter) = run(dir.path());
    let digests = result.unwrap();
    assert_eq!(digests.len(), 1);
    assert!(digests.contains(&hex_of(b"same bytes")));
    assert_eq!(counter.get(), 2);
}

#[test]
fn test_mixed_tree_scenario() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.png", b"X");
    write(dir.path(), "b.PNG", b"X");
    write(dir.path(), "c.txt", b"Y");
    write(dir.path(), "sub/d.jpg", b"Z");

    let (result, cache, counter) = run(dir.path());
    let digests = result.unwrap();
    let expected: DigestSet = [hex_of(b"X"), hex_of(b"Z")].into_iter().collect();
    assert_eq!(digests, expected);
    assert_eq!(counter.get(), 3);
    assert!(!cache.contains(&dir.path().join("c.txt")));
    assert!(cache.contains(&dir.path().join("a.png")));
}

#[test]
fn test_root_may_be_a_single_image() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "only.tiff", b"lonely");
    let (result, _, counter) = run(&file);
    assert_eq!(result.unwrap(), [hex_of(b"lonely")].into_iter().collect::<DigestSet>());
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_missing_root_is_walk_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let (result, _, counter) = run(&missing);
    let err = result.unwrap_err();
    match hash_error(&err) {
        HashError::Walk { path, .. } => assert_eq!(path, &missing),
        other => panic!("expected walk error, got {other:?}"),
    }
    assert_eq!(counter.get(), 0);
}

#[cfg(unix)]
#[test]
fn test_dangling_image_symlink_is_open_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.png", b"fine");
    let link = dir.path().join("broken.png");
    std::os::unix::fs::symlink(dir.path().join("gone.png"), &link).unwrap();

    let (result, _, _) = run(dir.path());
    let err = result.unwrap_err();
    match hash_error(&err) {
        HashError::Open { path, .. } => assert_eq!(path, &link),
        other => panic!("expected open error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_dangling_non_image_symlink_is_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.png", b"fine");
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken.txt")).unwrap();

    let (result, _, counter) = run(dir.path());
    assert_eq!(result.unwrap().len(), 1);
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_get_or_compute_hash_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "cached.jpeg", b"first version");
    let cache = HashCache::new();

    let first = get_or_compute_hash(&path, &cache).unwrap();
    assert_eq!(digest_to_hex(&first), hex_of(b"first version"));

    // A second read would see different bytes (or none at all).
    fs::write(&path, b"second version").unwrap();
    assert_eq!(get_or_compute_hash(&path, &cache).unwrap(), first);
    fs::remove_file(&path).unwrap();
    assert_eq!(get_or_compute_hash(&path, &cache).unwrap(), first);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_get_or_compute_hash_missing_file() {
    let dir = TempDir::new().unwrap();
    let cache = HashCache::new();
    let path = dir.path().join("nope.png");
    match get_or_compute_hash(&path, &cache) {
        Err(HashError::Open { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn test_cache_and_counter_shared_across_runs() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.jpg", b"A");
    write(dir.path(), "b.jpg", b"B");
    let cache = HashCache::new();
    let counter = HashedFileCounter::new();

    let first = hash_images_under_path(dir.path(), &cache, &counter).unwrap();
    assert_eq!(counter.get(), 2);

    // Stale cache entry wins: no invalidation within a cache's lifetime.
    fs::write(&a, b"A changed").unwrap();
    let second = hash_images_under_path(dir.path(), &cache, &counter).unwrap();
    assert_eq!(second, first);
    assert_eq!(counter.get(), 4);
    assert_eq!(cache.len(), 2);

    let fresh = hash_images_under_path(dir.path(), &HashCache::new(), &counter).unwrap();
    assert!(fresh.contains(&hex_of(b"A changed")));
    assert_eq!(counter.get(), 6);
}

#[test]
fn test_same_result_for_every_walk_mode_and_pool_size() {
    let dir = TempDir::new().unwrap();
    for i in 0..40 {
        let ext = ["jpg", "PNG", "gif", "txt"][i % 4];
        write(
            dir.path(),
            &format!("l{}/m{}/f{}.{}", i % 3, i % 5, i, ext),
            format!("content {}", i % 17).as_bytes(),
        );
    }
    let (baseline, _, baseline_count) = run(dir.path());
    let baseline = baseline.unwrap();
    assert_eq!(baseline_count.get(), 30);

    for use_parallel_walk in [false, true] {
        for num_threads in [1, 2, 8] {
            let opts = HashOpts {
                num_threads: Some(num_threads),
                channel_cap: Some(1),
                use_parallel_walk,
                ..Default::default()
            };
            let counter = HashedFileCounter::new();
            let digests =
                hash_images_with_opts(dir.path(), &HashCache::new(), &counter, &opts).unwrap();
            assert_eq!(digests, baseline, "parallel={use_parallel_walk} threads={num_threads}");
            assert_eq!(counter.get(), 30);
        }
    }
}

#[test]
fn test_cancel_flag_stops_run() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.png", b"A");
    let opts = HashOpts {
        cancel: Some(Arc::new(AtomicBool::new(true))),
        ..Default::default()
    };
    let counter = HashedFileCounter::new();
    let err = hash_images_with_opts(dir.path(), &HashCache::new(), &counter, &opts).unwrap_err();
    assert!(matches!(hash_error(&err), HashError::Cancelled));
    assert_eq!(counter.get(), 0);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_walk_error_for_both_walkers() {
    use std::os::unix::fs::PermissionsExt;

    // Permission bits do not stop root.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.png", b"A");
    write(dir.path(), "locked/b.png", b"B");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let mut outcomes = Vec::new();
    for use_parallel_walk in [false, true] {
        let opts = HashOpts {
            use_parallel_walk,
            ..Default::default()
        };
        let result =
            hash_images_with_opts(dir.path(), &HashCache::new(), &HashedFileCounter::new(), &opts);
        outcomes.push((use_parallel_walk, result));
    }
    // Restore before asserting so TempDir can clean up.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    for (use_parallel_walk, result) in outcomes {
        let err = match result {
            Ok(digests) => panic!("parallel={use_parallel_walk}: expected walk error, got {digests:?}"),
            Err(err) => err,
        };
        match hash_error(&err) {
            HashError::Walk { path, .. } => {
                assert_eq!(path, &locked, "parallel={use_parallel_walk}")
            }
            other => panic!("parallel={use_parallel_walk}: expected walk error, got {other:?}"),
        }
    }
}
