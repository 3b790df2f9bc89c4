use crossbeam_channel::Receiver;
use log::{debug, warn};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::engine::hashing::{digest_to_hex, get_or_compute_hash};
use crate::engine::tools::is_image_file;

use super::context::WorkerShared;

/// Single hash worker: read paths from path_rx, hash the images, record digests.
/// Exits when the channel closes, the stop signal is set, or its own hash fails.
/// Returns how many files this worker hashed.
fn hash_worker_loop(path_rx: Receiver<PathBuf>, shared: WorkerShared) -> usize {
    let mut hashed = 0_usize;
    while let Ok(path) = path_rx.recv() {
        if shared.stop.should_stop() {
            break;
        }
        if !is_image_file(&path) {
            continue;
        }
        match get_or_compute_hash(&path, &shared.cache) {
            Ok(digest) => {
                shared.digests.insert(digest_to_hex(&digest));
                shared.counter.increment();
                hashed += 1;
            }
            Err(err) => {
                warn!("{}", err);
                let _ = shared.err_tx.send(err);
                shared.stop.trip();
                break;
            }
        }
    }
    debug!("worker: exiting after {} files", hashed);
    hashed
}

/// Spawn `num_threads` hash workers on `path_rx`. `path_rx` is consumed so that once every
/// worker has exited no receiver is left and the walk's next send fails.
pub fn spawn_hash_workers(
    path_rx: Receiver<PathBuf>,
    shared: &WorkerShared,
    num_threads: usize,
) -> Vec<JoinHandle<usize>> {
    (0..num_threads)
        .map(|_| {
            let path_rx = path_rx.clone();
            let shared = shared.clone();
            thread::spawn(move || hash_worker_loop(path_rx, shared))
        })
        .collect()
}
