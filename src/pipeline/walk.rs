//! Common walk loop: consumes an iterator of walk outcomes and sends non-directory paths to path_tx.

use crossbeam_channel::Sender;
use log::{debug, warn};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::error::HashError;

use super::context::PipelineContext;

/// One result from a directory walk.
pub enum WalkOutcome {
    /// Anything that is not a directory: regular file, symlink, socket, ...
    Leaf(PathBuf),
    Dir,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a jwalk result into [`WalkOutcome`].
/// jwalk yields an unreadable directory as `Ok` with `read_children_error` set; that is a walk error.
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(mut entry) if entry.read_children_error.is_some() => {
            let msg = entry
                .read_children_error
                .take()
                .map(|err| format!("{}", err))
                .unwrap_or_default();
            WalkOutcome::Err {
                msg,
                path: Some(entry.path()),
            }
        }
        Ok(entry) if entry.file_type().is_dir() => WalkOutcome::Dir,
        Ok(entry) => WalkOutcome::Leaf(entry.path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_dir() => WalkOutcome::Dir,
        Ok(entry) => WalkOutcome::Leaf(entry.into_path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn jwalk_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    Box::new(
        jwalk::WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_secs(60),
            })
            .into_iter()
            .map(to_outcome_jwalk),
    )
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    Box::new(
        walkdir::WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

pub fn spawn_walk_thread(
    path_tx: Sender<PathBuf>,
    ctx: PipelineContext,
    parallel_walk: bool,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = match parallel_walk {
            true => {
                debug!("Walking in parallel");
                jwalk_iter(&ctx)
            }
            false => {
                debug!("Walking serially");
                walkdir_iter(&ctx)
            }
        };
        run_walk_loop(path_tx, ctx, iter)
    })
}

/// Run the common walk loop: send every leaf path to `path_tx`, skip directories.
///
/// The first walk error is sent on the error channel, trips the stop signal, and ends the walk.
/// The loop also ends when the stop signal is set or every worker has gone (send fails).
/// Drops `path_tx` on return so workers see end-of-input. Returns the count of paths sent.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, ctx: PipelineContext, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if ctx.stop.should_stop() {
            debug!("walk: stop requested after {} paths", count);
            break;
        }
        match outcome {
            WalkOutcome::Dir => {}
            WalkOutcome::Leaf(path) => {
                if path_tx.send(path).is_err() {
                    break;
                }
                count += 1;
            }
            WalkOutcome::Err { msg, path } => {
                let path = path.unwrap_or_else(|| ctx.root.clone());
                warn!("walk failed at {}: {}", path.display(), msg);
                let _ = ctx.err_tx.send(HashError::Walk { path, msg });
                ctx.stop.trip();
                break;
            }
        }
    }
    drop(path_tx);
    debug!("walk: done, {} paths sent", count);
    count
}
