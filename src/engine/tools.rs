//! Path filter and pool sizing utilities

use std::path::Path;

use crate::utils::config::{IMAGE_EXTENSIONS, WorkerThreadLimits};
use crate::utils::max_workers_by_fd_limit;

/// True when the file name ends in `.` plus one of [`IMAGE_EXTENSIONS`], ignoring case.
/// A bare `.png` counts. Only the name is looked at; contents are never sniffed.
pub fn is_image_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        name.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Worker count for a run: `requested` if given, else `limits.all_threads / limits.divisor`.
/// Never below `limits.floor`. The default (not an explicit request) is also capped by `fd_cap`.
pub fn worker_count(
    limits: WorkerThreadLimits,
    requested: Option<usize>,
    fd_cap: Option<usize>,
) -> usize {
    if let Some(n) = requested {
        return n.max(limits.floor);
    }
    let derived = (limits.all_threads / limits.divisor.max(1)).max(limits.floor);
    match fd_cap {
        Some(cap) => derived.min(cap).max(limits.floor),
        None => derived,
    }
}

/// [`worker_count`] with live thread and FD limits.
pub fn default_worker_count(requested: Option<usize>) -> usize {
    worker_count(
        WorkerThreadLimits::current(),
        requested,
        max_workers_by_fd_limit(),
    )
}
