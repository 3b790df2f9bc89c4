//! File descriptor limit detection for capping the hash worker pool (Unix).

/// Open descriptors a hash worker holds at once: the file being hashed plus slack for its mmap.
pub const FDS_PER_WORKER: usize = 2;

/// Share of the process FD limit the worker pool may claim; the walk keeps directory handles open too.
const FD_LIMIT_FRACTION: f64 = 0.5;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY: no practical limit
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Largest worker count that stays under half the FD limit, or `None` when there is no limit.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    Some((usable / FDS_PER_WORKER).max(1))
}
