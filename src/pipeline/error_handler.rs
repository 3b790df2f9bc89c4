use anyhow::Result;
use crossbeam_channel::Receiver;

use super::context::StopSignal;
use crate::error::HashError;

/// Drain the error channel and pick the error to surface: the walk's own error if there is one,
/// otherwise the first error received. Blocks until every sender is dropped.
pub fn first_error(err_rx: &Receiver<HashError>) -> Option<HashError> {
    let mut first: Option<HashError> = None;
    for err in err_rx.iter() {
        match &first {
            None => first = Some(err),
            Some(current) if !current.is_walk() && err.is_walk() => first = Some(err),
            Some(_) => log::debug!("suppressed after first error: {}", err),
        }
    }
    first
}

/// Check pipeline result after joining walk and workers: the first error wins; a run stopped
/// by the caller's cancel flag with no error of its own fails as [`HashError::Cancelled`].
pub fn check_for_first_error(err_rx: &Receiver<HashError>, stop: &StopSignal) -> Result<()> {
    if let Some(err) = first_error(err_rx) {
        return Err(err.into());
    }
    if stop.cancel_requested() {
        return Err(HashError::Cancelled.into());
    }
    Ok(())
}
