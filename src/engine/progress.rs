//! Live counter for the CLI: polls the hashed-file counter from a side thread.

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::HashedFileCounter;
use crate::utils::config::PROGRESS_POLL_MS;

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " images"
    )))
}

/// Move the bar to `n`. Uses try_lock so a slow terminal never holds up the poller.
pub fn set_bar_count(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update_to(n);
    }
}

/// Counter bar driven by a [`HashedFileCounter`]. Call [`CounterBar::finish`] when the run ends.
pub struct CounterBar {
    done: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CounterBar {
    /// Start polling `counter` every [`PROGRESS_POLL_MS`] ms. The bar shows images hashed in
    /// this run only (the counter's value at spawn time is the zero point).
    pub fn spawn(counter: HashedFileCounter) -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let done_poller = Arc::clone(&done);
        let start = counter.get();
        let handle = thread::spawn(move || {
            let bar = create_counter("Hashing");
            loop {
                let finished = done_poller.load(Ordering::Relaxed);
                set_bar_count(&bar, counter.get().saturating_sub(start) as usize);
                if finished {
                    break;
                }
                thread::sleep(Duration::from_millis(PROGRESS_POLL_MS));
            }
            if let Ok(mut b) = bar.lock() {
                let _ = b.refresh();
            }
            eprintln!();
        });
        Self { done, handle }
    }

    /// Final refresh, then join the poller.
    pub fn finish(self) {
        self.done.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}
