use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Install the env_logger backend for the CLI. The library itself only emits through `log`.
///
/// Dependencies log at `Warn`; this crate at `Info`, or `Debug` when `verbose`.
/// `RUST_LOG` still applies on top (read by `from_default_env`).
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match record.level() {
                Level::Error => format!(
                    "[{} {} {}] {}",
                    name,
                    "ERROR".red(),
                    record.target().white(),
                    record.args()
                ),
                Level::Warn => format!(
                    "[{} {} {}] {}",
                    name,
                    "WARN".yellow(),
                    record.target().white(),
                    record.args()
                ),
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name, "debug".dimmed(), record.args())
                }
                Level::Info => format!("[{}] {}", name, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
