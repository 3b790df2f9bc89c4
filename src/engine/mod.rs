//! Engine module: hashing, filtering, and the CLI surface

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use hashing::{digest_to_hex, get_or_compute_hash, hash_file};
pub use tools::{default_worker_count, is_image_file, worker_count};
