use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Hash every image under a directory and print the distinct digests.
#[derive(Clone, Parser)]
#[command(name = "picdigest")]
#[command(about = "Hash every image under DIR (jpg, jpeg, png, gif, bmp, tiff) and print the distinct BLAKE3 digests.")]
pub struct Cli {
    /// Directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Hash worker count. Default: half the available threads.
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Capacity of the walk → worker path queue.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Read directories in parallel (jwalk) instead of one at a time.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel_walk: Option<bool>,

    /// Verbose output: debug logging and a live counter.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print a JSON report instead of one digest per line.
    #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,
}
