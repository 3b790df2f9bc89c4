//! Load `.picdigest.toml` from the scanned directory (CLI only). The lib takes options through HashOpts.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    threads: Option<usize>,
    channel_cap: Option<usize>,
    follow_links: Option<bool>,
    parallel_walk: Option<bool>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Load the settings file from `dir`. `Ok(None)` if there is no readable file; `Err` if it is malformed.
/// Runs before logging is set up, so the caller reports the error.
pub(crate) fn load_settings_toml(dir: &Path) -> Result<Option<SettingsToml>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_settings_toml(&s)
        .map(Some)
        .with_context(|| format!("parse {}", path.display()))
}

pub(crate) fn parse_settings_toml(s: &str) -> std::result::Result<SettingsToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &SettingsToml, opts: &mut Opts) {
    let sec = &file.settings;
    if sec.threads.is_some() {
        opts.num_threads = sec.threads;
    }
    if sec.channel_cap.is_some() {
        opts.channel_cap = sec.channel_cap;
    }
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, parallel_walk => use_parallel_walk);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, json => json);
}
