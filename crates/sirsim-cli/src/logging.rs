//! # sirsim-cli::logging
//!
//! Tracing subscriber setup. The default filter is `info`; set `RUST_LOG`
//! to raise or lower it (per-event firing logs at `trace`).

use crate::args::LogFormat;
use tracing_subscriber::EnvFilter;

pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Human => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}
