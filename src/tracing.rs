//! Subscriber setup for the `vigil-tracing` feature.
//!
//! Installs a fmt layer with file names, line numbers, levels and close-span
//! events. The level can be changed with [`set_tracing_level`] before the server
//! starts.

use parking_lot::{RwLock, const_rwlock};
use tracing_subscriber::{
    Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

pub use tracing::level_filters::LevelFilter;

static TRACING_LEVEL: RwLock<LevelFilter> = const_rwlock(LevelFilter::DEBUG);

/// Sets the level used by [`init_tracing`]. Has no effect once it ran.
pub fn set_tracing_level(level_filter: LevelFilter) {
    *TRACING_LEVEL.write() = level_filter;
}

pub fn tracing_level() -> LevelFilter {
    *TRACING_LEVEL.read()
}

/// Initializes the global subscriber. Does nothing if one is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .with_filter(tracing_level()),
        )
        .try_init();
}
