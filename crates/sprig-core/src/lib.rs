//! Sprig Core
//!
//! Shared plumbing for the Sprig crates: logging, profiling, configuration,
//! math re-exports and the integer/float rectangle types used for texture
//! regions.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use config::{Config, ProfilingMode};

/// Apply a [`Config`]: install the log subscriber and, if requested, start
/// the profiler.
pub fn init(config: &Config) {
    logging::init_with_filter(&config.log_filter);

    match config.profiling {
        ProfilingMode::Off => {}
        ProfilingMode::Scopes => puffin::set_scopes_on(true),
        #[cfg(feature = "profiling")]
        ProfilingMode::PuffinHttp => {
            profiling::init_profiling(profiling::ProfilingBackend::PuffinHttp)
        }
    }
}
