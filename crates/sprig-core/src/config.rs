/// Default log filter: everything at `info`, noisy GPU crates at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Process-wide configuration for the Sprig crates.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing-subscriber` filter directive. `RUST_LOG` takes precedence.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, profiling: ProfilingMode) -> Self {
        self.profiling = profiling;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling scopes are compiled in but not recorded
    Off,
    /// Scopes are recorded in-process (e.g. for an embedded viewer)
    Scopes,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP
    #[cfg(feature = "profiling")]
    PuffinHttp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.profiling, ProfilingMode::Off);
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_log_filter("debug")
            .with_profiling(ProfilingMode::Scopes);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.profiling, ProfilingMode::Scopes);
    }
}
