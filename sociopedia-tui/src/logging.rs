use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the Sociopedia client.
///
/// Logs go to a file because the terminal belongs to the TUI.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub enabled: bool,
    pub log_file: PathBuf,
    pub clear_on_startup: bool,
    pub features: LogFeatures,
    pub level: LevelFilter,
}

/// Per-category switches for the `log_*!` macros
#[derive(Debug, Clone)]
pub struct LogFeatures {
    pub key_events: bool,
    pub rendering: bool,
    pub api_calls: bool,
    /// Shared post collection replacements
    pub store_updates: bool,
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("sociopedia_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            key_events: false,
            rendering: false,
            api_calls: true,
            store_updates: true,
            general: true,
        }
    }
}

impl LogFeatures {
    fn all(enabled: bool) -> Self {
        Self {
            key_events: enabled,
            rendering: enabled,
            api_calls: enabled,
            store_updates: enabled,
            general: enabled,
        }
    }
}

impl LogConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            features: LogFeatures::all(false),
            ..Default::default()
        }
    }

    /// Errors and warnings only
    pub fn minimal() -> Self {
        Self {
            level: LevelFilter::Warn,
            features: LogFeatures::all(false),
            ..Default::default()
        }
    }

    pub fn verbose() -> Self {
        Self {
            level: LevelFilter::Trace,
            features: LogFeatures::all(true),
            ..Default::default()
        }
    }
}

/// Initialize the global logger from `config`
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!("Logging initialized: file={}, level={:?}", config.log_file.display(), config.level);
    log::debug!("Log features: {:?}", config.features);

    Ok(())
}

#[macro_export]
macro_rules! log_key_event {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.key_events {
            log::debug!(target: "key_events", $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_rendering {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.rendering {
            log::trace!(target: "rendering", $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.api_calls {
            log::info!(target: "api_calls", $($arg)*);
        }
    };
}

/// Logs replacements of the shared post collection
#[macro_export]
macro_rules! log_store_update {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.store_updates {
            log::debug!(target: "store_updates", $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.general {
            log::debug!(target: "general", $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let minimal = LogConfig::minimal();
        assert!(minimal.enabled);
        assert_eq!(minimal.level, LevelFilter::Warn);
        assert!(!minimal.features.api_calls);

        let verbose = LogConfig::verbose();
        assert_eq!(verbose.level, LevelFilter::Trace);
        assert!(verbose.features.key_events && verbose.features.store_updates);

        assert!(!LogConfig::disabled().enabled);
        assert_eq!(LogConfig::default().log_file, PathBuf::from("sociopedia_debug.log"));
    }

    #[test]
    fn test_macros_respect_flags() {
        // Expands and runs without a logger installed
        let config = LogConfig::disabled();
        log_api_call!(config, "GET {}", "/post/all");
        log_store_update!(config, "{} posts", 3);
        log_key_event!(LogConfig::verbose(), "key {:?}", 'l');
    }
}
