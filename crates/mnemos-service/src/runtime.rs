//! Process bootstrap: resolve configuration, install logging, open the store.

use std::path::PathBuf;
use std::sync::Arc;

use mnemos_core::config::ObservabilityConfig;
use mnemos_core::{MnemosConfig, MnemosResult};
use mnemos_observability::tracing_setup;
use mnemos_storage::SqliteStore;

use crate::service::MemoryService;

/// Options for [`open_sqlite`].
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    /// SQLite database file. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    /// TOML configuration file layered under `MNEMOS_*` overrides.
    pub config_path: Option<PathBuf>,
    /// Install the global tracing subscriber from the resolved config.
    pub install_tracing: bool,
}

/// Resolve configuration and open a service over a SQLite store.
///
/// Configuration errors are fatal and returned before anything is opened.
pub fn open_sqlite(options: &ServiceOptions) -> MnemosResult<MemoryService<SqliteStore>> {
    let config = MnemosConfig::load(options.config_path.as_deref())?;
    if options.install_tracing {
        init_tracing(&config.observability);
    }

    let store = match &options.db_path {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_in_memory()?,
    };
    tracing::info!(
        event = "service_opened",
        db_path = ?options.db_path,
        group_id = %config.service.group_id,
        "memory service opened"
    );
    MemoryService::new(Arc::new(store), config)
}

/// Install the global subscriber described by `config`.
///
/// `MNEMOS_LOG` still wins when set. Returns `false` if a subscriber was
/// already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    match std::env::var(tracing_setup::LOG_FILTER_ENV) {
        Ok(_) if config.json_logs => tracing_setup::init_tracing(),
        Ok(filter) => tracing_setup::init_tracing_with_filter(&filter, false),
        Err(_) => tracing_setup::init_tracing_with_filter(&config.log_level, config.json_logs),
    }
}
