pub mod config;
pub mod report;
pub mod sample;
pub mod survey;

use std::error::Error;

use literacy_core::{Catalog, Config, Database, ProgressStore, Session};

/// Catalog from `survey.catalog_path`, or the built-in questionnaire.
pub(crate) fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn Error>> {
    match &config.survey.catalog_path {
        Some(path) => Ok(Catalog::from_toml_file(path)?),
        None => Ok(Catalog::builtin()),
    }
}

/// Restore the persisted session from the data directory.
pub(crate) fn open_session(config: &Config) -> Result<Session, Box<dyn Error>> {
    let catalog = load_catalog(config)?;
    let store = ProgressStore::new(Database::open()?);
    Ok(Session::restore(catalog, store))
}

/// Session that never touches the data directory, for sample views.
pub(crate) fn scratch_session(config: &Config) -> Result<Session, Box<dyn Error>> {
    Ok(Session::new(load_catalog(config)?, ProgressStore::in_memory()?))
}

pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Report a blocked transition and exit.
pub(crate) fn blocked(reason: &str) -> ! {
    eprintln!("{reason}");
    std::process::exit(1);
}
