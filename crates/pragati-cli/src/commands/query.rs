//! Read-only queries over the versioned store.

use crate::cli::{AnalyticsArgs, HistoryArgs, LatestArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pragati_domain::traits::ExtractionStore;
use pragati_store::SqliteStore;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<'a>(store: &'a Arc<Mutex<SqliteStore>>) -> Result<MutexGuard<'a, SqliteStore>> {
    store
        .lock()
        .map_err(|_| CliError::Config("store lock poisoned".into()))
}

fn require_district(store: &SqliteStore, name: &str) -> Result<()> {
    if !store.district_names()?.iter().any(|existing| existing == name) {
        return Err(CliError::UnknownDistrict(name.to_string()));
    }
    Ok(())
}

/// Execute the latest command.
pub fn execute_latest(
    args: LatestArgs,
    store: &Arc<Mutex<SqliteStore>>,
    formatter: &Formatter,
) -> Result<()> {
    let store = lock(store)?;
    require_district(&store, &args.district)?;
    let rows = store.read_latest(
        &args.district,
        args.sector.as_deref(),
        args.sub_category.as_deref(),
    )?;
    formatter.latest(&rows)
}

/// Execute the history command.
pub fn execute_history(
    args: HistoryArgs,
    store: &Arc<Mutex<SqliteStore>>,
    formatter: &Formatter,
) -> Result<()> {
    let store = lock(store)?;
    require_district(&store, &args.district)?;
    let entries = store.read_history(&args.district)?;
    formatter.history(&entries)
}

/// Execute the analytics command.
pub fn execute_analytics(
    args: AnalyticsArgs,
    store: &Arc<Mutex<SqliteStore>>,
    formatter: &Formatter,
) -> Result<()> {
    let store = lock(store)?;
    require_district(&store, &args.district)?;
    let analytics = store.district_analytics(&args.district)?;
    formatter.analytics(&analytics)
}

/// Execute the categories command.
pub fn execute_categories(
    store: &Arc<Mutex<SqliteStore>>,
    formatter: &Formatter,
) -> Result<()> {
    let store = lock(store)?;
    let categories = store.list_categories()?;
    formatter.categories(&categories)
}
