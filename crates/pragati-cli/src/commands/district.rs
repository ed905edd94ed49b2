//! District lifecycle commands.

use crate::cli::DistrictAction;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pragati_domain::traits::ExtractionStore;
use pragati_store::SqliteStore;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

/// Execute a district sub-command.
pub fn execute_district(
    action: DistrictAction,
    store: &Arc<Mutex<SqliteStore>>,
    formatter: &Formatter,
) -> Result<()> {
    let mut store = store
        .lock()
        .map_err(|_| CliError::Config("store lock poisoned".into()))?;

    match action {
        DistrictAction::Create { name } => {
            if name.trim().is_empty() {
                return Err(CliError::InvalidInput("district name must not be empty".into()));
            }
            if store.district_names()?.contains(&name) {
                return Err(CliError::InvalidInput(format!(
                    "District '{}' already exists",
                    name
                )));
            }
            let id = store.get_or_create_district(&name)?;
            formatter.success(&format!("District '{}' created (id {}).", name, id));
        }
        DistrictAction::List => {
            let districts = store.list_districts()?;
            formatter.districts(&districts)?;
        }
        DistrictAction::Delete { name, yes } => {
            if !yes && !confirm_deletion(&name)? {
                formatter.success("Aborted.");
                return Ok(());
            }
            match store.delete_district(&name)? {
                Some(report) => formatter.success(&format!(
                    "District '{}' deleted: {} document(s), {} extraction(s) removed.",
                    name, report.deleted_documents, report.deleted_extractions
                )),
                None => return Err(CliError::UnknownDistrict(name)),
            }
        }
    }
    Ok(())
}

fn confirm_deletion(name: &str) -> Result<bool> {
    print!(
        "Delete district '{}' and ALL of its documents and extractions? This cannot be undone. [y/N] ",
        name
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
