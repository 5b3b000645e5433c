//! Catalog listing command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};
use crate::workload::Workload;

/// One table, as printed.
#[derive(Serialize)]
struct TableOutput {
    id: u64,
    database: String,
    name: String,
    columns: Vec<String>,
}

/// Run the catalog command.
pub fn run(path: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let workload = Workload::load(path)?;
    let tables: Vec<TableOutput> = workload
        .memory_catalog()
        .tables()
        .iter()
        .map(|t| TableOutput {
            id: t.id.as_u64(),
            database: t.db_name.clone(),
            name: t.name.clone(),
            columns: t
                .columns
                .iter()
                .map(|c| format!("{} {} ({})", c.name, c.ty, c.id))
                .collect(),
        })
        .collect();

    match Format::from(format) {
        Format::Json => output::print_json(&tables, quiet)?,
        Format::Table => {
            let mut table = output::create_table();
            output::add_header(&mut table, &["Id", "Database", "Table", "Columns"]);
            for t in &tables {
                table.add_row(vec![
                    Cell::new(t.id).fg(Color::Green),
                    Cell::new(&t.database),
                    Cell::new(&t.name),
                    Cell::new(t.columns.join("\n")),
                ]);
            }
            output::print_table(&table, quiet);
        }
    }

    Ok(())
}
