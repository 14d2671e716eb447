//! Import/export commands: the full-collection JSON round trip.

use std::path::{Path, PathBuf};

use crate::board::Board;
use crate::error::Result;
use crate::output::{emit_success, OutputOptions};

pub fn run_export(board: &Board, output: Option<PathBuf>, options: OutputOptions) -> Result<()> {
    let payload = board.export_tasks()?;

    match output {
        Some(path) => {
            std::fs::write(&path, &payload)?;
            emit_success(
                options,
                "export",
                &serde_json::json!({
                    "path": path,
                    "tasks": board.len(),
                }),
                &[format!(
                    "Exported {} task(s) to {}",
                    board.len(),
                    path.display()
                )],
            )
        }
        None => {
            // The payload is already the export format; print it raw.
            println!("{payload}");
            Ok(())
        }
    }
}

pub fn run_import(mut board: Board, file: &Path, options: OutputOptions) -> Result<()> {
    let payload = std::fs::read_to_string(file)?;
    let report = board.import_tasks(&payload)?;

    emit_success(
        options,
        "import",
        &report,
        &[format!(
            "Imported {} task(s), skipped {}",
            report.imported, report.skipped
        )],
    )
}
