//! Reading spreadsheets into import records.

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use database::{import, DatabaseError, ImportRecord};
use thiserror::Error;

/// Errors raised while reading an input file.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] DatabaseError),

    #[error("invalid workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no sheet named {0:?}")]
    MissingSheet(String),

    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

/// Read a CSV or Excel file whose first row holds the headers.
///
/// For workbooks, `sheet` picks a worksheet by name; the first one is used
/// otherwise.
pub fn read_records(path: &Path, sheet: Option<&str>) -> Result<Vec<ImportRecord>, SheetError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => {
            let file = File::open(path).map_err(|source| SheetError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Ok(import::read_csv(file)?)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path, sheet),
        other => Err(SheetError::Unsupported(other.to_string())),
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<ImportRecord>, SheetError> {
    let mut workbook = open_workbook_auto(path)?;

    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SheetError::MissingSheet(String::new()))?,
    };
    if !workbook.sheet_names().contains(&name) {
        return Err(SheetError::MissingSheet(name));
    }

    let range = workbook.worksheet_range(&name)?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(cell_to_string).collect();

    Ok(rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .map(|cells| ImportRecord::from_row(&headers, &cells))
        .collect())
}

/// Cell text as a spreadsheet user would read it.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(821234567)), "821234567");
        assert_eq!(cell_to_string(&Data::String("Jane".to_string())), "Jane");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_reads_csv_file() {
        let path = std::env::temp_dir().join(format!("importer-test-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Level,Name and surname,Phone\n3,Jane Doe,0821234567\n",
        )
        .unwrap();

        let records = read_records(&path, None).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].cells(),
            &[
                ("Level".to_string(), "3".to_string()),
                ("Name and surname".to_string(), "Jane Doe".to_string()),
                ("Phone".to_string(), "0821234567".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let result = read_records(Path::new("contacts.pdf"), None);
        assert!(matches!(result, Err(SheetError::Unsupported(ext)) if ext == "pdf"));
    }
}
