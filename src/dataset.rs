//! Vocabulary loading from spreadsheet files (Excel and CSV).

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One quiz question: an English term and its Korean meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub term: String,
    pub meaning: String,
}

impl VocabularyItem {
    pub fn new(term: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            meaning: meaning.into(),
        }
    }
}

/// Errors raised while loading a vocabulary file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The header row lacks one or both required columns.
    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },
}

/// An ordered, immutable set of vocabulary items for one quiz run.
///
/// Question order is the row order of the source file. Rows whose term cell
/// is blank are skipped at load time and blank-term items are dropped at
/// construction, so every item carries a non-empty `term`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyDataset {
    source: Option<String>,
    items: Vec<VocabularyItem>,
}

impl VocabularyDataset {
    /// Dataset built directly from in-memory items, with no source label.
    ///
    /// Items with a blank term are dropped, the same rule the loaders apply
    /// to rows.
    pub fn new(mut items: Vec<VocabularyItem>) -> Self {
        items.retain(|item| !item.term.trim().is_empty());
        Self {
            source: None,
            items,
        }
    }

    /// Attach a source label (usually the uploaded file name).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Load a vocabulary file, dispatching on its extension.
    ///
    /// `.xlsx` and `.csv` are supported; anything else is
    /// [`LoadError::UnsupportedFormat`]. The file name is recorded as the
    /// dataset's source label.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mut dataset = match extension.as_str() {
            "xlsx" => Self::from_xlsx_reader(BufReader::new(open(path)?))?,
            "csv" => Self::from_csv_reader(BufReader::new(open(path)?))?,
            _ => return Err(LoadError::UnsupportedFormat { extension }),
        };

        dataset.source = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);

        tracing::debug!(
            path = %path.display(),
            items = dataset.len(),
            "loaded vocabulary dataset"
        );
        Ok(dataset)
    }

    /// Parse workbook bytes (first sheet only) without touching the
    /// filesystem.
    pub fn from_xlsx_reader<R: Read + Seek>(reader: R) -> Result<Self, LoadError> {
        let mut workbook: Xlsx<_> = Xlsx::new(reader)?;

        // A workbook with no sheets has no header row, which reads as both
        // required columns absent.
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::MissingColumns {
                missing: vec!["English".to_string(), "Korean".to_string()],
            })?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(cell_to_string).collect(),
            None => Vec::new(),
        };
        let mapping = detect_columns(&headers)?;

        let mut items = Vec::new();
        let mut skipped = 0usize;

        for row in rows {
            let term = row.get(mapping.term).map(cell_to_string).unwrap_or_default();
            let meaning = row
                .get(mapping.meaning)
                .map(cell_to_string)
                .unwrap_or_default();

            if term.is_empty() {
                skipped += 1;
                continue;
            }
            items.push(VocabularyItem { term, meaning });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped workbook rows with a blank term cell");
        }

        Ok(Self::new(items))
    }

    /// Parse CSV bytes without touching the filesystem.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        let mapping = detect_columns(&headers)?;

        let mut items = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let term = record.get(mapping.term).unwrap_or("").trim().to_string();
            let meaning = record.get(mapping.meaning).unwrap_or("").trim().to_string();

            if term.is_empty() {
                skipped += 1;
                continue;
            }
            items.push(VocabularyItem { term, meaning });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped csv rows with a blank term cell");
        }

        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VocabularyItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.items.iter()
    }

    /// File name this dataset was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Column index mapping resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMapping {
    term: usize,
    meaning: usize,
}

/// Detect the English/Korean column indices from header names.
///
/// Matching is case-insensitive after trimming; unknown columns are
/// ignored; column order does not matter.
fn detect_columns(headers: &[String]) -> Result<ColumnMapping, LoadError> {
    let mut term = None;
    let mut meaning = None;

    for (i, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "english" => term = Some(i),
            "korean" => meaning = Some(i),
            _ => {}
        }
    }

    match (term, meaning) {
        (Some(term), Some(meaning)) => Ok(ColumnMapping { term, meaning }),
        _ => {
            let mut missing = Vec::new();
            if term.is_none() {
                missing.push("English".to_string());
            }
            if meaning.is_none() {
                missing.push("Korean".to_string());
            }
            Err(LoadError::MissingColumns { missing })
        }
    }
}

/// Render an Excel cell as trimmed text.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}
