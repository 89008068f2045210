use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::molecule::ReferenceMolecule;
use crate::core::types::{IonMode, LipidClass};
use crate::parsing::library::{parse_library_text, LibraryFormat, LibraryParseError};
use crate::parsing::read_text;
use crate::utils::validation::{validate_chain_set, ValidationError, MAX_LIBRARY_ENTRIES};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to read library: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse library: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to parse library: {0}")]
    TextError(#[from] LibraryParseError),

    #[error("Too many library entries: {0} exceeds maximum of {MAX_LIBRARY_ENTRIES}")]
    TooManyEntries(usize),

    #[error("Invalid library entry '{name}': {source}")]
    InvalidEntry {
        name: String,
        source: ValidationError,
    },
}

/// Library file version for compatibility checking
pub const LIBRARY_VERSION: &str = "1.0.0";

/// Serializable library format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryData {
    pub version: String,
    pub created_at: String,
    pub entries: Vec<ReferenceMolecule>,
}

/// Reference library kept sorted ascending by precursor m/z
#[derive(Debug, Clone, Default)]
pub struct LipidLibrary {
    entries: Vec<ReferenceMolecule>,
}

impl LipidLibrary {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a library from unsorted entries. Entries with equal m/z keep
    /// their input order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<ReferenceMolecule>) -> Self {
        entries.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self { entries }
    }

    /// Load a library from a JSON or delimited text file, optionally gzipped
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds more
    /// than [`MAX_LIBRARY_ENTRIES`] entries.
    pub fn load_from_file(path: &Path) -> Result<Self, LibraryError> {
        let content = read_text(path)?;
        let library = match LibraryFormat::detect(path, &content) {
            LibraryFormat::Json => Self::from_json(&content)?,
            format => Self::from_entries(parse_library_text(&content, format)?),
        };
        info!(
            "Loaded {} library entries from {}",
            library.len(),
            path.display()
        );
        Ok(library)
    }

    /// Parse a library from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, holds too many entries, or an
    /// entry's chain counts are out of range.
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let data: LibraryData = serde_json::from_str(json)?;

        if data.version != LIBRARY_VERSION {
            warn!(
                "Library version mismatch (expected {}, found {})",
                LIBRARY_VERSION, data.version
            );
        }
        if data.entries.len() > MAX_LIBRARY_ENTRIES {
            return Err(LibraryError::TooManyEntries(data.entries.len()));
        }
        for entry in &data.entries {
            validate_chain_set(&entry.chains).map_err(|source| LibraryError::InvalidEntry {
                name: entry.name.clone(),
                source,
            })?;
        }

        Ok(Self::from_entries(data.entries))
    }

    /// Export the library to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, LibraryError> {
        let data = LibraryData {
            version: LIBRARY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            entries: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Insert an entry, keeping the m/z order
    pub fn add(&mut self, entry: ReferenceMolecule) {
        let index = self.entries.partition_point(|e| e.mz <= entry.mz);
        self.entries.insert(index, entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[ReferenceMolecule] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ReferenceMolecule> {
        self.entries.get(index)
    }

    /// Entries of one class and/or ion mode
    pub fn filter(
        &self,
        class: Option<LipidClass>,
        ion_mode: Option<IonMode>,
    ) -> impl Iterator<Item = &ReferenceMolecule> {
        self.entries.iter().filter(move |e| {
            class.is_none_or(|c| e.class == c) && ion_mode.is_none_or(|m| e.ion_mode() == m)
        })
    }

    /// Number of entries in library
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if library is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
