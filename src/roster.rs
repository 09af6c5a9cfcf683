use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const ID_COLUMN: &str = "Moodle ID";
pub const NAME_COLUMN: &str = "Name";
pub const EVENT_COLUMN: &str = "Event Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub event: Option<String>,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("failed to open roster: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read roster: {0}")]
    Csv(#[from] csv::Error),

    #[error("roster must contain 'Moodle ID', 'Name' and 'Event Name' columns (missing '{0}')")]
    MissingColumn(&'static str),
}

/// Student table loaded once at startup and only read afterwards.
#[derive(Debug, Default)]
pub struct Roster {
    records: Vec<StudentRecord>,
}

impl Roster {
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    /// Reads a CSV export of the student sheet.
    ///
    /// Rows with a non-integer id or a blank name are skipped. A blank event
    /// cell is kept as `None`.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(RosterError::MissingColumn(name))
        };
        let id_col = column(ID_COLUMN)?;
        let name_col = column(NAME_COLUMN)?;
        let event_col = column(EVENT_COLUMN)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            // header is line 1
            let line = line + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable roster row {}: {}", line, e);
                    continue;
                }
            };

            let Some(id) = row.get(id_col).and_then(|s| s.parse::<i64>().ok()) else {
                warn!("Skipping roster row {}: bad {}", line, ID_COLUMN);
                continue;
            };
            let name = row.get(name_col).unwrap_or_default();
            if name.is_empty() {
                warn!("Skipping roster row {}: empty {}", line, NAME_COLUMN);
                continue;
            }
            let event = row
                .get(event_col)
                .filter(|e| !e.is_empty())
                .map(str::to_string);

            records.push(StudentRecord {
                id,
                name: name.to_string(),
                event,
            });
        }

        Ok(Self { records })
    }

    /// Like [`Roster::load`], but a missing or malformed file yields an empty
    /// roster so the service can still start.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(roster) if roster.is_empty() => {
                warn!("Roster {} has no usable rows", path.display());
                roster
            }
            Ok(roster) => {
                info!("Loaded {} students from {}", roster.len(), path.display());
                roster
            }
            Err(RosterError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Roster {} not found, starting empty", path.display());
                Self::default()
            }
            Err(e) => {
                error!("Roster file error: {}", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose id equals `identifier` read as an integer.
    /// Unparseable identifiers and unknown ids both come back as `None`.
    pub fn resolve(&self, identifier: &str) -> Option<&StudentRecord> {
        let id: i64 = match identifier.trim().parse() {
            Ok(id) => id,
            Err(e) => {
                debug!("Identifier {:?} is not an integer: {}", identifier, e);
                return None;
            }
        };
        debug!("Looking up {} {}", ID_COLUMN, id);
        self.records.iter().find(|r| r.id == id)
    }
}

pub fn validate_identifier(identifier: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new("^[0-9]+$").expect("identifier pattern"));
    let is_valid = pattern.is_match(identifier);
    debug!("Identifier {:?} valid: {}", identifier, is_valid);
    is_valid
}

pub fn validate_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new("^[a-zA-Z ]+$").expect("name pattern"))
        .is_match(name)
}
