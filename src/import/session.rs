//! One import session, from file selection to commit or cancel
//!
//! ```text
//! IDLE --load--> PARSING --valid rows--> PREVIEW
//! PARSING --no valid rows--> ERROR --load--> PARSING
//! PREVIEW --confirm--> COMMITTING --ok--> DONE --reset--> IDLE
//! COMMITTING --failure--> PREVIEW (candidates kept)
//! PREVIEW --cancel--> IDLE
//! ```

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::core::store::RecordStore;
use crate::entities::NewReview;

use super::commit::{bulk_commit, CommitReport};
use super::error::ImportError;
use super::mapper::{map_row, month_label};
use super::preview::{Preview, DEFAULT_PREVIEW_LIMIT};
use super::tokenizer::parse_csv;
use super::validate::filter_valid;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Parsing,
    Preview,
    Committing,
    Done,
    Error,
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportState::Idle => "idle",
            ImportState::Parsing => "parsing",
            ImportState::Preview => "previewing",
            ImportState::Committing => "committing",
            ImportState::Done => "done",
            ImportState::Error => "in error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// The single user-facing message for the latest transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    fn error(err: &ImportError) -> Self {
        Self {
            kind: StatusKind::Error,
            text: err.to_string(),
        }
    }
}

/// In-memory state of one import
#[derive(Debug)]
pub struct ImportSession {
    state: ImportState,
    candidates: Vec<NewReview>,
    status: Option<StatusMessage>,
    preview_limit: usize,
    malformed: usize,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession {
    pub fn new() -> Self {
        Self::with_preview_limit(DEFAULT_PREVIEW_LIMIT)
    }

    pub fn with_preview_limit(preview_limit: usize) -> Self {
        Self {
            state: ImportState::Idle,
            candidates: Vec::new(),
            status: None,
            preview_limit,
            malformed: 0,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Validated candidates waiting for confirmation
    pub fn candidates(&self) -> &[NewReview] {
        &self.candidates
    }

    /// Message describing the last transition
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Data lines dropped by the tokenizer for having too few fields
    pub fn malformed_lines(&self) -> usize {
        self.malformed
    }

    /// Read a file and parse it
    pub fn load_file(&mut self, path: &Path, today: NaiveDate) -> Result<usize, ImportError> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.load(&text, today),
            Err(source) => {
                let err = ImportError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Parse file contents into candidates, replacing any earlier preview
    ///
    /// Returns the number of valid candidates.
    pub fn load(&mut self, text: &str, today: NaiveDate) -> Result<usize, ImportError> {
        self.state = ImportState::Parsing;
        self.candidates.clear();
        self.status = None;

        let parsed = parse_csv(text);
        self.malformed = parsed.malformed;
        if parsed.is_empty() {
            let err = ImportError::EmptyFile;
            self.fail(&err);
            return Err(err);
        }

        let date_label = month_label(today);
        let mapped = parsed
            .rows
            .iter()
            .map(|row| map_row(row, &date_label))
            .collect();

        match filter_valid(mapped) {
            Ok(valid) => {
                tracing::debug!(
                    rows = parsed.rows.len(),
                    malformed = parsed.malformed,
                    valid = valid.len(),
                    "parsed review file"
                );
                self.candidates = valid;
                self.state = ImportState::Preview;
                Ok(self.candidates.len())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Preview of the pending candidates, only while previewing
    pub fn preview(&self) -> Option<Preview> {
        (self.state == ImportState::Preview)
            .then(|| Preview::build(&self.candidates, self.preview_limit))
    }

    /// Submit every candidate in one bulk insert
    ///
    /// On failure the candidates stay in place and the session returns to
    /// preview so the same commit can be retried.
    pub fn confirm<S: RecordStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<CommitReport, ImportError> {
        if self.state != ImportState::Preview {
            return Err(ImportError::NotReady(self.state));
        }

        self.state = ImportState::Committing;
        match bulk_commit(store, &self.candidates) {
            Ok(report) => {
                self.state = ImportState::Done;
                self.status = Some(StatusMessage::success(format!(
                    "Successfully uploaded {} reviews!",
                    report.inserted
                )));
                Ok(report)
            }
            Err(err) => {
                self.state = ImportState::Preview;
                self.status = Some(StatusMessage::error(&err));
                Err(err)
            }
        }
    }

    /// Drop the preview without importing
    pub fn cancel(&mut self) {
        if self.state == ImportState::Preview {
            self.clear();
        }
    }

    /// Return to idle after a completed import has been shown
    pub fn reset(&mut self) {
        if self.state == ImportState::Done {
            self.clear();
        }
    }

    fn clear(&mut self) {
        self.state = ImportState::Idle;
        self.candidates.clear();
        self.status = None;
        self.malformed = 0;
    }

    fn fail(&mut self, err: &ImportError) {
        self.state = ImportState::Error;
        self.candidates.clear();
        self.status = Some(StatusMessage::error(err));
    }
}
