//! Errors surfaced by the import pipeline

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::store::StoreError;

use super::session::ImportState;

/// Import failures, each carrying the message shown to the operator
#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("Could not read {}", .path.display())]
    #[diagnostic(code(folio::import::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid data found in CSV file")]
    #[diagnostic(
        code(folio::import::empty_file),
        help("The file needs a header row and at least one data row with three or more columns")
    )]
    EmptyFile,

    #[error("No valid reviews found. Each row must have client_name and review_text")]
    #[diagnostic(
        code(folio::import::no_valid_rows),
        help("Run `folio import --template` to see the expected columns")
    )]
    NoValidRows,

    #[error("Failed to upload reviews. Please try again.")]
    #[diagnostic(code(folio::import::commit_failed))]
    CommitFailed(#[source] StoreError),

    #[error("Nothing to import while the session is {0}")]
    #[diagnostic(code(folio::import::not_ready))]
    NotReady(ImportState),
}
