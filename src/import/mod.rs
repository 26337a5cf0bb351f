//! CSV bulk import of client reviews
//!
//! Stages: [`tokenizer`] splits the file into header-keyed rows, [`mapper`]
//! turns each row into a candidate review, [`validate`] drops rows without
//! a name or text, [`preview`] renders what is about to be written, and
//! [`commit`] appends everything with one bulk insert. [`session`] ties the
//! stages into a small state machine.

pub mod commit;
pub mod error;
pub mod mapper;
pub mod preview;
pub mod session;
pub mod template;
pub mod tokenizer;
pub mod validate;

pub use commit::{bulk_commit, CommitReport};
pub use error::ImportError;
pub use preview::Preview;
pub use session::{ImportSession, ImportState, StatusKind, StatusMessage};
pub use template::template_csv;
