//! Folio: back-office toolkit for a personal portfolio site
//!
//! Manages the content behind the public site from the command line. The
//! centrepiece is the CSV bulk import of client reviews: parse, map,
//! validate, preview, then one bulk insert into the record store.

pub mod cli;
pub mod core;
pub mod entities;
pub mod import;
pub mod logging;
