//! `folio import` command - Bulk import reviews from a CSV file

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::args::AdminLogin;
use crate::cli::helpers::require_admin;
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::{Config, RecordStore, SqliteStore};
use crate::import::{template_csv, CommitReport, ImportError, ImportSession};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import
    #[arg(required_unless_present = "template")]
    pub file: Option<PathBuf>,

    /// Print a CSV template with example rows
    #[arg(long, conflicts_with = "file")]
    pub template: bool,

    /// Show the preview without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Rows to show in the preview (default: preview_limit from config)
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub login: AdminLogin,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    if args.template {
        return print_template();
    }

    let file_path = args
        .file
        .clone()
        .ok_or_else(|| miette::miette!("No CSV file given. Usage: folio import <FILE>"))?;

    let project =
        Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(&project));
    require_admin(&config, &args.login)?;

    let limit = args
        .limit
        .filter(|&n| n > 0)
        .unwrap_or_else(|| config.preview_limit());
    let mut session = ImportSession::with_preview_limit(limit);

    if !global.quiet {
        println!(
            "{} Reading reviews from {}{}",
            style("→").blue(),
            style(file_path.display()).yellow(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
        println!();
    }

    let valid = session.load_file(&file_path, Local::now().date_naive())?;

    if let Some(preview) = session.preview() {
        print!("{}", preview);
    }
    let skipped = session.malformed_lines();
    if skipped > 0 && !global.quiet {
        println!(
            "{} Skipped {} line(s) with fewer than three columns",
            style("!").yellow(),
            skipped
        );
    }

    if args.dry_run {
        println!();
        println!(
            "{}",
            style(format!("Dry run complete. {} review(s) would be imported.", valid)).yellow()
        );
        session.cancel();
        return Ok(());
    }

    if !args.yes && !confirm_import(valid)? {
        session.cancel();
        println!("Aborted.");
        return Ok(());
    }

    let store_path = config.store_path(project.root());
    let mut store = SqliteStore::open(&store_path).into_diagnostic()?;

    let interactive = !args.yes && console::user_attended();
    let report = commit_with_retry(&mut session, &mut store, |err| {
        if !interactive {
            return Ok(false);
        }
        eprintln!("{} {}", style("✗").red(), style(err).red());
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Retry import?")
            .default(true)
            .interact()
            .into_diagnostic()
    })?;

    if let Some(status) = session.status() {
        println!();
        println!("{} {}", style("✓").green(), style(&status.text).green());
    }

    if !global.quiet {
        println!();
        println!("{}", style("─".repeat(50)).dim());
        println!("{}", style("Import Summary").bold());
        println!("{}", style("─".repeat(50)).dim());
        println!("  Reviews imported: {}", style(report.inserted).green());
        println!(
            "  First position:   {}",
            style(report.first_order_index).cyan()
        );
        match &report.reviews {
            Some(reviews) => println!("  Reviews stored:   {}", style(reviews.len()).cyan()),
            None => println!(
                "  Reviews stored:   {}",
                style("(could not refresh list)").yellow()
            ),
        }
        if skipped > 0 {
            println!("  Lines skipped:    {}", style(skipped).dim());
        }
    }

    session.reset();
    Ok(())
}

/// Commit the session, asking whether to retry after each failed upload
///
/// The parsed candidates stay in the session between attempts, so a retry
/// never re-reads the file.
fn commit_with_retry<S, F>(
    session: &mut ImportSession,
    store: &mut S,
    mut ask_retry: F,
) -> Result<CommitReport>
where
    S: RecordStore + ?Sized,
    F: FnMut(&ImportError) -> Result<bool>,
{
    loop {
        match session.confirm(store) {
            Ok(report) => return Ok(report),
            Err(err @ ImportError::CommitFailed(_)) => {
                if !ask_retry(&err)? {
                    return Err(err.into());
                }
                tracing::debug!(candidates = session.candidates().len(), "retrying import");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn confirm_import(count: usize) -> Result<bool> {
    if !console::user_attended() {
        return Err(miette::miette!(
            help = "Pass --yes to import without a prompt",
            "Cannot ask for confirmation: not running in a terminal"
        ));
    }

    println!();
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Import {} reviews?", count))
        .default(false)
        .interact()
        .into_diagnostic()
}

fn print_template() -> Result<()> {
    // Output to stdout (can be redirected to file)
    print!("{}", template_csv());

    // Usage hint on stderr so it doesn't end up in the redirected file
    eprintln!();
    eprintln!(
        "{} Template generated. Redirect to file: folio import --template > reviews.csv",
        style("→").blue()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{Record, StoreError};
    use crate::import::ImportState;
    use chrono::NaiveDate;

    /// Fails the first `failures` inserts
    struct FlakyStore {
        inner: SqliteStore,
        failures: usize,
    }

    impl RecordStore for FlakyStore {
        fn insert(&mut self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(StoreError::InvalidTable(table.to_string()));
            }
            self.inner.insert(table, rows)
        }

        fn select(&self, table: &str) -> Result<Vec<Record>, StoreError> {
            self.inner.select(table)
        }
    }

    fn loaded_session() -> ImportSession {
        let mut session = ImportSession::new();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        session.load(&template_csv(), today).unwrap();
        session
    }

    #[test]
    fn test_retry_reuses_parsed_candidates() {
        let mut store = FlakyStore {
            inner: SqliteStore::open_in_memory().unwrap(),
            failures: 2,
        };
        let mut session = loaded_session();
        let mut asked = 0;

        let report = commit_with_retry(&mut session, &mut store, |err| {
            assert!(matches!(err, ImportError::CommitFailed(_)));
            asked += 1;
            Ok(true)
        })
        .unwrap();

        assert_eq!(asked, 2);
        assert_eq!(report.inserted, 2);
        assert_eq!(session.state(), ImportState::Done);
        assert_eq!(store.inner.count("reviews").unwrap(), 2);
    }

    #[test]
    fn test_declined_retry_returns_error() {
        let mut store = FlakyStore {
            inner: SqliteStore::open_in_memory().unwrap(),
            failures: 1,
        };
        let mut session = loaded_session();

        let err = commit_with_retry(&mut session, &mut store, |_| Ok(false)).unwrap_err();

        assert!(err.to_string().contains("Failed to upload reviews"));
        assert_eq!(session.state(), ImportState::Preview);
        assert_eq!(session.candidates().len(), 2);
        assert_eq!(store.inner.count("reviews").unwrap(), 0);
    }

    #[test]
    fn test_non_commit_errors_are_not_retried() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut session = ImportSession::new();

        let err = commit_with_retry(&mut session, &mut store, |_| {
            panic!("only failed uploads are retried")
        })
        .unwrap_err();

        assert!(err.to_string().contains("idle"));
    }
}
