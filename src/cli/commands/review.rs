//! `folio review` command - Client review management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::AdminLogin;
use crate::cli::helpers::{require_admin, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::{Config, SqliteStore};
use crate::entities::{NewReview, Review};
use crate::import::bulk_commit;
use crate::import::mapper::{month_label, DEFAULT_PLATFORM, DEFAULT_RATING};
use crate::import::preview::stars;

#[derive(Subcommand, Debug)]
pub enum ReviewCommands {
    /// List stored reviews in display order
    List(ListArgs),

    /// Add a single review
    Add(AddArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only featured reviews
    #[arg(long)]
    pub featured: bool,

    /// Print only the number of matching reviews
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Client name
    #[arg(long)]
    pub name: String,

    /// Review text
    #[arg(long)]
    pub text: String,

    /// Client job title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Client company
    #[arg(long, default_value = "")]
    pub company: String,

    /// Star rating (1-5)
    #[arg(
        long,
        default_value_t = DEFAULT_RATING,
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    pub rating: u8,

    /// Platform the review came from
    #[arg(long, default_value = DEFAULT_PLATFORM)]
    pub platform: String,

    /// Display date (default: current month, e.g. "March 2025")
    #[arg(long)]
    pub date: Option<String>,

    /// ISO country code
    #[arg(long, default_value = "")]
    pub country_code: String,

    /// Country name
    #[arg(long, default_value = "")]
    pub country_name: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// Mark as featured
    #[arg(long)]
    pub featured: bool,

    #[command(flatten)]
    pub login: AdminLogin,
}

/// Run a review subcommand
pub fn run(cmd: ReviewCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReviewCommands::List(args) => run_list(args, global),
        ReviewCommands::Add(args) => run_add(args, global),
    }
}

fn open_store(global: &GlobalOpts) -> Result<(Config, SqliteStore)> {
    let project =
        Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(&project));
    let store = SqliteStore::open(&config.store_path(project.root())).into_diagnostic()?;
    Ok((config, store))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store(global)?;

    let mut reviews = Review::load_all(&store).into_diagnostic()?;
    if args.featured {
        reviews.retain(|r| r.is_featured);
    }

    if args.count {
        println!("{}", reviews.len());
        return Ok(());
    }

    if reviews.is_empty() {
        println!("No reviews found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reviews).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record([
                    "order_index",
                    "client_name",
                    "client_title",
                    "client_company",
                    "rating",
                    "review_text",
                    "platform",
                    "date",
                    "country_code",
                    "country_name",
                    "city",
                    "is_featured",
                ])
                .into_diagnostic()?;
            for r in &reviews {
                writer
                    .write_record([
                        r.order_index.to_string(),
                        r.client_name.clone(),
                        r.client_title.clone(),
                        r.client_company.clone(),
                        r.rating.to_string(),
                        r.review_text.clone(),
                        r.platform.clone(),
                        r.date.clone(),
                        r.country_code.clone().unwrap_or_default(),
                        r.country_name.clone().unwrap_or_default(),
                        r.city.clone().unwrap_or_default(),
                        r.is_featured.to_string(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Tsv => {
            println!("order\tclient\tcompany\trating\tplatform\tdate\tfeatured");
            for r in &reviews {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    r.order_index,
                    r.client_name,
                    r.client_company,
                    r.rating,
                    r.platform,
                    r.date,
                    r.is_featured
                );
            }
        }
        OutputFormat::Md => {
            println!("| # | Client | Company | Rating | Platform | Date | Featured |");
            println!("|---|---|---|---|---|---|---|");
            for r in &reviews {
                println!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    r.order_index,
                    r.client_name,
                    r.client_company,
                    r.rating,
                    r.platform,
                    r.date,
                    if r.is_featured { "yes" } else { "" }
                );
            }
        }
        OutputFormat::Auto => {
            println!("{}", review_table(&reviews));
            if !global.quiet {
                println!();
                println!("{} review(s) found.", style(reviews.len()).cyan());
            }
        }
    }

    Ok(())
}

fn review_table(reviews: &[Review]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", "Client", "Company", "Rating", "Platform", "Date", "★"]);

    for r in reviews {
        builder.push_record([
            r.order_index.to_string(),
            truncate_str(&r.client_name, 30),
            truncate_str(&r.client_company, 24),
            stars(r.rating),
            r.platform.clone(),
            r.date.clone(),
            if r.is_featured { "✓".to_string() } else { String::new() },
        ]);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (config, mut store) = open_store(global)?;
    require_admin(&config, &args.login)?;

    let candidate = NewReview {
        client_name: args.name.trim().to_string(),
        client_title: args.title.trim().to_string(),
        client_company: args.company.trim().to_string(),
        rating: args.rating,
        review_text: args.text.trim().to_string(),
        platform: match args.platform.trim() {
            "" => DEFAULT_PLATFORM.to_string(),
            p => p.to_string(),
        },
        date: args
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| month_label(chrono::Local::now().date_naive())),
        country_code: args.country_code.trim().to_string(),
        country_name: args.country_name.trim().to_string(),
        city: args.city.trim().to_string(),
        is_featured: args.featured,
    };

    if !candidate.has_required_fields() {
        return Err(miette::miette!(
            "A review needs a client name and review text"
        ));
    }

    let report = bulk_commit(&mut store, std::slice::from_ref(&candidate))?;

    println!(
        "{} Added review from {} at position {}",
        style("✓").green(),
        style(&candidate.client_name).cyan(),
        style(report.first_order_index).yellow()
    );

    Ok(())
}
