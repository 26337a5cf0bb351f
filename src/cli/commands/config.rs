//! `folio config` command - Configuration management
//!
//! Provides commands to view and modify Folio configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., admin_user, preview_limit)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("admin_user", "Admin user name for import and add"),
    ("admin_password", "Admin password for import and add"),
    ("store", "Record store path, relative to the project root"),
    ("preview_limit", "Rows shown in the import preview"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let project_root = global.project.as_deref();
    match cmd {
        ConfigCommands::Show(args) => run_show(args, project_root),
        ConfigCommands::Set(args) => run_set(args, project_root),
        ConfigCommands::Unset(args) => run_unset(args, project_root),
        ConfigCommands::Path(args) => run_path(args, project_root),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, project_root: Option<&Path>) -> Result<()> {
    let project = Project::locate(project_root).ok();
    let config = Config::load_for(project.as_ref());

    if let Some(key) = &args.key {
        check_key(key)?;
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        show_config_file("Project config:", &project_config_path(project_root)?)?;
    } else if args.global_only {
        show_config_file("Global config:", &global_config_path()?)?;
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();

        for (key, _) in VALID_KEYS {
            let value = if *key == "admin_password" {
                config.admin_password.as_ref().map(|_| "********".to_string())
            } else {
                get_config_value(&config, key)
            };
            print_config_value(key, value.as_deref());
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (FOLIO_ADMIN_USER, FOLIO_ADMIN_PASSWORD, FOLIO_STORE)");
        println!("  2. Project config (.folio/config.yaml)");
        println!("  3. Global config (~/.config/folio/config.yaml)");
    }

    Ok(())
}

fn run_set(args: SetArgs, project_root: Option<&Path>) -> Result<()> {
    check_key(&args.key)?;
    let value = parse_value(&args.key, &args.value)?;

    let config_path = if args.global {
        global_config_path()?
    } else {
        project_config_path(project_root)?
    };

    let mut config_map = read_mapping(&config_path)?;
    if let serde_yml::Value::Mapping(map) = &mut config_map {
        map.insert(serde_yml::Value::String(args.key.clone()), value);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    let shown = if args.key == "admin_password" {
        "********"
    } else {
        args.value.as_str()
    };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(shown).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs, project_root: Option<&Path>) -> Result<()> {
    let config_path = if args.global {
        global_config_path()?
    } else {
        project_config_path(project_root)?
    };

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = match &mut config_map {
        serde_yml::Value::Mapping(map) => map
            .remove(&serde_yml::Value::String(args.key.clone()))
            .is_some(),
        _ => false,
    };

    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path(args: PathArgs, project_root: Option<&Path>) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        println!("{}", project_config_path(project_root)?.display());
    } else if args.global_only {
        println!("{}", global_config_path()?.display());
    } else {
        let global_path = global_config_path()?;

        println!("{}", style("Configuration file paths:").bold());
        println!();
        println!("  {} {}", style("Global:").cyan(), global_path.display());
        println!("         {}", existence(&global_path));

        println!();
        match project_config_path(project_root) {
            Ok(path) => {
                println!("  {} {}", style("Project:").cyan(), path.display());
                println!("          {}", existence(&path));
            }
            Err(_) => println!(
                "  {} {}",
                style("Project:").cyan(),
                style("(not in a Folio project)").dim()
            ),
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'folio config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

fn existence(path: &Path) -> console::StyledObject<&'static str> {
    if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn project_config_path(project_root: Option<&Path>) -> Result<PathBuf> {
    let project = Project::locate(project_root).map_err(|e| miette::miette!("{}", e))?;
    Ok(project.config_path())
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "Run `folio config keys` to list valid keys",
            "Unknown configuration key '{}'",
            key
        ))
    }
}

/// Typed YAML value for a key
fn parse_value(key: &str, raw: &str) -> Result<serde_yml::Value> {
    if key == "preview_limit" {
        let n: usize = raw
            .trim()
            .parse()
            .map_err(|_| {
                miette::miette!("preview_limit must be a positive number, got '{}'", raw)
            })?;
        if n == 0 {
            return Err(miette::miette!("preview_limit must be at least 1"));
        }
        serde_yml::to_value(n).into_diagnostic()
    } else {
        Ok(serde_yml::Value::String(raw.to_string()))
    }
}

/// Existing config file as a mapping, or an empty one
fn read_mapping(path: &Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(serde_yml::Value::Mapping(map)),
        // Empty or comment-only files parse as null
        Ok(serde_yml::Value::Null) => Ok(serde_yml::Value::Mapping(Default::default())),
        Ok(_) => Err(miette::miette!(
            "Config file {} is not a key/value mapping",
            path.display()
        )),
        Err(e) => Err(miette::miette!("Could not parse {}: {}", path.display(), e)),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "admin_user" => config.admin_user.clone(),
        "admin_password" => config.admin_password.clone(),
        "store" => config.store.clone(),
        "preview_limit" => config.preview_limit.map(|n| n.to_string()),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn show_config_file(label: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(label).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_preview_limit_is_numeric() {
        let v = parse_value("preview_limit", "25").unwrap();
        assert_eq!(v.as_u64(), Some(25));
        assert!(parse_value("preview_limit", "ten").is_err());
        assert!(parse_value("preview_limit", "0").is_err());
    }

    #[test]
    fn test_parse_value_strings() {
        let v = parse_value("admin_user", "owner").unwrap();
        assert_eq!(v.as_str(), Some("owner"));
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("store").is_ok());
        assert!(check_key("author").is_err());
    }

    #[test]
    fn test_read_mapping_handles_comment_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "# nothing set yet\n").unwrap();
        assert!(read_mapping(&path).unwrap().is_mapping());
    }
}
