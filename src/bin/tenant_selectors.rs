//! # tenant-selectors CLI - Inspect selectors against backup catalogs
//!
//! A command-line front end for the selector library. Selectors and
//! catalogs are read as JSON documents, in the same form the library
//! serializes them.
//!
//! ## Usage
//! ```bash
//! # Keep the catalog entries a selector admits
//! tenant-selectors reduce --selector sel.json --details details.json
//!
//! # Which prior-backup subtrees does the selector need?
//! tenant-selectors reasons --selector sel.json --tenant tid
//!
//! # One selector per resource owner
//! tenant-selectors split --selector sel.json --owners u1,u2,u3
//!
//! # Break a resource path into its parts
//! tenant-selectors path 'tid/exchange/u1/email/Inbox/m1'
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tenant_selectors::fault::Bus;
use tenant_selectors::{Details, ResourcePath, Selector};
use tracing_subscriber::EnvFilter;

/// Inspect and apply backup selectors
#[derive(Parser)]
#[command(name = "tenant-selectors")]
#[command(version)]
#[command(about = "Apply backup selectors to catalogs and inspect resource paths")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce a catalog with a selector
    Reduce {
        /// Selector JSON file
        #[arg(short, long)]
        selector: PathBuf,

        /// Catalog JSON file
        #[arg(short, long)]
        details: PathBuf,

        /// Stop at the first entry that cannot be evaluated
        #[arg(long)]
        fail_fast: bool,
    },

    /// List the prior-backup subtrees a selector needs
    Reasons {
        /// Selector JSON file
        #[arg(short, long)]
        selector: PathBuf,

        /// Tenant id
        #[arg(short, long)]
        tenant: String,

        /// Name resources by the owner's display name
        #[arg(long)]
        use_owner_name: bool,
    },

    /// Show the path categories of each scope list
    Categories {
        /// Selector JSON file
        #[arg(short, long)]
        selector: PathBuf,
    },

    /// Split a selector into one selector per resource owner
    Split {
        /// Selector JSON file
        #[arg(short, long)]
        selector: PathBuf,

        /// Every owner known to the tenant, comma separated
        #[arg(short, long, value_delimiter = ',')]
        owners: Vec<String>,
    },

    /// Parse a resource path
    Path {
        /// Escaped resource path
        repo_ref: String,

        /// The path names a folder, not an item
        #[arg(long)]
        folder: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Reduce {
            selector,
            details,
            fail_fast,
        } => cmd_reduce(&selector, &details, fail_fast, json),
        Commands::Reasons {
            selector,
            tenant,
            use_owner_name,
        } => cmd_reasons(&selector, &tenant, use_owner_name, json),
        Commands::Categories { selector } => cmd_categories(&selector, json),
        Commands::Split { selector, owners } => cmd_split(&selector, &owners, json),
        Commands::Path { repo_ref, folder } => cmd_path(&repo_ref, !folder, json),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Reduce a catalog and print the surviving entries
///
/// Entries that could not be evaluated are reported as warnings. In
/// fail-fast mode the first of them fails the command.
fn cmd_reduce(selector: &Path, details: &Path, fail_fast: bool, json: bool) -> Result<()> {
    let sel: Selector = read_json(selector)?;
    let deets: Details = read_json(details)?;

    let bus = Bus::new(fail_fast);
    let kept = sel.reduce(&deets, &bus)?;

    if let Some(failure) = bus.failure() {
        bail!("reduce stopped: {}", failure.user_message());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&kept)?);
    } else {
        println!(
            "{} {} of {} entries",
            "Kept".green().bold(),
            kept.len().to_string().cyan(),
            deets.items().len().to_string().cyan()
        );
        for entry in &kept.entries {
            println!("  {} {}", entry.short_ref.yellow(), entry.repo_ref);
        }
    }

    for err in bus.recovered() {
        eprintln!("{}: {}", "Warning".yellow().bold(), err.user_message());
    }

    Ok(())
}

fn cmd_reasons(selector: &Path, tenant: &str, use_owner_name: bool, json: bool) -> Result<()> {
    let sel: Selector = read_json(selector)?;
    let reasons = sel.reasons(tenant, use_owner_name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reasons)?);
        return Ok(());
    }

    if reasons.is_empty() {
        println!("{}", "No prior data needed".yellow());
        return Ok(());
    }

    println!("{}", "Reasons".blue().bold());
    for reason in &reasons {
        println!(
            "  {} {} {}",
            reason.service.to_string().cyan(),
            reason.category.to_string().cyan(),
            reason
        );
    }

    Ok(())
}

fn cmd_categories(selector: &Path, json: bool) -> Result<()> {
    let sel: Selector = read_json(selector)?;
    let cats = sel.path_categories()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cats)?);
        return Ok(());
    }

    let lists = [
        ("Includes", &cats.includes),
        ("Filters", &cats.filters),
        ("Excludes", &cats.excludes),
    ];
    for (label, list) in lists {
        let names: Vec<String> = list.iter().map(ToString::to_string).collect();
        println!("{}: {}", label.blue().bold(), names.join(", "));
    }

    Ok(())
}

fn cmd_split(selector: &Path, owners: &[String], json: bool) -> Result<()> {
    let sel: Selector = read_json(selector)?;
    let splits = sel.split_by_resource_owner(owners)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&splits)?);
        return Ok(());
    }

    println!(
        "{} {} selectors",
        "Split into".green().bold(),
        splits.len().to_string().cyan()
    );
    for split in &splits {
        println!("  {} {}", split.id().yellow(), split);
    }

    Ok(())
}

fn cmd_path(repo_ref: &str, is_item: bool, json: bool) -> Result<()> {
    let rp = ResourcePath::from_data_layer_path(repo_ref, is_item)
        .with_context(|| format!("not a resource path: {}", repo_ref))?;

    if json {
        let doc = serde_json::json!({
            "tenant": rp.tenant(),
            "service": rp.service(),
            "resourceOwner": rp.resource_owner(),
            "category": rp.category(),
            "folders": rp.folders(),
            "item": rp.item(),
            "shortRef": rp.short_ref(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("  Tenant:   {}", rp.tenant().cyan());
    println!("  Service:  {}", rp.service().to_string().cyan());
    println!("  Owner:    {}", rp.resource_owner().cyan());
    println!("  Category: {}", rp.category().to_string().cyan());
    println!("  Folders:  {}", rp.folder(false).cyan());
    if rp.has_item() {
        println!("  Item:     {}", rp.item().cyan());
    }
    println!("  ShortRef: {}", rp.short_ref().yellow());

    Ok(())
}
