//! Resupply Patcher CLI
//!
//! Command-line tool for patching Gates of Hell resupply values and merging
//! the per-faction item lists of supported mods.

use clap::{Parser, Subcommand};
use resupply_core::{catalog, find_mod, Patcher, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resupply-cli")]
#[command(about = "Gates of Hell resupply patcher", long_about = None)]
#[command(version)]
struct Cli {
    /// Output directory for patched fragments
    #[arg(short, long, global = true, default_value = "out")]
    out: PathBuf,

    /// Settings file overriding the default patch values (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch the base game's resupply values
    Vanilla,

    /// Patch a mod from the catalog
    Mod {
        /// Catalog name of the mod
        #[arg(short, long)]
        name: String,

        /// Only patch numeric values, keep the per-faction item lists
        #[arg(long)]
        keep_restrictions: bool,
    },

    /// List the mods in the catalog
    ListMods,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error while patching: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> resupply_core::Result<()> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Vanilla => cmd_vanilla(cli.out, settings),
        Commands::Mod {
            name,
            keep_restrictions,
        } => cmd_mod(cli.out, settings, &name, keep_restrictions),
        Commands::ListMods => cmd_list_mods(),
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn cmd_vanilla(out: PathBuf, settings: Settings) -> resupply_core::Result<()> {
    let patcher = Patcher::new(out, settings)?;
    patcher.patch_vanilla()?;
    report_changes(&patcher);
    Ok(())
}

fn cmd_mod(
    out: PathBuf,
    settings: Settings,
    name: &str,
    keep_restrictions: bool,
) -> resupply_core::Result<()> {
    let spec = find_mod(name)?;
    let patcher = Patcher::new(out, settings)?;

    patcher.patch_mod(&spec)?;
    if !keep_restrictions {
        patcher.remove_resupply_restrictions(&spec)?;
    }

    report_changes(&patcher);
    Ok(())
}

fn cmd_list_mods() -> resupply_core::Result<()> {
    let mods = catalog();
    println!("Supported mods ({}):", mods.len());
    for spec in &mods {
        let fragments = spec.document_paths().len();
        println!(
            "  {} (workshop {}, {} fragments)",
            spec.name, spec.workshop_id, fragments
        );
    }
    Ok(())
}

fn report_changes(patcher: &Patcher) {
    let changed = patcher.changed_files();
    for path in &changed {
        println!("contents of {} have changed", path.display());
    }
    if changed.is_empty() {
        println!("no output files changed");
    }
}
