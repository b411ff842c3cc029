//! CLI tool for turning scraped help-center pages into slide specs.

mod commands;
mod index;
mod layout;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::BuildOptions;
use slidespec_core::Rules;
use std::path::PathBuf;

/// Build and clean slide specs from extracted help-center pages.
#[derive(Parser, Debug)]
#[command(name = "slidespec")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sectionize each page's raw.html into a slidespec.json
    Build {
        /// Directory holding one folder per extracted page
        #[arg(long)]
        in_dir: PathBuf,

        /// Output directory (default: same as --in-dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// JSON file replacing the boilerplate and chrome rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Also write a slides.md outline per page
        #[arg(long)]
        preview: bool,

        /// Number of worker threads (default: one per core)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Remove cross-page duplicate slides and shared Overview boilerplate
    Clean {
        /// Directory holding built slide specs
        #[arg(long)]
        in_dir: PathBuf,

        /// Directory receiving the cleaned corpus
        #[arg(long)]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Build {
            in_dir,
            out_dir,
            rules,
            preview,
            jobs,
        } => {
            let rules = match rules {
                Some(path) => commands::load_rules(&path)?,
                None => Rules::default(),
            };
            let opts = BuildOptions {
                out_dir: out_dir.unwrap_or_else(|| in_dir.clone()),
                in_dir,
                rules,
                preview,
                jobs,
            };

            let summary = commands::run_build(&opts)?;
            println!(
                "Wrote {} slide specs ({} skipped) -> {}",
                summary.written,
                summary.skipped,
                summary.index_path.display()
            );
        }
        Command::Clean { in_dir, out_dir } => {
            let summary = commands::run_clean(&in_dir, &out_dir)?;

            if args.verbose {
                for page in &summary.report.pages {
                    eprintln!(
                        "{}: {} -> {} slides ({} duplicates, {} overview bullets)",
                        page.name,
                        page.slides_before,
                        page.slides_after,
                        page.duplicates_removed,
                        page.overview_bullets_removed
                    );
                }
            }
            println!(
                "Cleaned {} pages ({} skipped, {} duplicate keys, overview core of {}) -> {}",
                summary.written,
                summary.skipped,
                summary.report.duplicate_keys,
                summary.report.boilerplate_core,
                summary.index_path.display()
            );
        }
    }

    Ok(())
}
