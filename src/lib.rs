//! Hermit: a local-first workspace integrity engine.
//!
//! Hermit keeps a developer workspace in shape. It enforces a numbered
//! directory layout, diagnoses and repairs deviations, and tracks
//! onboarding progress against that layout with a crash-safe persisted
//! checklist.
//!
//! # Core Principles
//!
//! - **One gateway**: every workspace mutation routes through the safe
//!   filesystem gateway, so path-escape and partial-write bugs are
//!   eliminated in one place
//! - **Atomic state**: durable state is a whole-snapshot JSON file written
//!   via temp-file + fsync + rename; readers never see a partial write
//! - **Isolated diagnostics**: one broken health check never hides the
//!   findings of the others
//! - **One-way progress**: a completed onboarding item stays completed,
//!   whatever the workspace does afterwards
//!
//! # Crate Structure
//!
//! - [`core`]: gateway, workspace handle, layout tables, config,
//!   presenter, scaffolding
//! - [`checks`]: the doctor (health check engine and built-in checks)
//! - [`onboarding`]: the persisted onboarding checklist
//!
//! # Examples
//!
//! ```bash
//! # Lay out a new workspace
//! hermit init
//!
//! # Diagnose, then repair with confirmation
//! hermit doctor check --fix
//!
//! # See onboarding progress
//! hermit onboard status
//! ```

pub mod checks;
pub mod core;
pub mod onboarding;

use core::error::HermitError;
use core::store::Workspace;
use core::{config, output, scaffold, store};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const HERMIT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[clap(
    name = "hermit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Workspace layout, health, and onboarding"
)]
struct Cli {
    /// Plain-text output (no color, no glyphs)
    #[clap(long, global = true)]
    plain: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct InitCli {
    /// Directory to initialize (defaults to current working directory)
    #[clap(short, long)]
    dir: Option<PathBuf>,
    /// Overwrite existing seed files
    #[clap(long)]
    force: bool,
    /// Show what would change without writing files
    #[clap(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the workspace layout and state directory
    #[clap(name = "init", visible_alias = "i")]
    Init(InitCli),

    /// Diagnose and repair the workspace
    #[clap(name = "doctor", visible_alias = "d")]
    Doctor(checks::DoctorCli),

    /// Track onboarding progress
    #[clap(name = "onboard", visible_alias = "o")]
    Onboard(onboarding::OnboardCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}

pub fn run() -> Result<(), HermitError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;

    match cli.command {
        Command::Version => {
            // Simple output for scripts/parsing.
            println!("v{}", HERMIT_VERSION);
            Ok(())
        }
        Command::Init(init_cli) => {
            let raw_dir = match init_cli.dir {
                Some(d) => d,
                None => current_dir,
            };
            let target_dir = std::fs::canonicalize(&raw_dir).map_err(HermitError::IoError)?;
            let presenter = output::for_terminal(!cli.plain);

            let opts = scaffold::ScaffoldOptions {
                target_dir: target_dir.clone(),
                force: init_cli.force,
                dry_run: init_cli.dry_run,
            };
            scaffold::scaffold_workspace(&opts, presenter.as_ref())?;

            if !init_cli.dry_run {
                // Seed the onboarding snapshot; detection immediately
                // credits whatever the scaffold just put in place.
                let onboarding::StateLoad { mut state, recovered } =
                    onboarding::load(&target_dir);
                if let Some(warning) = &recovered {
                    presenter.warn(warning);
                }
                onboarding::refresh(&mut state, &target_dir);
                onboarding::persist(&state, &target_dir)?;

                presenter.line("");
                presenter.line(
                    "Workspace ready. Run `hermit onboard status` to see what comes next.",
                );
            }
            Ok(())
        }
        _ => {
            let root = store::find_workspace_root(&current_dir)?;
            let workspace = Workspace::new(root);

            let loaded_config = config::load_config(&workspace.root);
            let color = !cli.plain
                && loaded_config
                    .as_ref()
                    .map(|c| c.output.color.unwrap_or(true))
                    .unwrap_or(true);
            let presenter = output::for_terminal(color);
            let workspace_config = match loaded_config {
                Ok(c) => c,
                Err(e) => {
                    presenter.warn(&format!("{} (using defaults)", e));
                    config::WorkspaceConfig::default()
                }
            };

            match cli.command {
                Command::Doctor(doctor_cli) => checks::run_doctor_cli(
                    &workspace,
                    &workspace_config,
                    presenter.as_ref(),
                    doctor_cli,
                ),
                Command::Onboard(onboard_cli) => {
                    onboarding::run_onboard_cli(&workspace, presenter.as_ref(), onboard_cli)
                }
                _ => unreachable!(),
            }
        }
    }
}
