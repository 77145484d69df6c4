use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use ice_ndx::prelude::*;
use log::{error, info};

/// Generates Gromacs index files with atom groups and O-H bonds of ice water boxes
#[derive(Parser)]
#[command(name = "ice_ndx", version, about, long_about = None)]
struct Cmd {
    /// Number of water molecules (432 for TIP4P/Ice, 632 for SPC if omitted)
    #[arg(allow_negative_numbers = true)]
    n_molecules: Option<String>,

    /// Water model
    #[arg(short, long, value_enum, default_value = "tip4p-ice")]
    model: WaterModel,

    /// Custom molecule layout (TOML file), replaces the layout of the model
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Output index file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    outfile: PathBuf,

    /// Don't print the greeting
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::builder()
        .format_timestamp(None)
        .format_indent(Some(8))
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cmd = Cmd::parse();

    if !cmd.quiet {
        ice_ndx::greeting("index generator");
    }

    match run(&cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            if let Some(IndexError::InvalidArgument(_)) = e.downcast_ref::<IndexError>() {
                eprintln!("{}", Cmd::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: &Cmd) -> Result<()> {
    // The count is validated before anything touches the output file
    let n_molecules = match &cmd.n_molecules {
        Some(arg) => parse_molecule_count(arg)?,
        None => cmd.model.default_molecules(),
    };

    let layout = match &cmd.layout {
        Some(file) => {
            info!("Loading molecule layout from '{}'...", file.display());
            MoleculeLayout::from_file(file)
                .map_err(IndexError::from)
                .with_context(|| format!("loading layout file '{}'", file.display()))?
        }
        None => {
            info!("Water model: {}", cmd.model);
            cmd.model.layout()
        }
    };

    info!(
        "Generating index for {n_molecules} molecules, {} atoms per molecule...",
        layout.stride()
    );
    let set = generate(&layout, n_molecules, &cmd.outfile)
        .with_context(|| format!("writing index file '{}'", cmd.outfile.display()))?;

    println!("{}", Summary::new(&set, &cmd.outfile));
    Ok(())
}
