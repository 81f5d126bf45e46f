//! CLI entry point. One subcommand per experiment, each writing a
//! single `.dat` file; `all` runs every one of them into `--out-dir`.

mod error;
mod experiments;
mod params;
mod pdf;

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use error::HarnessError;
use params::Params;

#[derive(Parser, Debug)]
#[command(name = "smq-harness", about = "Generates data files for the SMQ cache-replacement engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct OutDir {
    /// Directory the `.dat` file is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the two default workload PDFs, one bin per line.
    Pdf {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Dump the cumulative summation table of the primary workload PDF.
    SummationTable {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Track level populations over time for a single multiqueue.
    LevelPopulation {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Compare final hit distributions across level counts `L = 2^i`.
    HitsVsLevels {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Compare final hit distributions across fixed shuffle adjustments.
    HitsVsAdjustments {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Track the hit-analysis ratio at a fixed percent across level counts.
    HaVsLevels {
        #[command(flatten)]
        params: Params,
        #[arg(long, default_value_t = 10)]
        percent: u32,
        #[command(flatten)]
        out: OutDir,
    },
    /// Sweep the hit-analysis ratio across every percent, for one multiqueue.
    HaVsPercent {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Track the hit-analysis ratio under a periodically switching workload,
    /// across fixed shuffle adjustments.
    HaWithChangingPdfVsAdjustments {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Track the hit-analysis ratio and the adjustment autotune picks,
    /// under a periodically switching workload.
    HaWithChangingPdfAndAutotune {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
    /// Run every experiment above, writing all `.dat` files into `out_dir`.
    All {
        #[command(flatten)]
        params: Params,
        #[command(flatten)]
        out: OutDir,
    },
}

fn write_dat(
    out_dir: &Path,
    name: &str,
    f: impl FnOnce(&mut File) -> std::io::Result<()>,
) -> Result<(), HarnessError> {
    let path = out_dir.join(name);
    log::info!("writing {}", path.display());
    let mut file = File::create(&path).map_err(|source| HarnessError::Write {
        path: path.clone(),
        source,
    })?;
    f(&mut file).map_err(|source| HarnessError::Write { path, source })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Pdf { params, out } => {
            write_dat(&out.out_dir, "pdf.dat", |f| experiments::write_pdf(&params, f))?;
        }
        Command::SummationTable { params, out } => {
            write_dat(&out.out_dir, "summation_table.dat", |f| {
                experiments::write_summation_table(&params, f)
            })?;
        }
        Command::LevelPopulation { params, out } => {
            write_dat(&out.out_dir, "level_population.dat", |f| {
                experiments::write_level_population(&params, f)
            })?;
        }
        Command::HitsVsLevels { params, out } => {
            write_dat(&out.out_dir, "hits_vs_levels.dat", |f| {
                experiments::write_hits_vs_levels(&params, f)
            })?;
        }
        Command::HitsVsAdjustments { params, out } => {
            write_dat(&out.out_dir, "hits_vs_adjustments.dat", |f| {
                experiments::write_hits_vs_adjustments(&params, f)
            })?;
        }
        Command::HaVsLevels { params, percent, out } => {
            write_dat(&out.out_dir, "ha_vs_levels.dat", |f| {
                experiments::write_ha_vs_levels(&params, percent, f)
            })?;
        }
        Command::HaVsPercent { params, out } => {
            write_dat(&out.out_dir, "ha_vs_percent.dat", |f| {
                experiments::write_ha_vs_percent(&params, f)
            })?;
        }
        Command::HaWithChangingPdfVsAdjustments { params, out } => {
            write_dat(&out.out_dir, "ha_with_changing_pdf_vs_adjustments.dat", |f| {
                experiments::write_ha_with_changing_pdf_vs_adjustments(&params, f)
            })?;
        }
        Command::HaWithChangingPdfAndAutotune { params, out } => {
            write_dat(&out.out_dir, "ha_with_changing_pdf_and_autotune.dat", |f| {
                experiments::write_ha_with_changing_pdf_and_autotune(&params, f)
            })?;
        }
        Command::All { params, out } => {
            let out_dir = &out.out_dir;
            write_dat(out_dir, "pdf.dat", |f| experiments::write_pdf(&params, f))?;
            write_dat(out_dir, "summation_table.dat", |f| {
                experiments::write_summation_table(&params, f)
            })?;
            write_dat(out_dir, "level_population.dat", |f| {
                experiments::write_level_population(&params, f)
            })?;
            write_dat(out_dir, "hits_vs_levels.dat", |f| {
                experiments::write_hits_vs_levels(&params, f)
            })?;
            write_dat(out_dir, "hits_vs_adjustments.dat", |f| {
                experiments::write_hits_vs_adjustments(&params, f)
            })?;
            write_dat(out_dir, "ha_vs_levels.dat", |f| {
                experiments::write_ha_vs_levels(&params, 10, f)
            })?;
            write_dat(out_dir, "ha_vs_percent.dat", |f| {
                experiments::write_ha_vs_percent(&params, f)
            })?;
            write_dat(out_dir, "ha_with_changing_pdf_vs_adjustments.dat", |f| {
                experiments::write_ha_with_changing_pdf_vs_adjustments(&params, f)
            })?;
            write_dat(out_dir, "ha_with_changing_pdf_and_autotune.dat", |f| {
                experiments::write_ha_with_changing_pdf_and_autotune(&params, f)
            })?;
            log::info!("all experiments written to {}", out_dir.display());
        }
    }

    Ok(())
}
