#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line shell for the Montgomery County crash visualizations.
//!
//! With no subcommand it opens an interactive menu of every visualization;
//! subcommands run one directly. Uses `indicatif-log-bridge` (via
//! [`crash_viz_cli_utils::init_logger`]) so log lines and CSV loading
//! progress bars share the terminal cleanly.

mod config;
mod histogram;
mod menu;
mod race;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crash_viz_histogram_models::HistogramKind;
use crash_viz_race_models::PlaybackState;

use crate::config::AppConfig;
use crate::menu::Interaction;

/// Exit status after the user stops a race with Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Parser)]
#[command(name = "crash_viz", about = "Traffic accident visualizations in the terminal")]
struct Cli {
    /// TOML config file (overrides `CRASH_VIZ_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Accident CSV export (overrides `CRASH_VIZ_DATA` and the config file)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by the commands that build a race timeline.
#[derive(clap::Args)]
struct RaceArgs {
    /// Number of bars shown
    #[arg(long)]
    top_n: Option<usize>,
    /// Interpolated keyframes between adjacent months
    #[arg(long)]
    sub_steps: Option<usize>,
    /// First month of the race (YYYY-MM-DD, any day of the month)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last date the race may reach (YYYY-MM-DD)
    #[arg(long)]
    cutoff_date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the accident-circumstance bar chart race
    Race {
        #[command(flatten)]
        args: RaceArgs,
        /// Length of each keyframe transition in milliseconds
        #[arg(long)]
        transition_ms: Option<u64>,
        /// Start immediately instead of waiting for Enter
        #[arg(long)]
        autoplay: bool,
    },
    /// Draw the speed-limit histogram
    Histogram {
        /// `total` or `compare`
        #[arg(long)]
        mode: Option<HistogramKind>,
        /// First compared year (defaults to the earliest available)
        #[arg(long)]
        first: Option<i32>,
        /// Second compared year (defaults to the latest available)
        #[arg(long)]
        second: Option<i32>,
    },
    /// Export the race keyframes as JSON
    Keyframes {
        #[command(flatten)]
        args: RaceArgs,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// List every visualization
    List,
    /// Show one visualization by id (e.g. "accident-circumstances")
    Show {
        /// Visualization id
        id: String,
        /// Start a race immediately instead of waiting for Enter
        #[arg(long)]
        autoplay: bool,
    },
}

impl RaceArgs {
    fn apply(&self, config: &mut AppConfig) {
        let race = &mut config.race;
        if let Some(top_n) = self.top_n {
            race.top_n = top_n;
        }
        if let Some(sub_steps) = self.sub_steps {
            race.sub_steps = sub_steps;
        }
        if let Some(start_date) = self.start_date {
            race.start_date = start_date;
        }
        if let Some(cutoff_date) = self.cutoff_date {
            race.cutoff_date = cutoff_date;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crash_viz_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    let csv = config.data_path(cli.csv.as_deref());
    log::debug!("Using accident data from {}", csv.display());

    let state = match cli.command {
        None => menu::run(&multi, &config, &csv).await?,
        Some(Commands::Race {
            args,
            transition_ms,
            autoplay,
        }) => {
            args.apply(&mut config);
            if let Some(ms) = transition_ms {
                config.race.transition_ms = ms;
            }
            race::run(&multi, &csv, &config.race, &config.layout, autoplay).await?
        }
        Some(Commands::Histogram {
            mode,
            first,
            second,
        }) => {
            let settings = &mut config.histogram;
            if let Some(mode) = mode {
                settings.mode = mode;
            }
            if first.is_some() {
                settings.first_year = first;
            }
            if second.is_some() {
                settings.second_year = second;
            }
            histogram::run(&multi, &csv, &config.histogram, &config.layout)?;
            PlaybackState::Done
        }
        Some(Commands::Keyframes {
            args,
            output,
            pretty,
        }) => {
            args.apply(&mut config);
            race::export_keyframes(&multi, &csv, &config.race, output.as_deref(), pretty)?;
            PlaybackState::Done
        }
        Some(Commands::List) => {
            menu::list();
            PlaybackState::Done
        }
        Some(Commands::Show { id, autoplay }) => {
            let visualization = crash_viz_catalog::find(&id)?;
            menu::show(
                &multi,
                visualization,
                &config,
                &csv,
                Interaction::Direct { autoplay },
            )
            .await?
        }
    };

    if state == PlaybackState::Cancelled {
        // The blocking Enter prompt may still be waiting on stdin.
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }

    Ok(())
}
