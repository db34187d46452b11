//! The speed-limit histogram command and its interactive controls.

use std::path::Path;

use crash_viz_cli_utils::{IndicatifProgress, MultiProgress};
use crash_viz_histogram::{available_years, build, build_from_config};
use crash_viz_histogram_models::{HistogramConfig, HistogramMode, SpeedRecord};
use crash_viz_ingest::load_speed_records_from_path;
use crash_viz_render::LayoutConfig;
use crash_viz_render::histogram::render_histogram;
use dialoguer::Select;

/// Loads speed-limit records from the CSV.
///
/// # Errors
///
/// Returns an error if the CSV cannot be loaded.
pub fn load_records(
    multi: &MultiProgress,
    csv: &Path,
) -> Result<Vec<SpeedRecord>, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::rows_bar(multi, "Loading speed limits");
    let loaded = load_speed_records_from_path(csv, progress.as_ref())?;
    progress.finish_and_clear();
    Ok(loaded.records)
}

/// Draws the histogram configured by `config`.
///
/// # Errors
///
/// Returns an error if the CSV cannot be loaded or the compare years are
/// invalid.
pub fn run(
    multi: &MultiProgress,
    csv: &Path,
    config: &HistogramConfig,
    layout: &LayoutConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(multi, csv)?;
    let histogram = build_from_config(&records, config)?;
    print_lines(&render_histogram(&histogram, layout));
    Ok(())
}

/// Lets the user switch between total and compare mode and pick the two
/// compared years, redrawing after every choice.
///
/// # Errors
///
/// Returns an error if the CSV cannot be loaded or a prompt fails.
pub fn interactive(
    multi: &MultiProgress,
    csv: &Path,
    config: &HistogramConfig,
    layout: &LayoutConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(multi, csv)?;
    let years = available_years(&records, config.min_year..=config.max_year);

    let mut histogram = build_from_config(&records, config)?;
    loop {
        print_lines(&render_histogram(&histogram, layout));
        println!();

        let mode = match prompt_mode(&years)? {
            ModeChoice::Total => HistogramMode::Total,
            ModeChoice::Compare => {
                let Some((first, second)) = prompt_years(&years)? else {
                    continue;
                };
                HistogramMode::Compare { first, second }
            }
            ModeChoice::Back => return Ok(()),
        };
        histogram = build(&records, mode)?;
    }
}

enum ModeChoice {
    Total,
    Compare,
    Back,
}

fn prompt_mode(years: &[i32]) -> Result<ModeChoice, dialoguer::Error> {
    let mut labels = vec!["Total (all years)"];
    if years.len() >= 2 {
        labels.push("Compare two years");
    }
    labels.push("Back");

    let idx = Select::new()
        .with_prompt("Histogram mode")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match labels[idx] {
        "Total (all years)" => ModeChoice::Total,
        "Compare two years" => ModeChoice::Compare,
        _ => ModeChoice::Back,
    })
}

/// Asks for two different years. The second list leaves out the first
/// choice, so the pair always differs.
fn prompt_years(years: &[i32]) -> Result<Option<(i32, i32)>, dialoguer::Error> {
    if years.len() < 2 {
        println!("Comparison needs at least two years of data.");
        return Ok(None);
    }

    let labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let first_idx = Select::new()
        .with_prompt("First year")
        .items(&labels)
        .default(0)
        .interact()?;
    let first = years[first_idx];

    let remaining: Vec<i32> = years.iter().copied().filter(|y| *y != first).collect();
    let remaining_labels: Vec<String> = remaining.iter().map(ToString::to_string).collect();
    let second_idx = Select::new()
        .with_prompt("Second year")
        .items(&remaining_labels)
        .default(remaining.len() - 1)
        .interact()?;

    Ok(Some((first, remaining[second_idx])))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
