//! The navigation shell: catalog listing, visualization pages and the
//! interactive home menu.

use std::path::Path;

use console::Style;
use crash_viz_catalog::{Visualization, VisualizationKind};
use crash_viz_cli_utils::MultiProgress;
use crash_viz_race_models::PlaybackState;
use dialoguer::Select;

use crate::config::AppConfig;

/// Prints every visualization id with its title.
pub fn list() {
    for visualization in crash_viz_catalog::all() {
        println!(
            "{:<24} {}",
            visualization.id,
            Style::new().bold().apply_to(visualization.title)
        );
    }
}

/// Prints a visualization's title, teaser and details.
pub fn print_page(visualization: &Visualization) {
    println!();
    println!("{}", Style::new().bold().apply_to(visualization.title));
    println!("{}", Style::new().italic().apply_to(visualization.description));
    println!();
    for paragraph in visualization.details {
        println!("{paragraph}");
        println!();
    }
}

/// How a page should drive interactive parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Run with configured values and no prompts beyond the race start.
    Direct {
        /// Start the race without waiting for Enter.
        autoplay: bool,
    },
    /// Offer the histogram mode controls.
    Prompted,
}

/// Shows one visualization: its page, then the race, the histogram, or the
/// external location.
///
/// # Errors
///
/// Returns an error if loading data or a prompt fails.
pub async fn show(
    multi: &MultiProgress,
    visualization: &Visualization,
    config: &AppConfig,
    csv: &Path,
    interaction: Interaction,
) -> Result<PlaybackState, Box<dyn std::error::Error>> {
    print_page(visualization);

    match visualization.kind {
        VisualizationKind::Race => {
            let autoplay = matches!(interaction, Interaction::Direct { autoplay: true });
            return crate::race::run(multi, csv, &config.race, &config.layout, autoplay).await;
        }
        VisualizationKind::Histogram => match interaction {
            Interaction::Direct { .. } => {
                crate::histogram::run(multi, csv, &config.histogram, &config.layout)?;
            }
            Interaction::Prompted => {
                crate::histogram::interactive(multi, csv, &config.histogram, &config.layout)?;
            }
        },
        kind @ (VisualizationKind::EmbeddedPage { .. } | VisualizationKind::Tableau { .. }) => {
            if let Some(url) = kind.url() {
                println!("Open in a browser: {url}");
            }
            if let Some(image) = kind.preview_image() {
                println!("Preview image:     {image}");
            }
        }
    }

    Ok(PlaybackState::Done)
}

/// Runs the home menu until the user quits, returning to it after every
/// visualization.
///
/// # Errors
///
/// Returns an error if a prompt fails or a visualization cannot be shown.
pub async fn run(
    multi: &MultiProgress,
    config: &AppConfig,
    csv: &Path,
) -> Result<PlaybackState, Box<dyn std::error::Error>> {
    println!("Montgomery County Traffic Accidents (2015-2024)");
    println!();

    let catalog = crash_viz_catalog::all();
    let mut labels: Vec<&str> = catalog.iter().map(|v| v.title).collect();
    labels.push("Quit");

    loop {
        let idx = Select::new()
            .with_prompt("Which visualization would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(visualization) = catalog.get(idx) else {
            return Ok(PlaybackState::Done);
        };

        let state = show(multi, visualization, config, csv, Interaction::Prompted).await?;
        if state == PlaybackState::Cancelled {
            return Ok(state);
        }
        println!();
    }
}
