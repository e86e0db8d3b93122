//! `mapdiary` - CLI for the travel diary map core
//!
//! Lists entries, clusters them for a zoom level, and replays viewport
//! changes through the debounced map viewport.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info};

use mapdiary::cli::{
    Cli, ClusterCommand, Command, ConfigCommand, EntriesCommand, OutputFormat, SimulateCommand,
};
use mapdiary::{
    init_logging, AnnotationClusterer, AnnotationState, Config, Coordinate, EntryStore,
    MapViewport, Marker, Region, Span, StaticEntryStore, ZoomTier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = if needs_config(&cli.command) {
        Config::load_from(cli.config.clone()).context("loading configuration")?
    } else {
        Config::default()
    };

    match cli.command {
        Command::List(ref cmd) => handle_list(&config, &cli, cmd),
        Command::Cluster(ref cmd) => handle_cluster(&config, &cli, cmd),
        Command::Simulate(ref cmd) => handle_simulate(&config, &cli, cmd).await,
        Command::Config(ref cmd) => handle_config(&config, cmd),
    }
}

/// `config path` and `config validate` work without loading the active
/// configuration, so a broken default file cannot block them.
fn needs_config(command: &Command) -> bool {
    !matches!(
        command,
        Command::Config(ConfigCommand::Path | ConfigCommand::Validate { .. })
    )
}

fn open_store(config: &Config, cli: &Cli) -> anyhow::Result<StaticEntryStore> {
    let path = cli.entries.as_ref().or(config.entries.path.as_ref());
    match path {
        Some(path) => StaticEntryStore::from_json_file(path)
            .with_context(|| format!("loading entries from {}", path.display())),
        None => {
            debug!("Using built-in sample entries");
            Ok(StaticEntryStore::sample()?)
        }
    }
}

fn handle_list(config: &Config, cli: &Cli, cmd: &EntriesCommand) -> anyhow::Result<()> {
    let store = open_store(config, cli)?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(store.list_view())?);
        }
        OutputFormat::Plain => {
            for entry in store.list_view() {
                println!(
                    "{} | {} | {}",
                    entry.title,
                    entry.date.format("%Y-%m-%d"),
                    entry.place.city
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<28} {:<10} {:<14} {:<8} {:>4}",
                "TITLE", "DATE", "CITY", "SEASON", "DAYS"
            );
            for entry in store.list_view() {
                println!(
                    "{:<28} {:<10} {:<14} {:<8} {:>4}",
                    entry.title,
                    entry.date.format("%Y-%m-%d"),
                    entry.place.city,
                    format!("{} {}", entry.season, entry.year),
                    entry.duration_days
                );
            }
        }
    }
    Ok(())
}

fn handle_cluster(config: &Config, cli: &Cli, cmd: &ClusterCommand) -> anyhow::Result<()> {
    let store = open_store(config, cli)?;
    let clusterer = AnnotationClusterer::new(config.clustering);
    let initial = config.initial_region()?;

    let state = match (cmd.zoom, cmd.span) {
        (_, Some(span)) => {
            let region = Region::new(initial.center, Span::new(span.min(180.0), span)?);
            AnnotationState::compute(region, store.list_view(), &clusterer, 1)
        }
        (Some(zoom), None) => {
            if !zoom.is_finite() {
                bail!("zoom level must be finite, got {zoom}");
            }
            AnnotationState::at_zoom(initial, zoom, store.list_view(), &clusterer, 1)
        }
        (None, None) => bail!("either --zoom or --span is required"),
    };

    print_state(&state, cmd.format)
}

async fn handle_simulate(config: &Config, cli: &Cli, cmd: &SimulateCommand) -> anyhow::Result<()> {
    let store: Arc<dyn EntryStore> = Arc::new(open_store(config, cli)?);
    let settings = config.viewport_settings()?;
    let initial = settings.initial_region;

    let spans = if cmd.spans.is_empty() {
        vec![initial.span.longitude_delta()]
    } else {
        cmd.spans.clone()
    };

    let viewport = MapViewport::spawn(settings, store, AnnotationClusterer::new(config.clustering));

    info!(
        events = cmd.events,
        interval_ms = cmd.interval_ms,
        debounce_ms = config.viewport.debounce_ms,
        "Replaying viewport changes"
    );

    let mut longitude = initial.center.longitude();
    for span in spans.iter().cycle().take(cmd.events as usize) {
        // Pan a little east each step, wrapping at the antimeridian.
        longitude = if longitude + 1.0 > 180.0 { longitude - 359.0 } else { longitude + 1.0 };
        let region = Region::new(
            Coordinate::new(initial.center.latitude(), longitude)?,
            Span::new(span.min(180.0), *span)?,
        );
        viewport.set_region(region)?;
        tokio::time::sleep(Duration::from_millis(cmd.interval_ms)).await;
    }

    let state = viewport.shutdown().await?;

    if cmd.format != OutputFormat::Json {
        println!(
            "{} region change(s) -> {} clustering pass(es), zoom {:.2}",
            cmd.events, state.pass, state.zoom_level
        );
    }
    print_state(&state, cmd.format)
}

fn print_state(state: &AnnotationState, format: OutputFormat) -> anyhow::Result<()> {
    let markers = state.markers();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "zoom_level": state.zoom_level,
                "tier": ZoomTier::from_zoom_level(state.zoom_level),
                "pass": state.pass,
                "markers": markers,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Plain => {
            for marker in &markers {
                println!("{}", plain_line(marker));
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<12} {:<24} {:>5}",
                "TITLE", "DATE", "COORDINATE", "COUNT"
            );
            for marker in &markers {
                println!(
                    "{:<24} {:<12} {:<24} {:>5}",
                    marker.title,
                    marker.date,
                    marker.coordinate.to_string(),
                    marker.count
                );
            }
        }
    }
    Ok(())
}

fn plain_line(marker: &Marker) -> String {
    match marker.badge {
        Some(n) => format!("{} ({}) [{n}]", marker.title, marker.date),
        None => format!("{} ({})", marker.title, marker.date),
    }
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Viewport]");
                println!("  Debounce (ms):      {}", config.viewport.debounce_ms);
                println!(
                    "  Initial center:     {}, {}",
                    config.viewport.initial_latitude, config.viewport.initial_longitude
                );
                println!(
                    "  Initial span:       {} x {}",
                    config.viewport.initial_latitude_delta, config.viewport.initial_longitude_delta
                );
                println!();
                println!("[Clustering]");
                println!("  Country (km):       {}", config.clustering.country_km);
                println!("  Region (km):        {}", config.clustering.region_km);
                println!("  City (km):          {}", config.clustering.city_km);
                println!("  Street (km):        {}", config.clustering.street_km);
                println!();
                println!("[Entries]");
                match &config.entries.path {
                    Some(path) => println!("  Path:               {}", path.display()),
                    None => println!("  Path:               (built-in sample)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_needs_config() {
        assert!(needs_config(&command(&["mapdiary", "list"])));
        assert!(needs_config(&command(&["mapdiary", "cluster", "--zoom", "3"])));
        assert!(needs_config(&command(&["mapdiary", "simulate"])));
        assert!(needs_config(&command(&["mapdiary", "config", "show"])));

        assert!(!needs_config(&command(&["mapdiary", "config", "path"])));
        assert!(!needs_config(&command(&[
            "mapdiary", "config", "validate", "--file", "other.toml"
        ])));
    }

    #[test]
    fn test_validate_ignores_broken_default() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[viewport]\ndebounce_ms = 0").unwrap();
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "[viewport]\ndebounce_ms = 120").unwrap();

        let cli = Cli::try_parse_from([
            "mapdiary",
            "-c",
            broken.path().to_str().unwrap(),
            "config",
            "validate",
            "--file",
            good.path().to_str().unwrap(),
        ])
        .unwrap();

        assert!(Config::load_from(cli.config.clone()).is_err());
        assert!(!needs_config(&cli.command));
        match &cli.command {
            Command::Config(cmd) => handle_config(&Config::default(), cmd).unwrap(),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
