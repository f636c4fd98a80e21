use aerosense::air_quality::Coordinates;
use aerosense::aqi::{classify, pollutants::PollutantBar};
use aerosense::config::{Config, Secrets};
use aerosense::dashboard::{
    CitizenDashboard, LandingDashboard, LoadOutcome, LoadStatus, PolicymakerDashboard, RandomPlaceholders,
    DEFAULT_LOCATION, PRESET_LOCATIONS,
};
use aerosense::gateway;
use aerosense::upstream::Providers;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// Air-quality dashboard backend.
#[derive(Parser, Debug)]
#[command(name = "aerosense", version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway for both proxies.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the label and colours for an AQI category.
    Classify {
        #[arg(allow_negative_numbers = true)]
        aqi: i64,
    },
    /// Load the citizen dashboard for a location.
    Citizen {
        #[arg(default_value = DEFAULT_LOCATION)]
        location: String,
    },
    /// Load the policymaker dashboard for a location.
    Policy {
        #[arg(default_value = DEFAULT_LOCATION)]
        location: String,
        /// Print the plain-text report instead of the panel summary.
        #[arg(long)]
        export: bool,
    },
    /// Landing badge: AQI at a position, or the default city without one.
    Locate {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
    /// List the preset dashboard locations.
    Locations,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aerosense=info"));
    fmt()
        .with_env_filter(filter)
        .with_timer(fmt::time::ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { aqi } => {
            let info = classify(aqi);
            println!("{aqi}: {}", info.label);
            println!("  color:      {}", info.color);
            println!("  background: {}", info.background);
            return Ok(());
        }
        Commands::Locations => {
            for location in PRESET_LOCATIONS {
                let marker = if location == DEFAULT_LOCATION { " (default)" } else { "" };
                println!("{location}{marker}");
            }
            return Ok(());
        }
        _ => {}
    }

    let mut config = Config::load(cli.config.as_deref())?;
    let secrets = Secrets::from_env();
    tracing::debug!(?secrets, "Loaded secrets");
    let providers = Providers::from_config(&config, &secrets)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            gateway::run(&config, providers).await
        }
        Commands::Citizen { location } => {
            let view = CitizenDashboard::from_providers(&providers, Arc::new(RandomPlaceholders));
            let outcome = view.load(&location).await;
            print_notice(&outcome)?;
            let Some(panel) = view.panel() else {
                bail!("No data for {location}");
            };
            println!("{} — AQI {} ({})", panel.location, panel.snapshot.aqi, panel.aqi.label);
            print_bars(&panel.pollutants);
            println!();
            println!("Forecast:");
            for point in &panel.forecast {
                println!("  {}: {} ({})", point.label, point.aqi, classify(point.aqi).label);
            }
            println!();
            println!("AI Summary:\n{}", panel.summary_text());
            println!();
            println!("Health Recommendations:\n{}", panel.health_text());
            Ok(())
        }
        Commands::Policy { location, export } => {
            let view = PolicymakerDashboard::from_providers(&providers, Arc::new(RandomPlaceholders));
            let outcome = view.load(&location).await;
            print_notice(&outcome)?;
            let Some(panel) = view.panel() else {
                bail!("No data for {location}");
            };
            if export {
                if let Some(report) = view.export_report() {
                    print!("{report}");
                }
                return Ok(());
            }
            println!("{} — AQI {} ({})", panel.location, panel.snapshot.aqi, panel.aqi.label);
            println!("Hotspots: {}", if panel.hotspots.is_empty() { "none".to_string() } else { panel.hotspots.join(", ") });
            println!();
            println!("Policy Recommendations:\n{}", panel.recommendations_text());
            Ok(())
        }
        Commands::Locate { lat, lon } => {
            let position = lat.zip(lon).map(|(lat, lon)| Coordinates { lat, lon });
            let view = LandingDashboard::new(providers.air_quality.clone());
            let outcome = view.locate(position).await;
            print_notice(&outcome)?;
            match view.panel() {
                Some(panel) => {
                    println!("{}: AQI {} ({})", panel.location_label, panel.category, panel.aqi.label);
                    Ok(())
                }
                None => bail!("Air quality unavailable"),
            }
        }
        Commands::Classify { .. } | Commands::Locations => Ok(()),
    }
}

fn print_notice(outcome: &LoadOutcome) -> Result<()> {
    if outcome.status == LoadStatus::Ignored {
        bail!("Location must not be blank");
    }
    if let Some(notice) = &outcome.notice {
        eprintln!("{notice}");
    }
    Ok(())
}

fn print_bars(bars: &[PollutantBar]) {
    for bar in bars {
        println!("  {:<6} {:>8.1}", bar.name, bar.value);
    }
}
