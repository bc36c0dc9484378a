//! PPA simulator entry point: CLI wiring and config-driven run.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use ppa_sim::cli::Cli;
use ppa_sim::config::ScenarioConfig;
use ppa_sim::io::export::export_csv;
use ppa_sim::runner::{execute, prepare};
use ppa_sim::{Result, SimError, telemetry};

fn load_config(cli: &Cli) -> Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then the demo preset
    let cfg = match &cli.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(cli.preset_name())?,
    };
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli)?;
    let mut prepared = prepare(&cfg)?;
    if let Some(id) = cli.profile {
        prepared.select_profile(id)?;
    }

    let output = execute(&prepared)?;

    println!(
        "Turbine: {} ({:.0} kW rated, {} m hub)",
        prepared.turbine.name,
        prepared.turbine.rated_power_w() / 1000.0,
        prepared.turbine.hub_height_m
    );
    println!("PPA price: {:.2} €/MWh", prepared.engine_config.ppa_price);
    for summary in &output.summaries {
        println!("\n{summary}");
    }

    if let Some(path) = &cli.results_out {
        export_csv(&output.rows, &prepared.engine_config.multipliers, path)?;
        info!(path = %path.display(), rows = output.rows.len(), "results written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ppa_sim::api::AppState {
            turbine: prepared.turbine.name.clone(),
            ppa_price: prepared.engine_config.ppa_price,
            grid: prepared.engine_config.multipliers.clone(),
            summaries: output.summaries,
            rows: output.rows,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(ppa_sim::api::serve(state, addr))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(retriable = e.is_retriable(), "run failed");
            eprintln!("error: {e}");
            if let SimError::Config(_) = e {
                eprintln!("see --help for usage");
            }
            ExitCode::FAILURE
        }
    }
}
