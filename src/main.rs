//! Fleet model entry point: CLI wiring, scenario loading and report output.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ev_fleet_model::config::ScenarioConfig;
use ev_fleet_model::io::export::{export_profile_csv, export_report_csv};
use ev_fleet_model::runner::{Evaluation, run_scenario};

/// Electric truck fleet cost, emissions and site-load model.
///
/// If neither --scenario nor --preset is given, the baseline preset is used.
#[derive(Debug, Parser)]
#[command(name = "ev-fleet-model", version)]
struct Cli {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, constrained_site, night_shift, marginal_case)
    #[arg(long)]
    preset: Option<String>,

    /// Print result, issues and solutions as JSON
    #[arg(long)]
    json: bool,

    /// Export the report (KPIs, issues, solutions) to CSV
    #[arg(long)]
    report_out: Option<PathBuf>,

    /// Export the 24-hour charging profile to CSV
    #[arg(long)]
    profile_out: Option<PathBuf>,

    /// Start REST API server after evaluation (requires the `api` feature)
    #[arg(long)]
    serve: bool,

    /// API server port
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(cli: &Cli) -> ScenarioConfig {
    // --scenario takes priority, then --preset, then baseline default
    let loaded = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };

    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn print_evaluation(eval: &Evaluation, json: bool) {
    if json {
        match serde_json::to_string_pretty(eval) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize result: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{eval}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    #[cfg(not(feature = "api"))]
    if cli.serve {
        eprintln!(
            "error: --serve (port {}) requires building with the `api` feature",
            cli.port
        );
        process::exit(1);
    }

    let scenario = load_scenario(&cli);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let eval = run_scenario(&scenario);
    for notice in &eval.result.notices {
        warn!(%notice, "input adjusted");
    }

    print_evaluation(&eval, cli.json);

    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_report_csv(&eval.result, &eval.issues, &eval.solutions, path) {
            eprintln!("error: failed to write report CSV: {e}");
            process::exit(1);
        }
        eprintln!("Report written to {}", path.display());
    }

    if let Some(ref path) = cli.profile_out {
        if let Err(e) = export_profile_csv(&eval.result, path) {
            eprintln!("error: failed to write profile CSV: {e}");
            process::exit(1);
        }
        eprintln!("Charging profile written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ev_fleet_model::api::AppState {
            scenario,
            evaluation: eval,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(ev_fleet_model::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
