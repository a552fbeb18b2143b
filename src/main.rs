//! homeload entry point: CLI wiring and config-driven construction.

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;

use homeload::cli::{Cli, Command, SimulateArgs};
use homeload::config::HomeConfig;
use homeload::io::export::export_csv;
use homeload::sim::{self, Engine, SimReport};
use homeload::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs);

    let config = cli.load_config()?;
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("configuration has {} error(s)", errors.len());
    }

    match cli.command {
        Command::Bands => print_bands(&config),
        Command::Simulate(args) => simulate(config, &args),
        #[cfg(feature = "api")]
        Command::Run => run(config).await,
    }
}

fn print_bands(config: &HomeConfig) -> anyhow::Result<()> {
    let day = sim::banded_day(config)?;
    for point in day.points() {
        println!("{point}");
    }
    Ok(())
}

fn simulate(mut config: HomeConfig, args: &SimulateArgs) -> anyhow::Result<()> {
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }

    let mut engine = Engine::from_config(&config)?;
    let results = engine.run()?;
    for r in &results {
        println!("{r}");
    }

    let report = SimReport::from_results(&results, engine.dt_hours());
    println!();
    println!("{report}");

    if let Some(path) = &args.telemetry_out {
        export_csv(&results, path)
            .with_context(|| format!("failed to write telemetry to {}", path.display()))?;
        info!(path = %path.display(), rows = results.len(), "telemetry exported");
    }
    Ok(())
}

#[cfg(feature = "api")]
async fn run(config: HomeConfig) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use homeload::api::{self, AppState};
    use homeload::dispatch::{Dispatcher, HttpDispatcher, MockDispatcher};
    use homeload::feed::PriceFeed;
    use homeload::service::{self, Service, ServiceSettings};
    use homeload::telemetry::shutdown_signal;

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;

    let dispatcher: Arc<dyn Dispatcher> = match config.server.dispatcher.as_str() {
        "http" => Arc::new(HttpDispatcher::new().context("failed to build http client")?),
        _ => Arc::new(MockDispatcher::new()),
    };
    let feed = PriceFeed::new(config.prices.api_url.as_deref())?;
    let service = Arc::new(Service::new(
        ServiceSettings::from_config(&config),
        config.registry()?,
        feed,
        dispatcher,
    ));
    info!(
        appliances = service.registry().len(),
        dispatcher = %config.server.dispatcher,
        "service starting"
    );

    if config.server.probe_status {
        service.probe_statuses().await;
    }

    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(false);
    let worker = tokio::spawn(service::run_price_worker(
        Arc::clone(&service),
        async move {
            // a dropped sender also stops the worker
            let _ = stop_rx.changed().await;
        },
    ));

    let state = AppState { service };
    api::serve(state, addr, async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    })
    .await
    .with_context(|| format!("api server on {addr} failed"))?;

    worker.await.context("price worker panicked")?;
    info!("shutdown complete");
    Ok(())
}
