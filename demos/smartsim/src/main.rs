//! smartsim — compares a base run, where nobody reroutes, with a smart run,
//! where a share of the drivers re-plans at every junction, over the same
//! population and road network.
//!
//! Run with:
//!   cargo run -p smartsim --release -- --config demos/smartsim/configs/grid.toml
//!
//! Writes `trips.csv`, `edge_speeds.csv`, `summary.csv` (and `events.csv` when
//! `output.events` is set) to the configured output directory.

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use st_agent::{generate_agents, Agent, Population};
use st_core::{SimConfig, SimMode};
use st_output::{CsvWriter, EdgeSpeedRow, OutputWriter, SimOutputObserver, SummaryRow, TripRow};
use st_sim::{gather_statistics, simulation_run, GroupStats, RunOutcome};
use st_spatial::{grid_network, load_network_csv, RoadNetwork, RouteCache};

use config::{ExperimentConfig, NetworkConfig};

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct CliArgs {
    #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
    config: PathBuf,

    /// Per-event diagnostics; also raises the default log level to debug.
    #[arg(short, long)]
    debug: bool,

    /// Overrides `output.dir`.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn build_network(config: &NetworkConfig) -> Result<RoadNetwork> {
    match config {
        NetworkConfig::Grid { rows, cols, spacing_m, max_speed_mps, origin } => {
            Ok(grid_network(*rows, *cols, *spacing_m, *max_speed_mps, *origin))
        }
        NetworkConfig::Csv { nodes, edges } => {
            let loaded = load_network_csv(nodes, edges).with_context(|| {
                format!("loading network from {} and {}", nodes.display(), edges.display())
            })?;
            Ok(loaded.network)
        }
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

/// Base and smart runs, each with its own copy of the generator's cache.
#[cfg(feature = "parallel")]
fn run_pair(
    network: &RoadNetwork,
    agents:  &[Agent],
    cache:   &RouteCache,
    config:  &SimConfig,
) -> Result<(RunOutcome, RunOutcome)> {
    use st_sim::NoopObserver;

    let mut base_cache = cache.clone();
    let mut smart_cache = cache.clone();
    let (base, smart) = rayon::join(
        || simulation_run(SimMode::Base, network, agents, &mut base_cache, config, &mut NoopObserver),
        || simulation_run(SimMode::Smart, network, agents, &mut smart_cache, config, &mut NoopObserver),
    );
    Ok((base.context("base run")?, smart.context("smart run")?))
}

#[cfg(not(feature = "parallel"))]
fn run_pair(
    network: &RoadNetwork,
    agents:  &[Agent],
    cache:   &RouteCache,
    config:  &SimConfig,
) -> Result<(RunOutcome, RunOutcome)> {
    use st_sim::NoopObserver;

    let base = simulation_run(SimMode::Base, network, agents, &mut cache.clone(), config, &mut NoopObserver)
        .context("base run")?;
    let smart = simulation_run(SimMode::Smart, network, agents, &mut cache.clone(), config, &mut NoopObserver)
        .context("smart run")?;
    Ok((base, smart))
}

/// Sequential runs logging every event to `writer`.
fn run_pair_logged(
    network: &RoadNetwork,
    agents:  &[Agent],
    cache:   &RouteCache,
    config:  &SimConfig,
    writer:  &mut CsvWriter,
) -> Result<(RunOutcome, RunOutcome)> {
    let mut run = |mode: SimMode| -> Result<RunOutcome> {
        let mut obs = SimOutputObserver::new(&mut *writer, mode);
        let outcome = simulation_run(mode, network, agents, &mut cache.clone(), config, &mut obs)
            .with_context(|| format!("{mode} run"))?;
        if let Some(e) = obs.take_error() {
            return Err(e).context("writing events.csv");
        }
        Ok(outcome)
    };
    let base = run(SimMode::Base)?;
    let smart = run(SimMode::Smart)?;
    Ok((base, smart))
}

// ── Report ────────────────────────────────────────────────────────────────────

fn write_tables(
    writer:     &mut CsvWriter,
    network:    &RoadNetwork,
    population: &Population,
    base:       &RunOutcome,
    smart:      &RunOutcome,
    summary:    &[SummaryRow],
) -> Result<()> {
    writer.write_trips(&TripRow::collect(population, base, smart)?)?;
    writer.write_edge_speeds(&EdgeSpeedRow::collect(network, base, smart))?;
    writer.write_summary(summary)?;
    writer.finish()?;
    Ok(())
}

fn print_group(name: &str, g: &GroupStats) {
    println!(
        "{:<10} {:>7} {:>11.1} {:>11.1} {:>10.2} {:>10.2} {:>9.1}%",
        name,
        g.count,
        g.mean_base,
        g.mean_smart,
        g.mean_delta,
        g.median_delta,
        g.share_improved * 100.0,
    );
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut experiment = ExperimentConfig::from_file(&args.config)?;
    experiment.sim.debug |= args.debug;
    if let Some(dir) = args.output {
        experiment.output.dir = dir;
    }
    experiment.sim.validate().context("invalid [sim] section")?;
    experiment.population.validate().context("invalid [population] section")?;

    // 1. Road network.
    let network = build_network(&experiment.network)?;
    info!("road network: {} nodes, {} edges", network.node_count(), network.edge_count());

    // 2. Population and free-flow candidate routes.
    let t0 = Instant::now();
    let mut cache = RouteCache::new();
    let population = generate_agents(&network, &experiment.population, &mut cache)
        .context("generating agents")?;
    info!(
        "generated {} agents in {:.3} s, {} cached origin/destination pairs",
        population.len(),
        t0.elapsed().as_secs_f64(),
        cache.len()
    );

    // 3. Output directory.
    std::fs::create_dir_all(&experiment.output.dir)
        .with_context(|| format!("creating {}", experiment.output.dir.display()))?;
    let mut writer = CsvWriter::new(&experiment.output.dir)?;

    // 4. Runs.
    let t0 = Instant::now();
    let (base, smart) = if experiment.output.events {
        run_pair_logged(&network, &population.agents, &cache, &experiment.sim, &mut writer)?
    } else {
        run_pair(&network, &population.agents, &cache, &experiment.sim)?
    };
    info!("both runs finished in {:.3} s", t0.elapsed().as_secs_f64());

    // 5. Statistics and tables.
    let stats = gather_statistics(&population.smart_indicator(), &base.travel_times(), &smart.travel_times())?;
    write_tables(
        &mut writer,
        &network,
        &population,
        &base,
        &smart,
        &SummaryRow::from_summary(&stats),
    )?;

    println!();
    for run in [&base, &smart] {
        println!(
            "{:<6} run: {} / {} completed, {} events, {} reroutes, ended at {:.0} s",
            run.mode,
            run.completed(),
            run.outcomes.len(),
            run.events,
            run.reroutes,
            run.end_time.secs(),
        );
    }
    println!();
    println!(
        "{:<10} {:>7} {:>11} {:>11} {:>10} {:>10} {:>10}",
        "Group", "Agents", "Base (s)", "Smart (s)", "Δ mean", "Δ median", "Improved"
    );
    println!("{}", "-".repeat(75));
    print_group("smart", &stats.smart);
    print_group("regular", &stats.regular);
    print_group("all", &stats.all);
    if stats.excluded > 0 {
        println!("({} agents did not complete both runs and are excluded)", stats.excluded);
    }
    println!();
    println!("Output written to {}", experiment.output.dir.display());

    Ok(())
}
