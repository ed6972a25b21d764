use rand::rngs::StdRng;
use rand::SeedableRng;
use signaltune::config::ConfigManager;
use signaltune::engines::evaluation::{CommandOracle, FitnessEvaluator};
use signaltune::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use signaltune::engines::seeding::generate_population;
use signaltune::report::RunReport;
use signaltune::SignalTuneError;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("signaltune.toml");
    let output_path = args.get(2).map(String::as_str);

    match run(config_path, output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Run failed during {}: {}", e.stage(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str, output_path: Option<&str>) -> Result<(), SignalTuneError> {
    let manager = ConfigManager::new();
    manager.load_from_file(config_path)?;
    let config = manager.get()?;

    let mut rng = match config.evolution.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let population = generate_population(
        config.evolution.population_size,
        &config.intersection,
        &config.seeding,
        config.evolution.min_green,
        &mut rng,
    )?;

    let oracle = CommandOracle::new(config.oracle.clone())?;
    let mut evaluator = FitnessEvaluator::new(oracle, config.evolution.min_green);
    if let Some(root) = &config.oracle.scratch_root {
        evaluator = evaluator.with_scratch_root(root);
    }

    let generation_limit = config.evolution.generation_limit;
    let mut engine = EvolutionEngine::new(config.evolution, evaluator).with_rng(rng);

    let outcome = match engine.run(population, ConsoleProgressCallback::new(generation_limit)) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(best) = engine.best_so_far() {
                log::warn!("Best plan before failure (fitness {:.2}):", best.fitness);
                if let Ok(json) = serde_json::to_string(&best.plan) {
                    log::warn!("{}", json);
                }
            }
            return Err(e);
        }
    };

    let report = RunReport::from_outcome(&outcome);
    match output_path {
        Some(path) => {
            report.write_to(path)?;
            log::info!("Wrote run report to {}", path);
        }
        None => println!("{}", report.to_json()?),
    }

    Ok(())
}
