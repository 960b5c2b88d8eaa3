// src/main.rs

use anyhow::Context;
use clap::Parser;
use qcoherence::therapy::{Dashboard, Histogram, RunReport, SessionOutcome, SessionReport};
use qcoherence::{Backend, OutputFormat, SessionConfig, Simulator, TherapyEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qcoherence", version, about = "Quantum coherence therapy session on a statevector simulator")]
struct Cli {
    #[arg(long, default_value_t = 1024, help = "Measurement shots per session")]
    shots: usize,
    #[arg(long, help = "Seed for reproducible sampling")]
    seed: Option<u64>,
    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, default_value_t = 10, help = "Outcomes listed in the histogram")]
    top: usize,
    #[arg(long, default_value_t = 0.4, help = "Coherence score below which the emergency protocol runs")]
    threshold: f64,
    #[arg(long, help = "Skip the emergency protocol")]
    no_emergency: bool,
    #[arg(long, help = "Print the circuit diagram")]
    show_circuit: bool,
}

impl From<Cli> for SessionConfig {
    fn from(cli: Cli) -> Self {
        SessionConfig {
            shots: cli.shots,
            seed: cli.seed,
            emergency_threshold: cli.threshold,
            emergency_enabled: !cli.no_emergency,
            histogram_top: cli.top,
            show_circuit: cli.show_circuit,
            output: if cli.json { OutputFormat::Json } else { OutputFormat::Text },
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::from(Cli::parse());
    config.validate().context("invalid session configuration")?;

    let simulator = match config.seed {
        Some(seed) => Simulator::with_seed(seed),
        None => Simulator::new(),
    };
    let mut engine = TherapyEngine::new(simulator).with_default_shots(config.shots);

    if config.output == OutputFormat::Text {
        println!("🌸 Quantum Coherence Therapy Session 🌸");
        println!("Initializing being-seeming oscillation stabilization...\n");
    }

    let mut run = RunReport::default();
    let outcome = engine.run_session(config.shots).context("therapy session failed")?;
    report(&engine, &config, &outcome, false, &mut run);

    if config.emergency_enabled && outcome.metrics.is_low_coherence(config.emergency_threshold) {
        if config.output == OutputFormat::Text {
            println!("\n⚠ Low coherence detected - initiating emergency protocols...");
            println!("\n🚨 Applying Emergency Decoherence Recovery Protocol 🚨");
        }
        let recovered = engine.emergency_recovery().context("emergency recovery failed")?;
        if config.output == OutputFormat::Text {
            println!("Anxiety level reduced to {:.1}% of original", engine.anxiety_level() * 100.0);
        }
        report(&engine, &config, &recovered, true, &mut run);
    }

    if config.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&run).context("failed to serialize session report")?);
    }
    Ok(())
}

fn report<B: Backend>(engine: &TherapyEngine<B>, config: &SessionConfig, outcome: &SessionOutcome, emergency: bool, run: &mut RunReport) {
    match config.output {
        OutputFormat::Json => run.push(SessionReport::new(
            engine.backend().name(),
            config.shots,
            emergency,
            engine.anxiety_level(),
            &outcome.metrics,
            &outcome.counts,
        )),
        OutputFormat::Text => {
            if config.show_circuit {
                println!("{}", engine.circuit());
            }
            print!("{}", Dashboard::new(&outcome.metrics));
            println!("\nMeasurement Results:");
            println!("Most frequent state: {}", outcome.metrics.most_frequent);
            println!();
            print!("{}", Histogram::new(&outcome.counts, config.histogram_top));
        }
    }
}
