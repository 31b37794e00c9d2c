//! Caper CLI
//!
//! Runs bundled actor-script demos against the sandbox world.

use caperc::demos::{self, DEMOS};
use caperc::run::run_scene;
use caperc::RunConfig;

fn main() {
    caperc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => run_command(&args[2..]),
        "list" => list_demos(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn run_command(args: &[String]) {
    let config = match RunConfig::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Usage: caper run <demo> [--ticks=N] [--budget=B] [--seed=S] [--profile]");
            std::process::exit(1);
        }
    };

    let Some(demo) = demos::find(&config.demo) else {
        eprintln!("error: unknown demo '{}'", config.demo);
        eprintln!();
        list_demos();
        std::process::exit(1);
    };

    let summary = match run_scene(demo.scene(), &config, caper_eval::stdout_handler()) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: demo '{}' is not a valid program: {err}", demo.name);
            std::process::exit(1);
        }
    };

    if let Some(counters) = &summary.counters {
        eprintln!();
        eprintln!("{counters}");
    }

    if let Some(fault) = &summary.fault {
        eprintln!("halted after {} tick(s): {fault}", summary.ticks);
        std::process::exit(1);
    } else if summary.finished {
        eprintln!("finished after {} tick(s)", summary.ticks);
    } else {
        eprintln!("still running after {} tick(s)", summary.ticks);
    }
}

fn list_demos() {
    println!("Available demos:");
    for demo in DEMOS {
        println!("  {:<10} {}", demo.name, demo.summary);
    }
}

fn print_usage() {
    println!("Caper - resumable actor scripts");
    println!();
    println!("Usage: caper <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <demo>    Run a demo tick by tick");
    println!("  list          List the bundled demos");
    println!("  help          Show this message");
    println!();
    println!("Run options:");
    println!(
        "  --ticks=N     Stop after N ticks (default: {})",
        RunConfig::DEFAULT_TICKS
    );
    println!(
        "  --budget=B    Budget per tick (default: {})",
        RunConfig::DEFAULT_BUDGET
    );
    println!("  --seed=S      Seed for random()");
    println!("  --profile     Print execution counters when the run ends");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=caper_eval=debug) for execution traces.");
}
