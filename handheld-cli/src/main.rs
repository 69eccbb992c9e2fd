//! # Handheld CLI
//!
//! Runs the handheld console's boot code and repairs it.
//!
//! Usage:
//!   handheld <input>
//!   handheld --strategy parallel --json <input.json>
//!
//! Part 1 is the accumulator at the moment the unmodified program is about
//! to repeat an instruction. Part 2 is the accumulator after the single
//! `jmp`/`nop` flip that lets it terminate.

mod logging;

use clap::Parser;
use handheld_vm::{
    interpreter, load_file, InputFormat, Outcome, Program, Repair, RepairStrategy, Result,
};
use serde::Serialize;
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NO_FIX: i32 = 2;

#[derive(Parser)]
#[command(name = "handheld")]
#[command(author, version, about = "Run and repair handheld console boot code")]
struct Cli {
    /// Boot code file
    input: PathBuf,

    /// Input format: text, json or auto (by extension)
    #[arg(short, long, default_value = "auto")]
    format: InputFormat,

    /// Repair search: sequential, or parallel across all cores
    #[arg(short, long, default_value = "sequential")]
    strategy: RepairStrategy,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Show the program listing, execution path and repair details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print the two answers
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    instructions: usize,
    strategy: RepairStrategy,
    part1: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    part1_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<usize>>,
    part2: Option<Repair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) if e.kind().is_input_error() => {
            eprintln!("Error loading {}: {}", cli.input.display(), e);
            EXIT_FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let program = load_file(&cli.input, cli.format)?;

    // A failed part 1 run does not stop the repair search.
    let (part1, part1_error, path) = if cli.verbose {
        match interpreter::trace(&program) {
            Ok(trace) => (Some(trace.outcome), None, Some(trace.path)),
            Err(e) => (None, Some(e.to_string()), None),
        }
    } else {
        match interpreter::run(&program) {
            Ok(outcome) => (Some(outcome), None, None),
            Err(e) => (None, Some(e.to_string()), None),
        }
    };

    let strategy = cli.strategy;
    tracing::debug!(?strategy, candidates = program.candidates().count(), "starting repair");

    let (part2, error, mut code) = match strategy.run(&program) {
        Ok(found) => (Some(found), None, EXIT_SUCCESS),
        Err(e) if e.is_no_fix() => (None, Some(e.to_string()), EXIT_NO_FIX),
        Err(e) => return Err(e),
    };
    if part1_error.is_some() {
        code = EXIT_FAILURE;
    }

    let report = Report {
        instructions: program.len(),
        strategy,
        part1,
        part1_error,
        path,
        part2,
        error,
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return Ok(EXIT_FAILURE);
            }
        }
    } else {
        print_report(&report, &program, cli);
    }

    Ok(code)
}

fn print_report(report: &Report, program: &Program, cli: &Cli) {
    if cli.quiet {
        if let Some(outcome) = &report.part1 {
            println!("{}", outcome.accumulator());
        }
        if let Some(error) = &report.part1_error {
            eprintln!("Error: {}", error);
        }
        if let Some(found) = &report.part2 {
            println!("{}", found.accumulator);
        }
        if let Some(error) = &report.error {
            eprintln!("Error: {}", error);
        }
        return;
    }

    if cli.verbose {
        println!("--- Program ({} instructions) ---", report.instructions);
        print!("{}", program.listing());
        println!();
    }

    match report.part1 {
        Some(Outcome::Looped {
            accumulator,
            program_counter,
        }) => {
            println!("The accumulator has a value of {} in part 1", accumulator);
            if cli.verbose {
                println!("  loop detected re-entering instruction {}", program_counter);
            }
        }
        Some(Outcome::Completed { accumulator }) => {
            println!(
                "The program terminates without repair; the accumulator has a value of {} in part 1",
                accumulator
            );
        }
        None => {
            if let Some(error) = &report.part1_error {
                eprintln!("Error running part 1: {}", error);
            }
        }
    }

    if let Some(path) = &report.path {
        let steps: Vec<String> = path.iter().map(|pc| pc.to_string()).collect();
        println!("  path: {}", steps.join(" -> "));
    }

    match (&report.part2, &report.error) {
        (Some(found), _) => {
            println!("The accumulator has a value of {} in part 2", found.accumulator);
            println!("  {}: {} -> {}", found.index, found.original, found.patched);
        }
        (None, Some(error)) => eprintln!("Error running part 2: {}", error),
        (None, None) => {}
    }
}
