// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Command line front end: generate an LCG sequence and validate it.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::Rng;
use serde::Serialize;

use lcgcheck::params::{self, parse_integer, LARGE_COUNT_THRESHOLD};
use lcgcheck::{strings, utils, GeneratorParams, LcgError, Run, Sequence, Session, Severity};

#[derive(Parser)]
#[command(name = "lcgcheck")]
#[command(about = "Generate a linear congruential sequence and test it for uniformity")]
#[command(version)]
struct Cli {
    /// Modulus m, must be greater than 1
    #[arg(short = 'm', long, allow_hyphen_values = true)]
    modulus: Option<String>,

    /// Multiplier a
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    multiplier: Option<String>,

    /// Increment c
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    increment: Option<String>,

    /// Seed, 0 <= seed < m
    #[arg(short = 's', long, allow_hyphen_values = true, conflicts_with = "random_seed")]
    seed: Option<String>,

    /// Number of values to generate
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    count: Option<String>,

    /// How violated full period conditions are treated
    #[arg(long, default_value = "advisory", value_parser = Severity::from_str)]
    severity: Severity,

    /// Draw the seed uniformly from 0..m
    #[arg(long)]
    random_seed: bool,

    /// Replace m with the smallest power of two >= count
    #[arg(long)]
    auto_modulus: bool,

    /// Ask for confirmation above this many values
    #[arg(long, default_value_t = LARGE_COUNT_THRESHOLD)]
    confirm_threshold: usize,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the run as JSON
    #[arg(long)]
    json: bool,

    /// Skip the table of generated values
    #[arg(long)]
    no_table: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: String,
    elapsed: String,
    #[serde(flatten)]
    run: &'a Run,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, LcgError> {
    let start = Instant::now();
    let generated_at = chrono::Local::now();
    let params = resolve_params(cli)?;

    if !cli.yes
        && params::needs_confirmation(params.count(), cli.confirm_threshold)
        && !confirm(params.count())
    {
        println!("Generation cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut session = Session::new(params, cli.severity);
    let run = session.run()?;
    info!("run finished in {}", utils::format_elapsed_time(start.elapsed()));

    if cli.json {
        let output = JsonOutput {
            generated_at: generated_at.to_rfc3339(),
            elapsed: utils::format_elapsed_time(start.elapsed()),
            run,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize run: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let p = &run.params;
    println!(
        "Run at {}: m = {}, a = {}, c = {}, seed = {}, count = {}",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        p.modulus(),
        p.multiplier(),
        p.increment(),
        p.seed(),
        p.count()
    );
    if let Some(warning) = &run.generated.warning {
        println!("{} {}", strings::WARN_STR, warning);
    }
    if !cli.no_table {
        println!("{}", format_table(&run.generated.sequence));
    }
    println!("{}", run.report.format());
    println!(
        "Total runtime: {}",
        utils::format_elapsed_time(start.elapsed())
    );
    Ok(ExitCode::SUCCESS)
}

/// Merge command line values with the defaults and apply the pre generation helpers.
fn resolve_params(cli: &Cli) -> Result<GeneratorParams, LcgError> {
    let defaults = GeneratorParams::default();
    let value = |name: &'static str, text: &Option<String>, default: u64| match text {
        Some(t) => parse_integer(name, t),
        None => Ok(default as i64),
    };
    let count = value("count", &cli.count, defaults.count() as u64)?;
    let mut modulus = value("modulus", &cli.modulus, defaults.modulus())?;
    if cli.auto_modulus {
        if let Ok(n) = usize::try_from(count) {
            let suggested = params::suggest_modulus(n)?;
            modulus = i64::try_from(suggested).map_err(|_| {
                LcgError::InvalidParameter {
                    name: "count",
                    reason: format!("modulus {suggested} for {count} values is out of range"),
                }
            })?;
            info!("modulus adjusted to {modulus}");
        }
    }
    let multiplier = value("multiplier", &cli.multiplier, defaults.multiplier())?;
    let increment = value("increment", &cli.increment, defaults.increment())?;
    let seed = match &cli.seed {
        Some(text) => parse_integer("seed", text)?,
        None if cli.random_seed && modulus > 1 => rand::rng().random_range(0..modulus),
        // The default seed belongs to the default modulus.
        None if cli.auto_modulus && modulus > 1 => defaults.seed() as i64 % modulus,
        None => defaults.seed() as i64,
    };
    GeneratorParams::new(modulus, multiplier, increment, seed, count)
}

fn confirm(count: usize) -> bool {
    print!("You requested {count} numbers, this may be a lot of output. Continue? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// One indexed table of states and normalized values.
fn format_table(sequence: &Sequence) -> String {
    let mut lines = vec![format!("{:>6} | {:>20} | {:>6}", "#", "X", "u")];
    for (i, point) in sequence.points().iter().enumerate() {
        lines.push(format!(
            "{:>6} | {:>20} | {:.4}",
            i + 1,
            point.state,
            point.normalized
        ));
    }
    lines.join("\n")
}
