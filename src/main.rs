use haze_machine::batch::{produce, BatchOptions};
use haze_machine::config::{load_config, BatchConfig};
use haze_machine::image::io::write_json_file;
use haze_machine::metrics::compare;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

enum Cli {
    Produce {
        config: BatchConfig,
        output_dir: PathBuf,
        inputs: Vec<PathBuf>,
    },
    Compare {
        results_dir: PathBuf,
        reference_dir: PathBuf,
        report: Option<PathBuf>,
    },
}

fn run() -> Result<(), String> {
    match parse_cli()? {
        Cli::Produce {
            config,
            output_dir,
            inputs,
        } => {
            let options: BatchOptions = config.options();
            let report = produce(&inputs, &output_dir, &options).map_err(|e| e.to_string())?;
            println!(
                "{} {} image(s) in {:.1} ms (seed {})",
                report.mode,
                report.images.len(),
                report.total_ms,
                report.seed
            );
            if let Some(path) = &config.report {
                write_json_file(path, &report).map_err(|e| e.to_string())?;
                println!("JSON report written to {}", path.display());
            }
        }
        Cli::Compare {
            results_dir,
            reference_dir,
            report,
        } => {
            let scores = compare(&results_dir, &reference_dir).map_err(|e| e.to_string())?;
            println!(
                "{} image(s): mean SSIM {:.4}, mean MSE {:.6}",
                scores.images.len(),
                scores.mean_ssim,
                scores.mean_mse
            );
            if let Some(path) = &report {
                write_json_file(path, &scores).map_err(|e| e.to_string())?;
                println!("JSON report written to {}", path.display());
            }
        }
    }
    Ok(())
}

fn parse_cli() -> Result<Cli, String> {
    let mut args = env::args().skip(1).peekable();
    if args.peek().map(String::as_str) == Some("compare") {
        args.next();
        return parse_compare(args);
    }
    let mut config_path = None;
    let mut seed = None;
    let mut parallel = false;
    let mut report = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            "--config" => config_path = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            "--seed" => {
                let value = args.next().ok_or_else(usage)?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|e| format!("invalid --seed {value}: {e}"))?,
                );
            }
            "--parallel" => parallel = true,
            "--report" => report = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}\n{}", usage())),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    if !(2..=3).contains(&positional.len()) {
        return Err(usage());
    }

    let mut config = match &config_path {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => BatchConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    if parallel {
        config.parallel = true;
    }
    if report.is_some() {
        config.report = report;
    }

    let output_dir = positional.remove(0);
    Ok(Cli::Produce {
        config,
        output_dir,
        inputs: positional,
    })
}

fn parse_compare(mut args: impl Iterator<Item = String>) -> Result<Cli, String> {
    let mut report = None;
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            "--report" => report = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}\n{}", usage())),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [results_dir, reference_dir]: [PathBuf; 2] =
        positional.try_into().map_err(|_| usage())?;
    Ok(Cli::Compare {
        results_dir,
        reference_dir,
        report,
    })
}

fn usage() -> String {
    "Usage: haze_machine [--config params.json] [--seed N] [--parallel] [--report out.json] \
     <output_dir> <input_dir> [depth_dir]\n  \
     one input dir dehazes, two (images + depth maps) augment\n       \
     haze_machine compare [--report out.json] <results_dir> <reference_dir>"
        .to_string()
}
