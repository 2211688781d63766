use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use seedsum::io_utils::{io_cli_error, seedsum_cli_error, simple_cli_error};
use seedsum::{parse_target, solve, Params};

/// Find distinct 64-bit seeds whose SHA-256 digests sum to a target.
#[derive(Parser)]
#[command(name = "seedsum")]
struct Args {
    /// Writable directory for spill files
    mem_dir: PathBuf,
    /// Target as big-endian hex; the length (a multiple of 8 hex
    /// digits, up to 64) selects the stage count
    target: Option<String>,
    /// Print a JSON summary after solving
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let meta = fs::metadata(&args.mem_dir)
        .map_err(|e| io_cli_error("opening spill directory", &args.mem_dir, e))?;
    if !meta.is_dir() {
        return Err(simple_cli_error(&format!(
            "'{}' is not a directory",
            args.mem_dir.display()
        ))
        .into());
    }

    let mut params = Params::default();
    let mut target = [0u8; 32];

    if let Some(hex_target) = &args.target {
        if env::var_os("NUMSTAGES").is_some() {
            return Err(simple_cli_error("can't specify both NUMSTAGES and a target").into());
        }
        let (t, num_stages) = parse_target(hex_target)
            .map_err(|e| seedsum_cli_error("parsing target", e))?;
        target = t;
        params.num_stages = num_stages;
    }

    params
        .apply_env()
        .map_err(|e| seedsum_cli_error("reading parameters", e))?;

    let started = Instant::now();
    let solution = solve(&args.mem_dir, target, &params)
        .map_err(|e| seedsum_cli_error("solving", e))?;
    let elapsed = started.elapsed();

    solution.stats.report();
    eprintln!("Solved in {:.2?}", elapsed);

    if args.json {
        let summary = serde_json::json!({
            "target": hex::encode({ let mut be = target; be.reverse(); be }),
            "num_stages": params.num_stages,
            "seeds": solution.seeds,
            "accum": solution.accum.hex(),
            "hashes": solution.stats.hashes,
            "batches": solution.stats.batches,
            "expands": solution.stats.expands,
            "elapsed_ms": elapsed.as_millis(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
