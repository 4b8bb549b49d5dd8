//! Sky Glider headless runner
//!
//! Flies a session with the autopilot (or a seeded random input tape) at a
//! steady 60 Hz frame rate and prints the final snapshot as JSON.
//!
//! ```text
//! sky-glider [--config PATH] [--seconds N] [--random SEED] [--fixed]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sky_glider::sim::{Autopilot, Session, random_tape};
use sky_glider::{ConfigError, Settings, StepMode};

/// Host frame rate for headless runs
const FRAME_DT: f32 = 1.0 / 60.0;
/// Longest run the runner will fly (one day of game time)
const MAX_SECONDS: f32 = 86_400.0;

#[derive(Parser, Debug)]
#[command(name = "sky-glider")]
#[command(about = "Fly a Sky Glider session headless and print the final snapshot")]
struct Args {
    /// Settings JSON file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds of game time to fly
    #[arg(long, default_value_t = 60.0, value_parser = parse_seconds)]
    seconds: f32,

    /// Fly a seeded random input tape instead of the autopilot
    #[arg(long = "random", value_name = "SEED")]
    random_seed: Option<u64>,

    /// Use the fixed 60 Hz timestep
    #[arg(long)]
    fixed: bool,
}

fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds: f32 = value.parse().map_err(|_| format!("not a number: {value}"))?;
    if seconds.is_finite() && (0.0..=MAX_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(format!("must be between 0 and {MAX_SECONDS}, got {value}"))
    }
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let mut settings = Settings::load_or_default(args.config.as_deref())?;
    if args.fixed {
        settings.step_mode = StepMode::fixed();
    }
    let mut session = Session::from_settings(&settings)?;
    log::info!("Step mode: {}", session.step_mode().as_str());

    let frames = (args.seconds / FRAME_DT).ceil() as usize;
    let tape = args.random_seed.map(|seed| random_tape(seed, frames));
    let pilot = Autopilot::default();

    let mut snapshot = session.snapshot_now();
    for frame in 0..frames {
        let input = match &tape {
            Some(tape) => tape[frame],
            None => pilot.input_for(&session),
        };
        let elapsed = (frame + 1) as f32 * FRAME_DT;
        snapshot = session.advance(&input, elapsed, FRAME_DT);
        if snapshot.phase.is_terminal() {
            break;
        }
    }

    log::info!(
        "Run over: {:?}, {}/{} rings, {:.2}s",
        snapshot.phase,
        snapshot.passed_rings.len(),
        session.rings().len(),
        snapshot.run_time
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sky Glider (headless) starting...");

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_rejects_non_finite() {
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
        assert_eq!(parse_seconds("0"), Ok(0.0));
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("1e30").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["sky-glider"]).unwrap();
        assert_eq!(args.seconds, 60.0);
        assert!(args.config.is_none());
        assert!(!args.fixed);

        let args =
            Args::try_parse_from(["sky-glider", "--seconds", "5", "--random", "7", "--fixed"]).unwrap();
        assert_eq!(args.seconds, 5.0);
        assert_eq!(args.random_seed, Some(7));
        assert!(args.fixed);

        assert!(Args::try_parse_from(["sky-glider", "--seconds", "inf", "--random", "1"]).is_err());
    }
}
