//! Lane Hopper headless driver
//!
//! Runs a seeded level with a scripted move string at a fixed tick cadence and
//! reports how the run ended. Rendering frontends embed the library instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use lane_hopper::Tuning;
use lane_hopper::sim::{Command, Direction, Recorder, World};

#[derive(Debug, Parser)]
#[command(name = "lane-hopper", about = "Run a Lane Hopper level without a renderer")]
struct Args {
    /// Level seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Moves as U/D/L/R letters
    #[arg(long, default_value = "")]
    moves: String,

    /// Ticks between scripted moves
    #[arg(long, default_value_t = 6)]
    move_interval: u64,

    /// JSON tuning file (missing fields use defaults)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the final snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Write the recorded input log to this file
    #[arg(long)]
    record: Option<PathBuf>,
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path.display()))
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match Direction::from_char(c) {
            Some(direction) => Ok(direction),
            None => bail!("unknown move '{c}' (expected U, D, L or R)"),
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.move_interval == 0 {
        bail!("--move-interval must be at least 1");
    }
    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    let moves = parse_moves(&args.moves)?;

    log::info!(
        "Lane Hopper (headless) seed={} ticks={} moves={}",
        args.seed,
        args.ticks,
        moves.len()
    );

    let mut recorder = Recorder::new(World::with_tuning(args.seed, tuning)?);
    let mut script = moves.into_iter();

    for tick in 0..args.ticks {
        if tick % args.move_interval == 0
            && let Some(direction) = script.next()
        {
            recorder.apply(Command::Move(direction));
        }
        recorder.tick();
        if recorder.world().outcome.is_over() {
            break;
        }
    }

    let (world, input_log) = recorder.into_parts();

    if let Some(path) = &args.record {
        fs::write(path, input_log.to_json()?)
            .with_context(|| format!("writing input log {}", path.display()))?;
        log::info!(
            "Recorded {} commands to {}",
            input_log.events.len(),
            path.display()
        );
    }

    if args.json {
        println!("{}", world.snapshot().to_json()?);
    } else {
        println!(
            "seed={} outcome={:?} score={} high_score={} ticks={} row={} col={}",
            world.seed,
            world.outcome,
            world.score,
            world.high_score,
            world.tick_count,
            world.player.row,
            world.player.col
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves() {
        let moves = parse_moves("uu L r\nD").unwrap();
        assert_eq!(
            moves,
            vec![
                Direction::Up,
                Direction::Up,
                Direction::Left,
                Direction::Right,
                Direction::Down
            ]
        );
        assert!(parse_moves("UX").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["lane-hopper"]);
        assert_eq!(args.seed, 1);
        assert_eq!(args.move_interval, 6);
        assert!(!args.json);
    }
}
