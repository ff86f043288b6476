use std::{num::NonZeroUsize, path::PathBuf, thread, time::Instant};

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::eyre;
use cubix_core::CubeOrder;
use env_logger::TimestampPrecision;
use log::{LevelFilter, debug};
use player::{Player, Speed};

use crate::config::Config;

mod config;
mod net;
mod repl;

/// Steps through twisty puzzle algorithms on an NxN cube
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The configuration file to use, in TOML format. Defaults to
    /// `cubix/config.toml` in the platform config directory.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the net without ANSI colors
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AlgorithmArgs {
    /// The algorithm, e.g. "R U R' U' (sexy move)"
    algorithm: String,

    /// The cube to play it on, e.g. `3` or `4x4`
    #[arg(long, short)]
    order: Option<CubeOrder>,

    /// Remember the cube every this many steps to speed up going backwards
    #[arg(long)]
    checkpoint_interval: Option<NonZeroUsize>,
}

#[derive(Args)]
struct SpeedArgs {
    /// One of lazy, normal, swift or expert
    #[arg(long, short, conflicts_with = "interval_ms")]
    speed: Option<Speed>,

    /// Milliseconds between steps
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cube after a number of steps
    Show {
        #[command(flatten)]
        args: AlgorithmArgs,

        /// How many steps to apply, defaults to all of them
        #[arg(long, short = 'k')]
        step: Option<usize>,
    },
    /// Play the whole algorithm, printing the cube after every step
    Play {
        #[command(flatten)]
        args: AlgorithmArgs,

        #[command(flatten)]
        speed: SpeedArgs,
    },
    /// Step through the algorithm interactively
    Step {
        #[command(flatten)]
        args: AlgorithmArgs,

        #[command(flatten)]
        speed: SpeedArgs,
    },
}

fn make_player(
    config: &Config,
    args: &AlgorithmArgs,
    speed: Option<&SpeedArgs>,
) -> color_eyre::Result<Player> {
    let order = config.order(args.order)?;
    let interval = match speed {
        Some(speed) => config.interval(speed.speed, speed.interval_ms),
        None => config.interval(None, None),
    };

    let mut player = Player::new(&args.algorithm, order).with_interval(interval);
    if let Some(checkpoints) = args.checkpoint_interval.or(config.checkpoint_interval) {
        debug!(target: "cli", "Checkpointing every {checkpoints} steps");
        player = player.with_checkpoint_interval(checkpoints);
    }

    Ok(player)
}

fn play_to_the_end(mut player: Player, color: bool) {
    net::show(&player, color);

    player.play(Instant::now());
    while let Some(deadline) = player.next_deadline(Instant::now()) {
        thread::sleep(deadline.saturating_duration_since(Instant::now()));
        if player.poll(Instant::now()).is_some() {
            println!();
            net::show(&player, color);
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let color = config.color(cli.no_color);

    match cli.command {
        Commands::Show { args, step } => {
            let mut player = make_player(&config, &args, None)?;
            let applied = step.unwrap_or(player.len());
            if applied > player.len() {
                return Err(eyre!(
                    "Cannot show the cube after {applied} steps, the algorithm only has {}",
                    player.len()
                ));
            }

            player.seek(applied.checked_sub(1))?;
            net::show(&player, color);
        }
        Commands::Play { args, speed } => {
            let player = make_player(&config, &args, Some(&speed))?;
            play_to_the_end(player, color);
        }
        Commands::Step { args, speed } => {
            let player = make_player(&config, &args, Some(&speed))?;
            repl::run(player, color);
        }
    }

    Ok(())
}
