use std::path::{Path, PathBuf};

use clap::Parser;
use judge::{
    load_game_config, make_deciders, play_game, GameRecording, Recorder, SeatKind, Tally,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sls::{visualize_piles, visualize_players, GameConfig, GameResult};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Player colors, in seating order
    #[clap(num_args(1..), value_delimiter = ' ', default_values = ["red", "green", "blue", "orange"])]
    players: Vec<String>,

    /// How many games to play
    #[arg(short, long, default_value_t = 1)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Colors of players whose decisions are read from the console
    #[arg(long)]
    human: Vec<String>,

    /// Path to a JSON game config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// End a game after this many turns (overrides the config)
    #[arg(long)]
    max_turns: Option<usize>,

    /// Stop playing as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record the game's turns as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// Replay a recorded game instead of playing
    #[arg(long)]
    replay: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn replay_game(path: &Path) -> anyhow::Result<()> {
    let recording = GameRecording::load(path)?;
    let session = recording.replay()?;
    info!(turns = session.history().len(), result = %recording.result, "Replayed game");
    eprintln!(
        "Piles:\n{}\nPlayers:\n{}",
        visualize_piles(session.state()),
        visualize_players(session.state())
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    if let Some(path) = &args.replay {
        return replay_game(path);
    }

    let mut config = match &args.config {
        Some(path) => load_game_config(path)?,
        None => GameConfig::default(),
    };
    if args.max_turns.is_some() {
        config.max_turns = args.max_turns;
    }

    for human in &args.human {
        if !args.players.contains(human) {
            anyhow::bail!("Human player '{}' is not among the players", human);
        }
    }
    let seats: Vec<SeatKind> = args
        .players
        .iter()
        .map(|color| {
            if args.human.contains(color) {
                SeatKind::Console
            } else {
                SeatKind::Random
            }
        })
        .collect();

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let mut deciders = make_deciders(&mut rng, &args.players, &seats);
    let mut tally = Tally::new(args.players.len());
    for game_idx in 0..args.num_games {
        let (session, result) = play_game(
            &mut rng,
            game_idx,
            &args.players,
            &mut deciders,
            &config,
            &mut recorder,
        )?;
        tally.add(&session, &result);
        if let GameResult::IllegalMoveByPlayer { err, .. } = &result {
            let mut err_dyn = err as &dyn std::error::Error;
            while let Some(src_err) = err_dyn.source() {
                info!("{}", err_dyn);
                err_dyn = src_err;
            }
            info!("{}", err_dyn);
            if args.stop_on_illegal_move {
                break;
            }
        }
    }

    eprintln!("{}", tally.summary(&args.players));

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
