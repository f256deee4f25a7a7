#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a headless Cake Eater game.
//!
//! Wires the process together: board selection, the user roster, the
//! registration and tick countdowns, and the one-second poll loop that
//! drives them. Transport framing is provided by external collaborators;
//! this binary exposes the shared app they would attach to.

use std::{
    env, fs,
    path::PathBuf,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use anyhow::Context as _;
use cake_eater_api::{
    register_game_start, schedule_tick, App, Config, DEFAULT_TICK_INTERVAL,
};
use cake_eater_core::WELCOME_BANNER;
use cake_eater_system_rules::CakeEater;
use cake_eater_system_scheduler::{SystemClock, TimeControl};
use cake_eater_world::{Board, Legend, LegendTile};
use clap::Parser;

/// Command-line options for the Cake Eater game.
#[derive(Debug, Parser)]
#[command(name = "cake-eater")]
struct Args {
    /// Path to an ASCII board layout (' ' empty, '#' wall, 'C' cake);
    /// defaults to the built-in open board.
    #[arg(long)]
    board: Option<PathBuf>,

    /// Seconds before the registration window closes.
    #[arg(long, default_value_t = 300)]
    registration_secs: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let host = env::var("HOST").unwrap_or_else(|_| "localhost".to_owned());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_owned())
        .parse()
        .context("PORT must be a port number")?;

    let users = vec!["team1".to_owned(), "team2".to_owned()];
    let app = match args.board {
        Some(path) => {
            let ascii = fs::read_to_string(&path)
                .with_context(|| format!("could not read board layout {}", path.display()))?;
            let board = Board::from_ascii(&ascii, &default_legend())
                .context("could not parse board layout")?;
            App::from_parts(CakeEater::new(board), users)
        }
        None => App::new(Config::with_users(users)),
    };

    let app = Arc::new(Mutex::new(app));
    let mut timer = TimeControl::new(SystemClock::new());
    register_game_start(
        &mut timer,
        &app,
        Duration::from_secs(args.registration_secs),
    );
    schedule_tick(&mut timer, &app, DEFAULT_TICK_INTERVAL);

    println!("{}", WELCOME_BANNER);
    println!("Serving on {}:{}", host, port);

    loop {
        thread::sleep(Duration::from_secs(1));
        timer.check_due();
        let over = app.lock().map_or(true, |app| app.game().over());
        if over {
            break;
        }
    }

    println!("All cake has been eaten; game over.");
    Ok(())
}

fn default_legend() -> Legend {
    let mut legend = Legend::new();
    let _ = legend.insert(' ', None);
    let _ = legend.insert('#', Some(LegendTile::Wall));
    let _ = legend.insert('C', Some(LegendTile::Cake));
    legend
}
