use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use crossbeam_channel::{unbounded, Sender};
use merge_core::{
    load_game_config_from_env, FileSaveStore, GameConfig, GeoPosition, MovementMode, Session,
};
use tracing::info;

mod app;

use app::{parse_command, render_grid, Command, ModeArg, TerminalPresenter, HELP};

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the geomerge walking-merge game", long_about = None)]
struct Cli {
    /// Save slot name.
    #[arg(long, default_value = "default")]
    slot: String,
    /// Directory holding save slots.
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,
    /// Game config file; defaults to GEOMERGE_CONFIG_PATH or the builtin.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Half-width of the rendered grid window.
    #[arg(long, default_value_t = 3)]
    view_radius: u32,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => load_game_config_from_env(),
    };

    let store = FileSaveStore::new(&cli.save_dir);
    let mut presenter = TerminalPresenter;

    // The feed stands in for device geolocation: the `feed` command pushes
    // into it. A fresh channel is cut whenever tracking (re)starts.
    let (tx, rx) = unbounded();
    let mut feed_tx: Option<Sender<GeoPosition>> = Some(tx);

    let mut session = Session::load(config, store, cli.slot.clone(), Some(rx), &mut presenter);
    info!(slot = %cli.slot, "cli_player.started");

    println!("{HELP}\n");
    print!("{}", render_grid(&session, cli.view_radius));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("  !! {message}");
                continue;
            }
        };
        match command {
            Command::Step(direction) => {
                session.step(direction, &mut presenter);
                print!("{}", render_grid(&session, cli.view_radius));
            }
            Command::Interact(coord) => {
                session.interact_with(coord, &mut presenter);
                print!("{}", render_grid(&session, cli.view_radius));
            }
            Command::Mode(ModeArg::Manual) => {
                session.set_movement_mode(MovementMode::Manual, None, &mut presenter);
                feed_tx = None;
                println!("  movement: manual");
            }
            Command::Mode(ModeArg::Gps) => {
                let (tx, rx) = unbounded();
                session.set_movement_mode(MovementMode::DeviceTracked, Some(rx), &mut presenter);
                feed_tx = Some(tx);
                println!("  movement: device-tracked");
            }
            Command::Feed(position) => match &feed_tx {
                Some(tx) if session.state().mode == MovementMode::DeviceTracked => {
                    // A send can only fail if the session dropped the
                    // receiver, which mode-switching above rules out.
                    let _ = tx.send(position);
                    session.poll_feed(&mut presenter);
                    print!("{}", render_grid(&session, cli.view_radius));
                }
                _ => println!("  !! device tracking is not active, try 'mode gps'"),
            },
            Command::Look => print!("{}", render_grid(&session, cli.view_radius)),
            Command::NewGame => {
                session.new_game(&mut presenter);
                print!("{}", render_grid(&session, cli.view_radius));
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
