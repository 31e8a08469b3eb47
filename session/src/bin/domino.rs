use std::path::PathBuf;

use clap::{Parser, Subcommand};
use database::{GameStore, SqliteGameStore};
use itertools::Itertools;
use session::{input, AppConfig, SessionError, SessionManager};
use types::{Game, GameId, GameStatus};

#[derive(Parser, Debug)]
#[command(name = "domino", about = "Keep score of domino games")]
struct Params {
    /// SQLite database file (overrides DATABASE_URL and the config file)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a game and make it the current one
    New {
        #[arg(short, long, required = true)]
        player: Vec<String>,
        #[arg(short, long)]
        target: Option<String>,
    },
    /// Record a round: the winner takes the points left in the other hands
    Round {
        #[arg(short, long)]
        winner: String,
        /// Points left in a losing hand, as NAME=POINTS
        #[arg(short, long)]
        points: Vec<String>,
        #[arg(short, long)]
        game: Option<String>,
    },
    /// Show the scoreboard
    Show { game: Option<String> },
    /// Put every score back to zero and forget the rounds
    Reset { game: Option<String> },
    /// Delete a game
    Delete { game: Option<String> },
    /// List saved games, most recent first
    History,
    /// Resume a saved game
    Open { game: String },
    /// Delete several saved games at once
    Prune {
        #[arg(required = true)]
        games: Vec<String>,
    },
}

fn print_game(game: &Game) {
    println!("{game}");
    match game.status() {
        GameStatus::Won { winner } => {
            if let Some(winner) = game.player(&winner) {
                println!(
                    "\n{} wins with {} points (target {})",
                    winner.name, winner.score, game.target_score
                );
            }
        }
        GameStatus::Active => {
            let leaders = game.leaders();
            if !leaders.is_empty() {
                println!("\nLeading: {}", leaders.iter().map(|p| &p.name).join(", "));
            }
        }
    }
}

async fn target_game<S: GameStore>(
    manager: &mut SessionManager<S>,
    game: Option<String>,
) -> Result<GameId, SessionError> {
    match game {
        Some(id) => Ok(GameId::from(id)),
        None => manager
            .current_game()
            .await?
            .map(|g| g.id)
            .ok_or(SessionError::NoCurrentGame),
    }
}

async fn run(args: Params) -> Result<(), SessionError> {
    let config = AppConfig::load(args.config.as_deref())?;
    let store = SqliteGameStore::open(&config.database_config(args.database)).await?;
    let mut manager = SessionManager::new(store);

    match args.command {
        Command::New { player, target } => {
            let target_score = config.target_score(target.as_deref());
            let game = manager.create_game(&player, target_score).await?;
            println!("Started game {}", game.id);
            print_game(&game);
        }
        Command::Round {
            winner,
            points,
            game,
        } => {
            let game_id = target_game(&mut manager, game).await?;
            let current = manager.load_game(&game_id).await?;
            let winner_id = input::resolve_player(&current, &winner)?;
            let losers_points = input::parse_losers_points(&current, &points)?;
            let updated = manager
                .record_round(&game_id, &winner_id, &losers_points)
                .await?;
            if let Some(round) = updated.rounds.last() {
                let name = updated
                    .player(&round.winner_id)
                    .map_or(winner.as_str(), |p| p.name.as_str());
                println!("{name} gains {} points\n", round.points_gained);
            }
            print_game(&updated);
        }
        Command::Show { game } => {
            let game_id = target_game(&mut manager, game).await?;
            print_game(&manager.load_game(&game_id).await?);
        }
        Command::Reset { game } => {
            let game_id = target_game(&mut manager, game).await?;
            let game = manager.reset_scores(&game_id).await?;
            println!("Scores reset");
            print_game(&game);
        }
        Command::Delete { game } => {
            // the pointer alone is enough, the record may be unreadable
            let game_id = match game {
                Some(id) => GameId::from(id),
                None => manager
                    .current_game_id()
                    .await?
                    .ok_or(SessionError::NoCurrentGame)?,
            };
            manager.delete_game(&game_id).await?;
            println!("Deleted game {game_id}");
        }
        Command::History => {
            let summaries = manager.list_summaries().await?;
            let current = manager.current_game_id().await?;
            if summaries.is_empty() {
                println!("No saved games");
            }
            for summary in summaries {
                let marker = if current.as_ref() == Some(&summary.id) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {summary}");
            }
        }
        Command::Open { game } => {
            let game = manager.open_game(&GameId::from(game)).await?;
            println!(
                "Resumed game {} ({})",
                game.id,
                game.players.iter().map(|p| &p.name).join(", ")
            );
            print_game(&game);
        }
        Command::Prune { games } => {
            let ids: Vec<GameId> = games.into_iter().map(GameId::from).collect();
            manager.delete_games(&ids).await?;
            println!("Deleted {} games", ids.len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Params::parse();
    log::debug!("args: {args:?}");
    if let Err(err) = run(args).await {
        log::debug!("{err:?}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
