//! Terminal Connect Four client.
//!
//! Connects to a Fourline server, joins the queue under a name given on
//! stdin, and plays by column number. Endpoints come from
//! `FOURLINE_WS_URL` and `FOURLINE_API_URL`, defaulting to a local
//! server.
//!
//! ```text
//! $ connect-cli
//! Your name: Ada
//! Waiting for opponent...
//! ```

use std::time::Duration;

use fourline::protocol::{Cell, Seat, COLUMNS, ROWS};
use fourline::{
    ClientConfig, FourlineError, LeaderboardClient, SessionClient,
    SessionView,
};
use fourline::session::SessionPhase;
use tokio::io::{AsyncBufReadExt, BufReader};

fn config_from_env() -> ClientConfig {
    let defaults = ClientConfig::default();
    ClientConfig::new(
        std::env::var("FOURLINE_WS_URL").unwrap_or(defaults.ws_url),
        std::env::var("FOURLINE_API_URL").unwrap_or(defaults.api_url),
    )
}

fn render_cell(view: &SessionView, row: usize, col: usize) -> &'static str {
    let Some(game) = view.game.as_ref() else {
        return ".";
    };
    let winning = game.is_winning_cell(row, col);
    match game.board.cell(row, col) {
        Cell::Empty => ".",
        Cell::Player1 if winning => "R",
        Cell::Player1 => "r",
        Cell::Player2 if winning => "Y",
        Cell::Player2 => "y",
    }
}

fn render(view: &SessionView) {
    if let Some(error) = view.error.as_deref() {
        println!("! {error}");
    }
    if let Some(info) = view.info.as_deref() {
        println!("* {info}");
    }
    if view.game.is_some() {
        println!();
        println!(" 1 2 3 4 5 6 7");
        for row in 0..ROWS {
            let cells: Vec<&str> = (0..COLUMNS)
                .map(|col| render_cell(view, row, col))
                .collect();
            println!(" {}", cells.join(" "));
        }
        println!();
    }
    match view.phase {
        SessionPhase::Playing if view.your_turn => {
            let color = view
                .your_seat
                .map(Seat::color)
                .unwrap_or("?");
            println!("Your move ({color}), column 1-7:");
        }
        SessionPhase::Playing => println!("Opponent is thinking..."),
        SessionPhase::Finished => {
            println!("Type 'again' for a new game, 'quit' to exit.")
        }
        _ => {}
    }
}

async fn print_leaderboard(client: &LeaderboardClient) {
    match client.fetch().await {
        Ok(entries) if entries.is_empty() => {
            println!("No games played yet. Be the first!");
        }
        Ok(entries) => {
            println!("{:<4}{:<22}{:>5}{:>8}{:>7}{:>10}", "#", "Player", "W", "L", "D", "Win %");
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:<4}{:<22}{:>5}{:>8}{:>7}{:>9.1}%",
                    rank + 1,
                    entry.username,
                    entry.wins,
                    entry.losses,
                    entry.draws,
                    entry.win_rate(),
                );
            }
        }
        Err(e) => println!("Failed to load leaderboard: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), FourlineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connect_cli=info,fourline=info".into()),
        )
        .init();

    let config = config_from_env();
    let leaderboard = LeaderboardClient::new(&config.api_url);
    let (handle, mut views) = SessionClient::spawn(config);

    // Re-render on every published view.
    tokio::spawn(async move {
        loop {
            if views.changed().await.is_err() {
                break;
            }
            let view = views.borrow().clone();
            render(&view);
        }
    });

    println!("Your name:");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut joined = false;

    while let Some(line) = lines.next_line().await.unwrap_or(None) {
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "q" => break,
            "leaderboard" | "lb" => print_leaderboard(&leaderboard).await,
            "again" => {
                handle.play_again()?;
                joined = false;
                println!("Your name:");
            }
            _ if !joined => {
                handle.join(input)?;
                joined = true;
            }
            _ => match input.parse::<usize>() {
                Ok(column @ 1..=COLUMNS) => handle.play(column - 1)?,
                _ => println!("Enter a column 1-7, 'leaderboard', 'again', or 'quit'."),
            },
        }
    }

    handle.shutdown()?;
    // Give the driver a moment to close the socket cleanly.
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
