use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog::{CatalogLoader, HttpCountrySource};
use clap::Parser;
use quiz_core::{QuizSession, RoundTicker};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    error::{ErrorCode, GameError},
    protocol::{GameEvent, GameUpdate},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod render;

use config::load_settings;
use input::{parse_command, to_event, Command};
use render::{OutputMode, Renderer, LOAD_FAILED_MESSAGE, USAGE};

#[derive(Parser, Debug)]
#[command(name = "flag-quiz", about = "Guess the country from its flag")]
struct Args {
    /// Settings file (defaults to ./flag_quiz.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Country endpoint to try, in order. Repeat to add fallbacks.
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,
    /// Seed for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,
    /// Print every update as a JSON line instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if !args.endpoints.is_empty() {
        settings.endpoints = args.endpoints;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let renderer = Renderer::new(mode);

    let source = HttpCountrySource::new(settings.request_timeout())?;
    let loader = CatalogLoader::new(source, &settings.endpoints, settings.catalog_filter());
    let catalog = match loader.load().await {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(error = %err, "no usable country catalog");
            let failure = GameUpdate::Error(GameError::new(
                ErrorCode::CatalogUnavailable,
                LOAD_FAILED_MESSAGE,
            ));
            match mode {
                OutputMode::Json => publish_line(renderer.render(&failure)),
                OutputMode::Text => eprintln!("{LOAD_FAILED_MESSAGE}"),
            }
            return Err(err).context("loading country catalog");
        }
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = QuizSession::new(catalog, settings.rules(), rng)?;

    run(session, renderer).await
}

async fn run<R: Rng>(mut session: QuizSession<R>, renderer: Renderer) -> Result<()> {
    let (events_tx, mut events_rx) = mpsc::channel::<GameEvent>(32);
    let mut ticker = RoundTicker::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let first = session.start_round()?;
    publish(&first, &renderer, &mut ticker, &events_tx);

    loop {
        let event = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(command) => match to_event(command, &session) {
                        Some(event) => event,
                        None => continue,
                    },
                    None => {
                        if renderer.mode() == OutputMode::Text {
                            println!("{USAGE}");
                        }
                        continue;
                    }
                }
            }
            Some(event) = events_rx.recv() => event,
        };

        match session.dispatch(event) {
            Ok(updates) => publish(&updates, &renderer, &mut ticker, &events_tx),
            Err(err) => publish(
                &[GameUpdate::Error(err.into())],
                &renderer,
                &mut ticker,
                &events_tx,
            ),
        }
    }

    ticker.stop();
    info!(score = session.score(), "session ended");
    if renderer.mode() == OutputMode::Text {
        println!("Final score: {}", session.score());
    }
    Ok(())
}

fn publish(
    updates: &[GameUpdate],
    renderer: &Renderer,
    ticker: &mut RoundTicker,
    events_tx: &mpsc::Sender<GameEvent>,
) {
    for update in updates {
        ticker.follow(update, events_tx);
        publish_line(renderer.render(update));
    }
}

fn publish_line(line: Option<String>) {
    if let Some(line) = line {
        println!("{line}");
    }
}
