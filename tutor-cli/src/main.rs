//! `tutor` binary entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tutor_cli::app::{App, Command, HELP, LearnError};
use tutor_cli::config::{Cli, Settings, key_status};
use tutor_core::config::Credentials;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env is normal.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.config.general.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let credentials = Credentials::from_env();
    info!(keys = %key_status(&credentials), "Starting tutor");

    let topic = settings.topic.clone();
    let mut app = App::new(settings, credentials).context("Failed to initialise clients")?;

    match topic {
        Some(topic) if !learn(&mut app, &topic).await => Ok(ExitCode::FAILURE),
        Some(_) => Ok(ExitCode::SUCCESS),
        None => {
            interactive(&mut app).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Generate and print one pack. Returns whether a pack was produced.
async fn learn(app: &mut App, topic: &str) -> bool {
    match app.learn(topic).await {
        Ok(lesson) => {
            if let Some(warning) = &lesson.video_warning {
                eprintln!("warning: {warning}");
            }
            println!("{}", app.render(&lesson));
            true
        }
        Err(LearnError::EmptyTopic) => {
            eprintln!("{}", LearnError::EmptyTopic);
            false
        }
        Err(err @ LearnError::Generation { .. }) => {
            eprintln!("error: {err}");
            false
        }
    }
}

async fn interactive(app: &mut App) -> Result<()> {
    println!(
        "Tutor: mode {}, provider {}. Type :help for commands.",
        app.settings().mode,
        app.settings().provider
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("topic> ");
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Learn(topic)) => {
                learn(app, &topic).await;
            }
            Ok(command) => {
                if let Some(text) = app.apply(&command) {
                    println!("{text}");
                }
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("{HELP}");
            }
        }
    }

    debug!(topics = app.session().history().len(), "Leaving interactive session");
    Ok(())
}
