use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearing_engine::{
    config::Config,
    metrics::render_metrics,
    services::{
        audio::{log_asset_validation, LoggingBackend, SequencedAudioService},
        history_service::HistoryService,
        session_store::{JsonFileSessionStore, SessionStore},
        triplet_generator::RandomTripletGenerator,
        upload_service::HttpResultUploader,
    },
    HearingTest, TestState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearing_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hearing test");

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded for environment: {:?}",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );

    let backend = LoggingBackend::new(&config.asset_dir);
    log_asset_validation(&backend);
    let audio = Arc::new(SequencedAudioService::new(backend, config.audio_timing()));

    let uploader = Arc::new(HttpResultUploader::new(
        config.upload_url.clone(),
        config.upload_timeout(),
        config.upload_retry(),
    ));

    // History is optional; the test still runs without it.
    let store: Option<Arc<dyn SessionStore>> =
        match JsonFileSessionStore::open(&config.history_path).await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::warn!("Session history disabled: {}", e);
                None
            }
        };

    let test = HearingTest::new(
        Arc::new(RandomTripletGenerator::new()),
        audio,
        uploader,
        store.clone(),
        config.test_settings(),
    );

    let mut events = test.subscribe();
    tokio::spawn(async move {
        while let Ok(state) = events.recv().await {
            if let TestState::Countdown { seconds_remaining } = state {
                println!("  {}...", seconds_remaining);
            }
        }
    });

    println!("Type the three digits you hear and press Enter. '<' deletes a digit, 'q' quits.");

    let mut state = test.start().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while state == TestState::WaitingForInput {
        println!(
            "Round {}/{} (difficulty {}):",
            test.current_round(),
            test.total_rounds(),
            test.current_difficulty()
        );

        let Some(line) = lines.next_line().await? else {
            test.exit();
            break;
        };

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            test.exit();
            break;
        }

        for c in line.chars() {
            if c == '<' {
                test.delete_last_digit();
            } else {
                test.add_digit(c);
            }
        }

        if test.is_submit_enabled() {
            state = test.submit_answer().await;
        } else {
            println!("Need three digits from 1 to 9, have {:?}", test.input());
        }
    }

    match test.state() {
        TestState::Completed { score } => {
            let summary = test.summary();
            println!("Test complete. Score: {}", score);
            println!(
                "Correct answers: {}/{}",
                summary.correct_answers, summary.total_rounds
            );
            println!("Average difficulty: {:.1}", summary.average_difficulty);
        }
        TestState::Error { message } => println!("{}", message),
        other => tracing::info!("Test ended in state {:?}", other),
    }

    if let Some(store) = store {
        let summaries = HistoryService::new(store).load_summaries().await?;
        println!("History ({} sessions):", summaries.len());
        for s in summaries.iter().take(5) {
            println!(
                "  {}  score {:>3}  accuracy {:>3}%  {}",
                s.date.format("%Y-%m-%d %H:%M"),
                s.score,
                s.accuracy,
                s.performance_level.label()
            );
        }
    }

    tracing::debug!("Metrics:\n{}", render_metrics()?);
    Ok(())
}
