use std::{sync::Arc, time::Duration};

use anyhow::Context;
use cadence_engine::{
    Engine, EngineConfig, JsonFileSink, NewReviewItem, ProficiencyMap, ReviewRating, SessionPhase,
    SessionType, SystemClock, TICK_PERIOD, drive_countdown, tracing::init_tracing,
};
use tokio::sync::Mutex;

const USAGE: &str = "usage: cadence [30s|60s|300s] [again|hard|good|easy]";

const DEMO_DECK: &[(&str, &str)] = &[
    ("hola", "hello"),
    ("gracias", "thank you"),
    ("perro", "dog"),
    ("gato", "cat"),
    ("casa", "house"),
    ("agua", "water"),
    ("libro", "book"),
    ("ciudad", "city"),
];

/// Command line: optional session length and the rating given to every due word.
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> anyhow::Result<(SessionType, ReviewRating)> {
    let session_type = match args.next() {
        Some(arg) => arg
            .parse::<SessionType>()
            .map_err(anyhow::Error::msg)
            .context(USAGE)?,
        None => SessionType::Sprint,
    };
    let rating = match args.next() {
        Some(arg) => arg.parse::<ReviewRating>().context(USAGE)?,
        None => ReviewRating::Good,
    };
    Ok((session_type, rating))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (session_type, rating) = parse_args(std::env::args().skip(1))?;

    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = EngineConfig::from_env().context("invalid CADENCE_* configuration")?;
    init_tracing(&config);

    let sink = JsonFileSink::new(&config.data_path);
    let stored = sink
        .load()
        .with_context(|| format!("failed to read {}", config.data_path.display()))?;
    let mut engine = Engine::restore_or_empty(
        &config,
        stored.as_deref(),
        Arc::new(SystemClock),
        Arc::new(sink),
    );

    if engine.items().next().is_none() {
        for (term, translation) in DEMO_DECK {
            engine.add_item(NewReviewItem::new(*term, *translation));
        }
        tracing::info!(items = DEMO_DECK.len(), "Seeded demo deck");
    }

    let due: Vec<_> = engine.words_for_review().iter().map(|i| i.id).collect();
    for id in due {
        engine.review_word(id, rating)?;
    }
    println!(
        "{} due, {} mastered, accuracy {:.0}%",
        engine.due_word_count(),
        engine.mastered_words().len(),
        engine.stats().accuracy() * 100.0
    );

    engine.start_session_from_repository(session_type, &ProficiencyMap::new())?;
    let engine = Arc::new(Mutex::new(engine));
    let countdown = tokio::spawn(drive_countdown(Arc::clone(&engine), TICK_PERIOD));

    // Simulated learner: answers every 700 ms, misses every fourth expression
    let mut answered = 0_u32;
    loop {
        tokio::time::sleep(Duration::from_millis(700)).await;
        let mut engine = engine.lock().await;
        if engine.session_phase() != SessionPhase::Active {
            break;
        }
        let Some(current) = engine.current_expression().map(|e| e.id) else {
            break;
        };

        let correct = answered % 4 != 3;
        let feedback = engine.record_answer(current, correct, Some(Duration::from_millis(700)))?;
        answered += 1;
        if feedback.streak_milestone {
            println!("streak of {}", feedback.correct_streak);
        }

        if !engine.next_expression()? {
            let record = engine.end_session()?;
            println!(
                "session {}: {}/{} correct, score {}",
                record.session_type, record.correct_count, record.total_count, record.score
            );
            break;
        }
    }

    if let Some(record) = countdown.await.context("countdown task panicked")? {
        println!(
            "time is up: {}/{} correct, score {}",
            record.correct_count, record.total_count, record.score
        );
    }

    let engine = engine.lock().await;
    println!("{} sessions in history", engine.history().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_defaults() {
        let (session_type, rating) = parse_args(args(&[])).unwrap();
        assert_eq!(session_type, SessionType::Sprint);
        assert_eq!(rating, ReviewRating::Good);
    }

    #[test]
    fn test_parse_args_reads_type_and_rating() {
        let (session_type, rating) = parse_args(args(&["300s", "Easy"])).unwrap();
        assert_eq!(session_type, SessionType::Extended);
        assert_eq!(rating, ReviewRating::Easy);
    }

    #[test]
    fn test_parse_args_rejects_unknown_values() {
        assert!(parse_args(args(&["45s"])).is_err());
        assert!(parse_args(args(&["60s", "perfect"])).is_err());
    }
}
