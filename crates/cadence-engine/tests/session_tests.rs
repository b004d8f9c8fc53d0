use std::{sync::Arc, time::Duration};

use cadence_engine::{ProficiencyMap, ReviewItem, SessionPhase, SessionType, TickOutcome};
use uuid::Uuid;

use crate::common::{RecordingSink, TestEngine, TestEngineBuilder};

fn pool(test: &mut TestEngine, n: usize) -> Vec<ReviewItem> {
    test.seed_items(n);
    test.engine.items().cloned().collect()
}

#[test]
fn test_sprint_with_three_candidates_degrades() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 3);

    let session = test
        .engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .expect("session starts");
    assert_eq!(session.expressions.len(), 3);
    assert_eq!(session.time_remaining, 30);
    assert_eq!(test.engine.session_phase(), SessionPhase::Active);
}

#[test]
fn test_countdown_auto_completes_with_zero_score() {
    let sink = Arc::new(RecordingSink::default());
    let mut test = TestEngineBuilder::new().with_sink(sink.clone()).build();
    let candidates = pool(&mut test, 5);
    let writes_before = sink.count();

    test.engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .unwrap();

    let outcomes: Vec<TickOutcome> = (0..31).map(|_| test.engine.tick()).collect();

    let expired: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            TickOutcome::Expired(record) => Some(record),
            _ => None,
        })
        .collect();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].score, 0);
    assert_eq!(expired[0].total_count, 0);
    assert!(expired[0].expired);

    assert!(matches!(outcomes[29], TickOutcome::Expired(_)));
    assert_eq!(
        outcomes[30],
        TickOutcome::Ignored {
            phase: SessionPhase::Completed
        }
    );
    assert_eq!(test.engine.session_phase(), SessionPhase::Completed);
    assert_eq!(test.engine.history().len(), 1);
    assert_eq!(sink.count(), writes_before + 1);
}

#[test]
fn test_paused_ticks_leave_time_unchanged() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 5);
    test.engine
        .start_session(SessionType::Standard, &candidates, &ProficiencyMap::new())
        .unwrap();
    test.engine.tick();
    test.engine.tick();
    let before = test.engine.time_remaining();
    assert_eq!(before, Some(58));

    test.engine.pause_session().unwrap();
    for _ in 0..5 {
        test.engine.tick();
    }
    test.engine.resume_session().unwrap();

    assert_eq!(test.engine.time_remaining(), before);
    assert_eq!(test.engine.tick(), TickOutcome::Running { remaining: 57 });
}

#[test]
fn test_tick_while_idle_is_a_noop() {
    let mut test = TestEngineBuilder::new().build();

    assert_eq!(
        test.engine.tick(),
        TickOutcome::Ignored {
            phase: SessionPhase::Idle
        }
    );
    assert_eq!(test.engine.time_remaining(), None);
    assert!(test.engine.history().is_empty());
}

#[test]
fn test_only_one_live_session() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 6);
    let first_id = test
        .engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .unwrap()
        .id;

    let err = test
        .engine
        .start_session(SessionType::Extended, &candidates, &ProficiencyMap::new())
        .unwrap_err();
    assert!(err.is_invalid_transition());

    test.engine.pause_session().unwrap();
    assert!(
        test.engine
            .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
            .unwrap_err()
            .is_invalid_transition()
    );

    test.engine.resume_session().unwrap();
    let record = test.engine.end_session().unwrap();
    assert_eq!(record.id, first_id);

    // completed sessions can be followed by a new one
    test.engine
        .start_session(SessionType::Extended, &candidates, &ProficiencyMap::new())
        .unwrap();
    assert_eq!(test.engine.time_remaining(), Some(300));
}

#[test]
fn test_empty_pool_is_rejected() {
    let mut test = TestEngineBuilder::new().build();

    let err = test
        .engine
        .start_session(SessionType::Sprint, &[], &ProficiencyMap::new())
        .unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(test.engine.session_phase(), SessionPhase::Idle);
}

#[test]
fn test_end_without_session_is_invalid_transition() {
    let mut test = TestEngineBuilder::new().build();

    assert!(test.engine.end_session().unwrap_err().is_invalid_transition());
    assert!(test.engine.cancel_session().unwrap_err().is_invalid_transition());
    assert!(test.engine.pause_session().unwrap_err().is_invalid_transition());
    assert!(test.engine.next_expression().unwrap_err().is_invalid_transition());
}

#[test]
fn test_answer_for_foreign_item_is_invalid_reference() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 8);
    test.engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .unwrap();

    let err = test
        .engine
        .record_answer(Uuid::new_v4(), true, None)
        .unwrap_err();
    assert!(err.is_invalid_reference());
}

#[test]
fn test_full_session_flow() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 5);
    test.engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .unwrap();
    assert_eq!(test.engine.session_progress().unwrap().total, 5);

    let mut answered = 0;
    loop {
        let current = test.engine.current_expression().expect("live session").id;
        // every third expression is missed
        let correct = answered % 3 != 2;
        let feedback = test
            .engine
            .record_answer(current, correct, Some(Duration::from_millis(1200)))
            .unwrap();
        assert_eq!(feedback.is_correct, correct);
        assert_eq!(feedback.attempts, 1);
        answered += 1;

        test.engine.tick();
        if !test.engine.next_expression().unwrap() {
            break;
        }
    }

    let progress = test.engine.session_progress().unwrap();
    assert_eq!(progress.answered, 5);
    assert_eq!(progress.correct, 4);
    assert_eq!(progress.current_index, 4);
    assert_eq!(progress.time_remaining, 25);

    let record = test.engine.end_session().unwrap();
    assert_eq!(record.total_count, 5);
    assert_eq!(record.correct_count, 4);
    assert_eq!(record.score, 80);
    assert!(!record.expired);
    assert_eq!(test.engine.history().latest(), Some(&record));
    assert!(test.engine.current_expression().is_none());
}

#[test]
fn test_cancel_records_nothing() {
    let mut test = TestEngineBuilder::new().build();
    let candidates = pool(&mut test, 5);
    test.engine
        .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
        .unwrap();
    let id = test.engine.current_expression().unwrap().id;
    test.engine.record_answer(id, true, None).unwrap();

    test.engine.cancel_session().unwrap();

    assert_eq!(test.engine.session_phase(), SessionPhase::Idle);
    assert!(test.engine.history().is_empty());
    assert_eq!(
        test.engine.tick(),
        TickOutcome::Ignored {
            phase: SessionPhase::Idle
        }
    );
}

#[test]
fn test_repository_session_follows_content_ratio() {
    let mut test = TestEngineBuilder::new().build();
    let ids = test.seed_items(20);

    let mut proficiency = ProficiencyMap::new();
    for id in &ids[..5] {
        proficiency.insert(*id, 90);
    }
    for id in &ids[5..10] {
        proficiency.insert(*id, 50);
    }

    let session = test
        .engine
        .start_session_from_repository(SessionType::Standard, &proficiency)
        .unwrap();
    assert_eq!(session.expressions.len(), 10);

    let level = |item: &ReviewItem| proficiency.get(&item.id).copied();
    let success = session
        .expressions
        .iter()
        .filter(|e| level(e) == Some(90))
        .count();
    let weakness = session
        .expressions
        .iter()
        .filter(|e| level(e) == Some(50))
        .count();
    let expansion = session
        .expressions
        .iter()
        .filter(|e| level(e).is_none())
        .count();

    assert_eq!((success, weakness, expansion), (3, 5, 2));
}

#[test]
fn test_history_is_capped() {
    let mut test = TestEngineBuilder::new().with_history_capacity(3).build();
    let candidates = pool(&mut test, 5);

    for _ in 0..5 {
        test.engine
            .start_session(SessionType::Sprint, &candidates, &ProficiencyMap::new())
            .unwrap();
        test.engine.end_session().unwrap();
    }

    assert_eq!(test.engine.history().len(), 3);
}
