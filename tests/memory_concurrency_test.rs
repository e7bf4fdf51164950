// Concurrency tests for conversation memory

use chrono::{Duration as ChronoDuration, Utc};
use futures::future::join_all;
use soulcare::{
    analysis::{Analysis, Emotion, Intent, Sentiment},
    memory::{ConversationMemory, Role},
};
use std::sync::Arc;

fn joy() -> Analysis {
    Analysis {
        emotion: Emotion::Joy,
        confidence: 0.7,
        sentiment: Sentiment::Positive,
        intent: Intent::General,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_to_one_session_are_all_kept() {
    let memory = Arc::new(ConversationMemory::default());
    let n = 200;

    let tasks = (0..n).map(|i| {
        let memory = Arc::clone(&memory);
        tokio::spawn(async move {
            memory.add_message("shared", Role::User, format!("msg {}", i), Some(joy()));
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }

    assert_eq!(memory.get_history("shared", usize::MAX).len(), n);
    assert_eq!(memory.get_emotion_pattern("shared").len(), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_exchanges_stay_paired() {
    let memory = Arc::new(ConversationMemory::default());
    let n = 100;

    let tasks = (0..n).map(|i| {
        let memory = Arc::clone(&memory);
        tokio::spawn(async move {
            memory.record_exchange("pairs", format!("q{}", i), joy(), format!("a{}", i));
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }

    let history = memory.get_history("pairs", usize::MAX);
    assert_eq!(history.len(), 2 * n);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Bot);
        assert_eq!(pair[0].text[1..], pair[1].text[1..]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sessions_are_independent() {
    let memory = Arc::new(ConversationMemory::default());

    let tasks = (0..50).map(|i| {
        let memory = Arc::clone(&memory);
        tokio::spawn(async move {
            let session = format!("user-{}", i % 5);
            memory.add_message(&session, Role::User, "hello", None);
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }

    assert_eq!(memory.active_count(), 5);
    for i in 0..5 {
        assert_eq!(memory.get_history(&format!("user-{}", i), 100).len(), 10);
    }
}

#[tokio::test]
async fn test_cleanup_sweeps_idle_sessions() {
    let memory = ConversationMemory::new(100, 30);
    memory.add_message("idle", Role::User, "hello", None);

    assert_eq!(memory.cleanup_expired(Utc::now()), 0);
    assert_eq!(
        memory.cleanup_expired(Utc::now() + ChronoDuration::minutes(31)),
        1
    );
    assert_eq!(memory.active_count(), 0);
    assert!(memory.get_history("idle", 10).is_empty());
}
