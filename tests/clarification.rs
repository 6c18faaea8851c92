mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{bi_store, completion_for_bi, ScriptedGenerator, SlowGenerator};
use oracle_core::clarification::{ClarificationHandler, ClarificationState};
use oracle_core::config::OracleConfig;
use oracle_core::derivation::InputNumbers;
use oracle_core::generation::Role;
use oracle_core::reading::{MemoryReadingStore, Reading, ReadingStore};
use oracle_core::text::MemoryTextStore;
use oracle_core::{ConsultRequest, ErrorKind, Oracle, OracleError};

type TestOracle = Oracle<MemoryTextStore, Arc<ScriptedGenerator>>;

fn oracle(generator: ScriptedGenerator) -> (TestOracle, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    let oracle = Oracle::new(bi_store(), Arc::clone(&generator), OracleConfig::v0());
    (oracle, generator)
}

fn request() -> ConsultRequest {
    ConsultRequest {
        question: "Should I take the job?".into(),
        numbers: InputNumbers::new(7, 3, 5),
        language: None,
    }
}

async fn bi_reading(oracle: &TestOracle) -> Reading {
    oracle.consult(request()).await.unwrap()
}

#[tokio::test]
async fn clarify_without_reading_never_calls_generator() {
    let (oracle, generator) = oracle(ScriptedGenerator::new().reply("unused"));

    let err = oracle.clarify(None, "What about the salary?").await.unwrap_err();
    assert!(matches!(err, OracleError::NoPriorReading));
    assert_eq!(err.kind(), ErrorKind::NoPriorReading);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn clarification_is_stored_on_the_reading() {
    let (oracle, generator) = oracle(
        ScriptedGenerator::new()
            .reply(completion_for_bi())
            .reply("  Negotiate modestly.  "),
    );
    let mut reading = bi_reading(&oracle).await;
    assert!(!reading.clarification().is_clarified());

    let exchange = oracle
        .clarify(Some(&mut reading), "What about the salary?")
        .await
        .unwrap();

    assert_eq!(exchange.answer, "Negotiate modestly.");
    assert_eq!(&exchange.reading_id, reading.id());
    assert_eq!(reading.clarification(), &ClarificationState::Clarified(exchange));

    // The reading itself is not derived or generated again
    assert_eq!(generator.calls(), 2);
    assert_eq!(reading.primary().number(), 22);
}

#[tokio::test]
async fn prompt_carries_the_original_prediction() {
    let (oracle, generator) = oracle(
        ScriptedGenerator::new()
            .reply(completion_for_bi())
            .reply("Negotiate modestly."),
    );
    let mut reading = bi_reading(&oracle).await;
    oracle
        .clarify(Some(&mut reading), "What about the salary?")
        .await
        .unwrap();

    let request = &generator.requests()[1];
    let system = request.system_prompt().unwrap();
    assert!(system.contains("Form matters less than substance right now."));
    assert!(system.contains("\"number\": 22"));
    assert!(system.contains("\"number\": 37"));

    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    assert_eq!(request.messages[1].content, "Should I take the job?");
    assert_eq!(request.question(), Some("What about the salary?"));
}

#[tokio::test]
async fn second_clarification_replaces_the_first() {
    let (oracle, generator) = oracle(
        ScriptedGenerator::new()
            .reply(completion_for_bi())
            .reply("First answer.")
            .reply("Second answer."),
    );
    let mut reading = bi_reading(&oracle).await;

    oracle.clarify(Some(&mut reading), "First?").await.unwrap();
    oracle.clarify(Some(&mut reading), "Second?").await.unwrap();

    let stored = reading.clarification().exchange().unwrap();
    assert_eq!(stored.question, "Second?");
    assert_eq!(stored.answer, "Second answer.");

    // The earlier exchange is still shown to the model as prior turns
    let request = &generator.requests()[2];
    let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
    assert!(contents.contains(&"First?"));
    assert!(contents.contains(&"First answer."));
    assert_eq!(request.question(), Some("Second?"));
}

#[tokio::test]
async fn failed_clarification_leaves_reading_untouched() {
    let (oracle, _generator) = oracle(
        ScriptedGenerator::new()
            .reply(completion_for_bi())
            .fail("model overloaded")
            .reply("   "),
    );
    let mut reading = bi_reading(&oracle).await;
    let before = reading.clone();

    let err = oracle.clarify(Some(&mut reading), "Why?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(reading, before);

    let err = oracle.clarify(Some(&mut reading), "Why?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedGeneration);
    assert_eq!(reading, before);
}

#[tokio::test]
async fn slow_answer_times_out() {
    let (oracle, _generator) = oracle(ScriptedGenerator::new().reply(completion_for_bi()));
    let mut reading = bi_reading(&oracle).await;

    let slow = SlowGenerator(Duration::from_millis(500));
    let err = ClarificationHandler::new(&slow)
        .with_timeout(Some(Duration::from_millis(20)))
        .clarify(Some(&mut reading), "Why?")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(!reading.clarification().is_clarified());
}

#[tokio::test]
async fn reading_store_keeps_clarified_readings() {
    let (oracle, _generator) = oracle(
        ScriptedGenerator::new()
            .reply(completion_for_bi())
            .reply(completion_for_bi())
            .reply("Yes."),
    );
    let store = MemoryReadingStore::new();

    let first = bi_reading(&oracle).await;
    store.save_reading(&first).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut second = bi_reading(&oracle).await;
    assert_ne!(first.id(), second.id());
    oracle.clarify(Some(&mut second), "Really?").await.unwrap();
    store.save_reading(&second).await.unwrap();

    let loaded = store.load_reading(second.id()).await.unwrap().unwrap();
    assert_eq!(loaded, second);
    assert!(loaded.clarification().is_clarified());

    let history = store.list_readings().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(&history[0].id, first.id());
    assert!(!history[0].clarified);
    assert!(history[1].clarified);
    assert_eq!(history[1].resulting.as_ref().map(|h| h.number), Some(37));
}
