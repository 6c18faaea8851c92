mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::{bi_store, coord, CountingStore};
use oracle_core::derivation::{derive, InputNumbers};
use oracle_core::text::{MemoryTextStore, TextPlan, TextResolver, TextStore};
use oracle_core::types::Coordinate;
use oracle_core::upstream::{Boundary, UpstreamError};
use oracle_core::{ErrorKind, OracleError};

struct BrokenStore;

#[async_trait]
impl TextStore for BrokenStore {
    async fn get_text(&self, _coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        Err(UpstreamError::text_store("connection reset"))
    }
}

struct SlowStore;

#[async_trait]
impl TextStore for SlowStore {
    async fn get_text(&self, _coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(Some("late".into()))
    }
}

#[tokio::test]
async fn missing_text_is_absent_not_an_error() {
    let store = bi_store();
    let resolver = TextResolver::new(&store);

    let result = resolver.resolve(&coord(22, 1)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn out_of_range_fails_before_store_access() {
    let store = CountingStore::new(bi_store());
    let resolver = TextResolver::new(&store);

    let err = resolver.resolve_at(0, 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoordinate);

    let err = resolver.resolve_at(22, 7).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoordinate);

    assert_eq!(store.lookups(), 0);

    assert!(resolver.resolve_at(22, 0).await.unwrap().is_some());
    assert_eq!(store.lookups(), 1);
}

#[tokio::test]
async fn plain_and_json_payloads_parse() {
    let store = bi_store();
    let resolver = TextResolver::new(&store);

    let bi = resolver.resolve(&coord(22, 0)).await.unwrap().unwrap();
    assert_eq!(bi.title.as_deref(), Some("Bi / Grace"));
    assert!(bi.body.unwrap().starts_with("Grace has success."));

    let family = resolver.resolve(&coord(37, 0)).await.unwrap().unwrap();
    assert_eq!(family.title.as_deref(), Some("Jia Ren / The Family"));
    assert_eq!(family.image.as_deref(), Some("37/0/hexagram.jpg"));
}

#[tokio::test]
async fn corrupt_payload_is_an_upstream_failure() {
    let store = MemoryTextStore::new().with(coord(5, 0), "   \n   ");
    let resolver = TextResolver::new(&store);

    let err = resolver.resolve(&coord(5, 0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
}

#[tokio::test]
async fn required_text_reports_its_coordinate() {
    let store = MemoryTextStore::new();
    let resolver = TextResolver::new(&store);

    match resolver.resolve_required(&coord(9, 0)).await {
        Err(OracleError::TextNotFound(c)) => assert_eq!(c, coord(9, 0)),
        other => panic!("expected TextNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn store_faults_are_upstream_failures() {
    let resolver = TextResolver::new(&BrokenStore);

    match resolver.resolve(&coord(1, 0)).await {
        Err(OracleError::UpstreamFailure(e)) => {
            assert_eq!(e.boundary, Boundary::TextStore);
            assert!(e.message.contains("connection reset"));
        }
        other => panic!("expected UpstreamFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_store_times_out() {
    let resolver = TextResolver::new(&SlowStore).with_timeout(Some(Duration::from_millis(20)));

    let err = resolver.resolve(&coord(1, 0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn plan_lists_hexagram_texts_as_required_and_lines_as_optional() {
    let primary = derive(InputNumbers::new(7, 3, 5)).hexagram();
    let plan = TextPlan::for_hexagram(&primary).unwrap();

    assert_eq!(plan.required, vec![coord(22, 0), coord(37, 0)]);
    assert_eq!(plan.optional, vec![coord(22, 5)]);

    let stable = derive(InputNumbers::new(7, 3, 0)).hexagram();
    let plan = TextPlan::for_hexagram(&stable).unwrap();
    assert_eq!(plan.required, vec![coord(22, 0)]);
    assert!(plan.optional.is_empty());
}

#[tokio::test]
async fn plan_resolution_skips_missing_line_texts() {
    let store = MemoryTextStore::new()
        .with(coord(22, 0), "Bi / Grace\nGrace has success.")
        .with(coord(37, 0), "Jia Ren\nThe family.");
    let resolver = TextResolver::new(&store);

    let plan = TextPlan::for_hexagram(&derive(InputNumbers::new(7, 3, 5)).hexagram()).unwrap();
    let texts = resolver.resolve_plan(&plan).await.unwrap();

    assert_eq!(texts.len(), 2);
    assert!(texts.contains_key(&coord(22, 0)));
    assert!(!texts.contains_key(&coord(22, 5)));
}

#[tokio::test]
async fn plan_resolution_needs_the_resulting_text() {
    let store = MemoryTextStore::new()
        .with(coord(22, 0), "Bi / Grace\nGrace has success.")
        .with(coord(22, 5), "Six in the fifth place\n...");
    let resolver = TextResolver::new(&store);

    let plan = TextPlan::for_hexagram(&derive(InputNumbers::new(7, 3, 5)).hexagram()).unwrap();
    let err = resolver.resolve_plan(&plan).await.unwrap_err();

    assert!(matches!(err, OracleError::TextNotFound(c) if c == coord(37, 0)));
}
