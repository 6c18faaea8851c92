mod common;

use std::collections::BTreeMap;

use common::{completion_for_bi, coord};
use oracle_core::derivation::{derive, InputNumbers};
use oracle_core::hexagram::Hexagram;
use oracle_core::reading::{assemble_context, validate_generation};
use oracle_core::text::TextPayload;
use serde_json::{json, Value};

fn payload(raw: &str) -> TextPayload {
    TextPayload::parse(raw).unwrap()
}

fn assert_key_order(json: &str, keys: &[&str]) {
    let positions: Vec<usize> = keys
        .iter()
        .map(|k| {
            json.find(&format!("\"{k}\":"))
                .unwrap_or_else(|| panic!("missing key {k}"))
        })
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "keys out of order in {json}"
    );
}

#[test]
fn golden_static_context_bytes() {
    let texts = BTreeMap::from([(coord(1, 0), payload("Qian\nSublime success."))]);
    let creative = Hexagram::from_lines(&[7, 7, 7, 7, 7, 7]).unwrap();
    let context = assemble_context("Will it work?", "English", &creative, &texts).unwrap();

    let expected = r#"{"question":"Will it work?","language":"English","primary":{"hexagram":{"number":1,"name":"Qian","title":"The Creative"},"text":"Qian\nSublime success."},"changing_lines":[]}"#;
    assert_eq!(serde_json::to_string(&context).unwrap(), expected);
}

#[test]
fn golden_prediction_for_seven_three_five() {
    let texts = BTreeMap::from([
        (coord(22, 0), payload("Bi / Grace\nGrace has success.")),
        (coord(22, 5), payload("Six in the fifth place\nGrace in hills and gardens.")),
        (coord(37, 0), payload("Jia Ren / The Family\nThe perseverance of the woman furthers.")),
    ]);
    let primary = derive(InputNumbers::new(7, 3, 5)).hexagram();
    let context = assemble_context("Should I take the job?", "English", &primary, &texts).unwrap();
    let prediction = validate_generation(&context, &completion_for_bi()).unwrap();

    let json_str = serde_json::to_string(&prediction).unwrap();
    assert_key_order(
        &json_str,
        &["hexagram", "summary", "interpretation", "changing_lines", "resulting", "advice"],
    );

    let expected = json!({
        "hexagram": { "number": 22, "name": "Bi", "title": "Grace" },
        "summary": "Form matters less than substance right now.",
        "interpretation": "Grace adorns but does not decide; keep the question modest.",
        "changing_lines": [
            {
                "position": 5,
                "text": {
                    "status": "available",
                    "text": "Six in the fifth place\nGrace in hills and gardens."
                },
                "note": "A small, sincere gift outweighs display."
            }
        ],
        "resulting": {
            "hexagram": { "number": 37, "name": "Jia Ren", "title": "The Family" },
            "text": "Jia Ren / The Family\nThe perseverance of the woman furthers.",
            "interpretation": "The situation settles into the order of a household."
        },
        "advice": "Simplify, and tend to the people closest to you."
    });
    let actual: Value = serde_json::from_str(&json_str).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn golden_changing_line_context_shape() {
    let texts = BTreeMap::from([
        (coord(22, 0), payload("Bi\nGrace.")),
        (coord(37, 0), payload("Jia Ren\nThe family.")),
    ]);
    let primary = derive(InputNumbers::new(7, 3, 5)).hexagram();
    let context = assemble_context("q", "Chinese", &primary, &texts).unwrap();

    let line = serde_json::to_string(&context.changing_lines[0]).unwrap();
    assert_eq!(line, r#"{"position":5,"value":6,"text":{"status":"unavailable"}}"#);

    let json_str = serde_json::to_string(&context).unwrap();
    assert_key_order(
        &json_str,
        &["question", "language", "primary", "changing_lines", "resulting"],
    );
}
