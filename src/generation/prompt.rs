use super::{ChatMessage, GenerationRequest};
use crate::clarification::ClarificationState;
use crate::reading::{LineText, Reading, ReadingContext};

/// The JSON shape a reading completion must follow.
pub const GENERATION_SCHEMA: &str = r#"{
  "summary": "one or two sentences answering the question",
  "interpretation": "the primary hexagram read against the question",
  "line_notes": [
    { "position": 1, "note": "what this changing line means here" }
  ],
  "resulting_interpretation": "only when a resulting hexagram is given",
  "advice": "concrete advice"
}"#;

const READING_PREAMBLE: &str = "You are an I Ching interpreter. Answer the user's question \
using only the canonical texts below. Do not invent hexagrams or lines.";

const CLARIFICATION_PREAMBLE: &str = "You are an I Ching interpreter continuing an earlier \
reading. The hexagrams are already cast; do not cast again or change them. Answer the \
follow-up question in plain prose, grounded in the reading below.";

/// Request for the initial reading: system prompt with the texts and the
/// schema, then the question as the user turn.
pub fn reading_request(context: &ReadingContext) -> GenerationRequest {
    let mut system = format!(
        "{READING_PREAMBLE}\nRespond in {}.\n\n{}\n",
        context.language,
        render_context(context)
    );
    system.push_str(
        "Reply with a single JSON object of this shape and nothing else. Give one line note \
         per changing line listed above.\n",
    );
    if context.resulting.is_none() {
        system.push_str("There is no resulting hexagram; omit resulting_interpretation.\n");
    }
    system.push_str(GENERATION_SCHEMA);

    GenerationRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(context.question.clone()),
        ],
    }
}

/// Request for a follow-up question: the original structured prediction
/// (never re-derived) in the system prompt, the original exchange as prior
/// turns, then the new question.
pub fn clarification_request(reading: &Reading, question: &str) -> GenerationRequest {
    let prediction = reading.prediction();

    // Prediction holds only strings, numbers and enums; this cannot fail.
    let rendered = serde_json::to_string_pretty(prediction).unwrap_or_default();
    let system = format!(
        "{CLARIFICATION_PREAMBLE}\nRespond in {}.\n\nReading:\n{rendered}",
        reading.language()
    );

    let mut messages = vec![
        ChatMessage::system(system),
        ChatMessage::user(reading.question().to_string()),
        ChatMessage::assistant(format!("{}\n\n{}", prediction.summary, prediction.advice)),
    ];

    if let ClarificationState::Clarified(previous) = reading.clarification() {
        messages.push(ChatMessage::user(previous.question.clone()));
        messages.push(ChatMessage::assistant(previous.answer.clone()));
    }
    messages.push(ChatMessage::user(question.to_string()));

    GenerationRequest { messages }
}

// Sections separated by blank lines: primary, each changing line (or a note
// that none change), then the resulting hexagram.
fn render_context(context: &ReadingContext) -> String {
    let primary = &context.primary;
    let mut sections = vec![format!(
        "Primary hexagram {} {} ({}):\n{}",
        primary.hexagram.number, primary.hexagram.name, primary.hexagram.title, primary.text
    )];

    if context.changing_lines.is_empty() {
        sections.push("No lines are changing.".to_string());
    }
    for line in &context.changing_lines {
        let text = match &line.text {
            LineText::Available(text) => text.as_str(),
            LineText::Unavailable => "(text unavailable)",
        };
        sections.push(format!(
            "Changing line {} ({}):\n{text}",
            line.position,
            line.value.magnitude()
        ));
    }

    if let Some(resulting) = &context.resulting {
        sections.push(format!(
            "Resulting hexagram {} {} ({}):\n{}",
            resulting.hexagram.number,
            resulting.hexagram.name,
            resulting.hexagram.title,
            resulting.text
        ));
    }

    let mut rendered = sections.join("\n\n");
    rendered.push('\n');
    rendered
}
