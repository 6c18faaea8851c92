use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Text payload has neither title nor body")]
    Empty,
    #[error("Text payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Structured form of a stored text.
///
/// Stores hold either a JSON object with these fields or plain scraped text
/// laid out as `"title\nbody..."`. Both are accepted by [`TextPayload::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Reference to an illustration (path or URL), passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl TextPayload {
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let trimmed = raw.trim();

        let payload = if trimmed.starts_with('{') {
            serde_json::from_str::<TextPayload>(trimmed)?
        } else {
            let (title, body) = match trimmed.split_once('\n') {
                Some((title, body)) => (title, body),
                None => (trimmed, ""),
            };
            TextPayload {
                title: Some(title.to_string()),
                body: Some(body.to_string()),
                image: None,
            }
        };

        payload.normalized()
    }

    /// Title and body joined the way they are handed to the model.
    pub fn render(&self) -> String {
        match (&self.title, &self.body) {
            (Some(title), Some(body)) => format!("{title}\n{body}"),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => String::new(),
        }
    }

    fn normalized(self) -> Result<Self, PayloadError> {
        let clean = |field: Option<String>| {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let payload = TextPayload {
            title: clean(self.title),
            body: clean(self.body),
            image: clean(self.image),
        };

        if payload.title.is_none() && payload.body.is_none() {
            return Err(PayloadError::Empty);
        }
        Ok(payload)
    }
}
