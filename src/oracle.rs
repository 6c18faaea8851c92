use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clarification::{ClarificationExchange, ClarificationHandler};
use crate::config::OracleConfig;
use crate::derivation::{derive, InputNumbers};
use crate::error::Result;
use crate::generation::{reading_request, Generator};
use crate::hexagram::Hexagram;
use crate::reading::{assemble_context, validate_generation, Reading};
use crate::text::{TextPlan, TextResolver, TextStore};
use crate::upstream::{bounded, Boundary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultRequest {
    pub question: String,
    pub numbers: InputNumbers,
    /// Falls back to the configured default language.
    #[serde(default)]
    pub language: Option<String>,
}

/// The reading pipeline: derive, resolve texts, assemble, generate, validate.
///
/// Stages run strictly in order within a reading. Nothing is persisted here;
/// a returned [`Reading`] is complete and a failed one leaves no trace.
pub struct Oracle<S, G> {
    store: S,
    generator: G,
    config: OracleConfig,
}

impl<S, G> Oracle<S, G>
where
    S: TextStore,
    G: Generator,
{
    pub fn new(store: S, generator: G, config: OracleConfig) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub async fn consult(&self, request: ConsultRequest) -> Result<Reading> {
        let language = self.config.resolve_language(request.language.as_deref())?;

        let derivation = derive(request.numbers);
        let primary = derivation.hexagram();
        info!(
            first = request.numbers.first,
            second = request.numbers.second,
            third = request.numbers.third,
            upper = derivation.upper.name(),
            lower = derivation.lower.name(),
            moving_line = ?derivation.moving_line,
            hexagram = primary.number(),
            "derived hexagram"
        );

        self.read(request.question, Some(request.numbers), primary, language)
            .await
    }

    /// Run the pipeline on line magnitudes cast by the caller (6, 7, 8, 9).
    pub async fn consult_lines(
        &self,
        question: impl Into<String>,
        values: &[i64],
        language: Option<&str>,
    ) -> Result<Reading> {
        let language = self.config.resolve_language(language)?;
        let primary = Hexagram::from_lines(values)?;
        info!(hexagram = primary.number(), "cast hexagram");

        self.read(question.into(), None, primary, language).await
    }

    pub async fn clarify(
        &self,
        reading: Option<&mut Reading>,
        question: &str,
    ) -> Result<ClarificationExchange> {
        ClarificationHandler::new(&self.generator)
            .with_timeout(self.config.generation_timeout())
            .clarify(reading, question)
            .await
    }

    async fn read(
        &self,
        question: String,
        inputs: Option<InputNumbers>,
        primary: Hexagram,
        language: String,
    ) -> Result<Reading> {
        let plan = TextPlan::for_hexagram(&primary)?;
        let texts = TextResolver::new(&self.store)
            .with_timeout(self.config.text_store_timeout())
            .resolve_plan(&plan)
            .await?;
        debug!(
            resolved = texts.len(),
            planned = plan.required.len() + plan.optional.len(),
            "texts resolved"
        );

        let context = assemble_context(&question, &language, &primary, &texts)?;

        let request = reading_request(&context);
        let started = Instant::now();
        let completion = bounded(
            Boundary::Generation,
            self.config.generation_timeout(),
            self.generator.generate(&request),
        )
        .await?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, %language, "generation completed");

        let prediction = validate_generation(&context, &completion)?;

        Ok(Reading::new(question, inputs, language, primary, texts, prediction))
    }
}
