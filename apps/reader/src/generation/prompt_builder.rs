//! Turns a level, a length bucket and the learner's word list
//! into the structured instruction payload sent to the text generator.
//!
//! Pure: no I/O, no randomness. Empty vocabulary is rejected at construction
//! so no generator call can ever be made without it.

use serde::Serialize;

use crate::errors::AppError;
use crate::generation::levels::level_spec;
use crate::generation::prompts::{
    ARTICLE_PROMPT_TEMPLATE, LENGTH_FACET_TEMPLATE, LEVEL_FACET_TEMPLATE,
    VOCABULARY_FACET_TEMPLATE,
};
use crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION;
use crate::models::{LengthBucket, Level};

/// Per-item generation input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    level: Level,
    required_vocabulary: Vec<String>,
    bucket: LengthBucket,
}

impl GenerationRequest {
    /// Fails with `AppError::Input` when no usable vocabulary term is given.
    pub fn new(
        level: Level,
        required_vocabulary: Vec<String>,
        bucket: LengthBucket,
    ) -> Result<Self, AppError> {
        let mut terms: Vec<String> = Vec::with_capacity(required_vocabulary.len());
        for term in required_vocabulary {
            let term = term.trim();
            if !term.is_empty() && !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }
        if terms.is_empty() {
            return Err(AppError::Input(
                "required vocabulary is empty; at least one word must be supplied".to_string(),
            ));
        }
        Ok(Self {
            level,
            required_vocabulary: terms,
            bucket,
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn required_vocabulary(&self) -> &[String] {
        &self.required_vocabulary
    }

    pub fn bucket(&self) -> LengthBucket {
        self.bucket
    }
}

/// The four fixed facets of a generation prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    pub level_constraints: String,
    pub vocabulary_directive: String,
    pub length_directive: String,
    pub format_directive: String,
    story_archetype: &'static str,
    level_number: u8,
}

impl PromptPayload {
    /// Renders the facets into the final prompt text.
    pub fn render(&self) -> String {
        ARTICLE_PROMPT_TEMPLATE
            .replace("{level_facet}", &self.level_constraints)
            .replace("{level_number}", &self.level_number.to_string())
            .replace("{story_archetype}", self.story_archetype)
            .replace("{vocabulary_facet}", &self.vocabulary_directive)
            .replace("{length_facet}", &self.length_directive)
            .replace("{format_facet}", &self.format_directive)
    }
}

/// Builds the prompt payload for one item.
pub fn build_prompt(request: &GenerationRequest) -> PromptPayload {
    let spec = level_spec(request.level);
    let level_number = request.level.number();

    let level_constraints = LEVEL_FACET_TEMPLATE
        .replace("{level_number}", &level_number.to_string())
        .replace("{vocabulary_ceiling}", spec.vocabulary_ceiling)
        .replace("{grammar}", &spec.grammar_line())
        .replace("{topics}", spec.topics);

    let vocabulary_directive =
        VOCABULARY_FACET_TEMPLATE.replace("{words}", &request.required_vocabulary.join(" "));

    let length_directive =
        LENGTH_FACET_TEMPLATE.replace("{target_chars}", &request.bucket.target_chars().to_string());

    PromptPayload {
        level_constraints,
        vocabulary_directive,
        length_directive,
        format_directive: PLAIN_TEXT_INSTRUCTION.to_string(),
        story_archetype: spec.story_archetype,
        level_number,
    }
}
