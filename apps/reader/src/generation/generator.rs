//! Runs the per-item pipeline for a whole batch.
//!
//! Flow per item: build_prompt → TextGenerator::generate → normalize.
//! Items run strictly one after another; the first failure aborts the batch
//! and no partial article is returned for the failing item.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::normalizer::normalize;
use crate::generation::prompt_builder::{build_prompt, GenerationRequest};
use crate::generation::prompts::GENERATION_SYSTEM;
use crate::llm_client::{GenerationConfig, TextGenerator};
use crate::models::Article;

pub const MIN_ITEMS: usize = 1;
pub const MAX_ITEMS: usize = 10;

/// Reported after each finished item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
}

impl RunProgress {
    pub fn fraction(&self) -> f32 {
        self.completed as f32 / self.total.max(1) as f32
    }
}

pub fn validate_item_count(count: usize) -> Result<(), AppError> {
    if !(MIN_ITEMS..=MAX_ITEMS).contains(&count) {
        return Err(AppError::Input(format!(
            "item count must be between {MIN_ITEMS} and {MAX_ITEMS}, got {count}"
        )));
    }
    Ok(())
}

/// Generates and normalizes a single article.
pub async fn generate_article(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    config: &GenerationConfig,
) -> Result<Article, AppError> {
    let prompt = build_prompt(request).render();
    let raw = generator.generate(GENERATION_SYSTEM, &prompt, config).await?;
    normalize(&raw, request)
}

/// Generates `count` articles sequentially, calling `on_progress` after each one.
pub async fn generate_articles<F>(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    count: usize,
    config: &GenerationConfig,
    mut on_progress: F,
) -> Result<Vec<Article>, AppError>
where
    F: FnMut(RunProgress),
{
    validate_item_count(count)?;

    let mut articles = Vec::with_capacity(count);
    for item in 1..=count {
        info!("Generating item {}/{} at {}", item, count, request.level());
        let article = generate_article(generator, request, config)
            .await
            .inspect_err(|e| warn!("Item {}/{} failed: {}", item, count, e))?;

        let missing: Vec<&str> = request
            .required_vocabulary()
            .iter()
            .filter(|w| !article.text.contains(w.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!("Item {} is missing required vocabulary: {:?}", item, missing);
        }

        articles.push(article);
        on_progress(RunProgress {
            completed: item,
            total: count,
        });
    }
    Ok(articles)
}
