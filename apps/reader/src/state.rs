//! The single owner of a learner's article list and artifact cache.
//!
//! Every rendering entry point consults the cache before doing any work.
//! A new generation run replaces the article list and clears the cache in one
//! step, and only once the run has succeeded; a failed run leaves the previous
//! articles and their cached artifacts untouched.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{ArtifactKey, ResultCache};
use crate::errors::AppError;
use crate::generation::generator::{generate_articles, validate_item_count, RunProgress};
use crate::generation::prompt_builder::GenerationRequest;
use crate::layout::{layout_rows, Row, Transcriber};
use crate::llm_client::{GenerationConfig, TextGenerator};
use crate::models::{Article, ArtifactKind, LengthBucket, Level};
use crate::render::{render_document, render_markup};
use crate::speech::{SpeechSynthesizer, VoiceSettings};
use crate::vocabulary::parse_vocabulary;

/// Outcome of a successful generation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub level: Level,
    pub article_count: usize,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Session {
    run_id: Option<Uuid>,
    articles: Vec<Article>,
    cache: ResultCache,
    generation: GenerationConfig,
    voice: VoiceSettings,
}

impl Session {
    pub fn new(generation: GenerationConfig, voice: VoiceSettings) -> Self {
        Self {
            generation,
            voice,
            ..Self::default()
        }
    }

    /// Parses raw learner input, then runs `generate`. Input errors surface
    /// before the generator is touched.
    pub async fn generate_from_input<F>(
        &mut self,
        generator: &dyn TextGenerator,
        level: Level,
        words_input: &str,
        bucket: LengthBucket,
        count: usize,
        on_progress: F,
    ) -> Result<RunSummary, AppError>
    where
        F: FnMut(RunProgress),
    {
        let words = parse_vocabulary(words_input)?;
        let request = GenerationRequest::new(level, words, bucket)?;
        self.generate(generator, &request, count, on_progress).await
    }

    /// Runs a full generation batch and installs its articles.
    pub async fn generate<F>(
        &mut self,
        generator: &dyn TextGenerator,
        request: &GenerationRequest,
        count: usize,
        on_progress: F,
    ) -> Result<RunSummary, AppError>
    where
        F: FnMut(RunProgress),
    {
        validate_item_count(count)?;
        let run_id = Uuid::new_v4();
        info!(%run_id, level = %request.level(), count, "Starting generation run");

        let articles =
            generate_articles(generator, request, count, &self.generation, on_progress).await?;

        if !self.cache.is_empty() {
            debug!("Discarding {} cached artifacts from the previous run", self.cache.len());
        }
        self.cache.clear();
        self.articles = articles;
        self.run_id = Some(run_id);

        info!(%run_id, "Generation run finished with {} articles", self.articles.len());
        Ok(RunSummary {
            run_id,
            level: request.level(),
            article_count: self.articles.len(),
            finished_at: Utc::now(),
        })
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// 1-based lookup.
    pub fn article(&self, item_index: usize) -> Result<&Article, AppError> {
        item_index
            .checked_sub(1)
            .and_then(|i| self.articles.get(i))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "article {item_index} (session holds {})",
                    self.articles.len()
                ))
            })
    }

    pub fn rows(&self, item_index: usize, transcriber: &dyn Transcriber) -> Result<Vec<Row>, AppError> {
        let article = self.article(item_index)?;
        Ok(layout_rows(
            &article.text,
            &article.required_vocabulary,
            transcriber,
        ))
    }

    pub fn inline_markup(
        &self,
        item_index: usize,
        transcriber: &dyn Transcriber,
    ) -> Result<String, AppError> {
        Ok(render_markup(&self.rows(item_index, transcriber)?))
    }

    /// Annotated document for an item, built at most once per run.
    pub async fn document(
        &mut self,
        item_index: usize,
        transcriber: &dyn Transcriber,
    ) -> Result<Bytes, AppError> {
        let level = self.article(item_index)?.level;
        let key = ArtifactKey::new(level, item_index, ArtifactKind::Document);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let rows = self.rows(item_index, transcriber)?;
        let payload =
            tokio::task::spawn_blocking(move || render_document(&rows, level, item_index))
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("spawn_blocking failed in document render: {e}"))
                })??;

        Ok(self.cache.put(key, payload))
    }

    /// Read-aloud audio for an item, synthesized at most once per run.
    pub async fn audio(
        &mut self,
        item_index: usize,
        synthesizer: &dyn SpeechSynthesizer,
    ) -> Result<Bytes, AppError> {
        let article = self.article(item_index)?;
        let key = ArtifactKey::new(article.level, item_index, ArtifactKind::Audio);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let text = article.text.clone();
        info!("Synthesizing audio for item {}", item_index);
        let payload = synthesizer.synthesize(&text, &self.voice).await?;
        Ok(self.cache.put(key, payload))
    }

    fn cached(&self, key: &ArtifactKey) -> Option<Bytes> {
        let hit = self.cache.get(key);
        debug!(
            item = key.item_index,
            kind = ?key.kind,
            hit = hit.is_some(),
            "artifact cache lookup"
        );
        hit
    }

    pub fn cached_artifacts(&self) -> usize {
        self.cache.len()
    }
}
