mod cache;
mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod render;
mod speech;
mod state;
mod vocabulary;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::levels::level_spec;
use crate::layout::PinyinTranscriber;
use crate::llm_client::{GenerationConfig, LlmClient, MODEL};
use crate::models::{ArtifactKind, LengthBucket, Level};
use crate::render::{artifact_file_name, export_artifact, text_file_name};
use crate::speech::{SpeechClient, VoiceSettings};
use crate::state::Session;
use crate::vocabulary::{frequency_summary, JiebaSegmenter};

#[derive(Parser)]
#[command(name = "hsk-reader")]
#[command(about = "Generate graded Chinese reading passages with pinyin annotation")]
struct Args {
    /// Words to practise, separated by spaces
    #[arg(short, long)]
    words: String,

    /// HSK level (1-5 or HSK1-HSK5)
    #[arg(short, long, default_value = "HSK3")]
    level: Level,

    /// Number of articles to generate (1-10)
    #[arg(short, long, default_value_t = 3)]
    count: usize,

    /// Length bucket: short, medium, long or extended
    #[arg(long, default_value = "long")]
    length: LengthBucket,

    /// Also synthesize read-aloud audio for each article
    #[arg(long)]
    audio: bool,

    /// Skip the pinyin-annotated markup and document
    #[arg(long)]
    no_pinyin: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hsk-reader v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args, &config).await {
        error!("Run failed: {e}");
        eprintln!("生成失败：{e}");
        eprintln!("可能原因：");
        for cause in e.likely_causes() {
            eprintln!("  - {cause}");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args, config: &Config) -> Result<(), AppError> {
    let llm = LlmClient::new(config.api_key.clone(), config.generation_url.clone())?;
    info!("LLM client initialized (model: {})", MODEL);

    println!("{}", level_spec(args.level).summary());
    println!("每篇字数：{}\n", args.length.label());

    let mut session = Session::new(GenerationConfig::default(), VoiceSettings::default());
    let summary = session
        .generate_from_input(
            &llm,
            args.level,
            &args.words,
            args.length,
            args.count,
            |p| {
                println!(
                    "正在生成第 {}/{} 篇文章... ({:.0}%)",
                    p.completed,
                    p.total,
                    p.fraction() * 100.0
                )
            },
        )
        .await?;
    info!(run_id = ?session.run_id(), "Articles ready");
    println!("成功生成 {} 篇文章！\n", summary.article_count);

    let out = config.output_dir.as_path();
    let transcriber = PinyinTranscriber;
    let segmenter = JiebaSegmenter::new();
    let speech = if args.audio {
        Some(SpeechClient::new(config.api_key.clone(), config.speech_url.clone())?)
    } else {
        None
    };

    let articles = session.articles().to_vec();
    for (offset, article) in articles.iter().enumerate() {
        let index = offset + 1;
        println!("文章 {index}（{} 字）\n{}\n", article.glyph_count(), article.text);
        export_artifact(
            out,
            &text_file_name(article.level, index),
            article.text.as_bytes(),
        )?;

        if !args.no_pinyin {
            let html = session.inline_markup(index, &transcriber)?;
            export_artifact(
                out,
                &render::document_file_name(article.level, index, "html"),
                html.as_bytes(),
            )?;
            let docx = session.document(index, &transcriber).await?;
            export_artifact(
                out,
                &artifact_file_name(article.level, index, ArtifactKind::Document),
                &docx,
            )?;
        }

        println!("高频词汇 Top 10：");
        for (word, count) in frequency_summary(&article.text, &segmenter) {
            println!("  - {word}: {count} 次");
        }

        if let Some(speech) = &speech {
            // Audio failures are reported per item; the rest of the batch stays usable.
            match session.audio(index, speech).await {
                Ok(audio) => {
                    export_artifact(
                        out,
                        &artifact_file_name(article.level, index, ArtifactKind::Audio),
                        &audio,
                    )?;
                }
                Err(e) => {
                    eprintln!("MP3 生成失败：{e}");
                    for cause in e.likely_causes() {
                        eprintln!("  - {cause}");
                    }
                }
            }
        }
        println!();
    }

    info!(
        cached = session.cached_artifacts(),
        dir = %out.display(),
        "Exports complete"
    );
    Ok(())
}
