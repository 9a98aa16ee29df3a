//! Preview host for the reader core.
//!
//! Loads `conf/config.toml` and a story JSON file, starts a session for the
//! requested reader and viewport, then turns pages until the session leaves
//! the reading phase, logging every event on the way.

use anyhow::{Context, Result, anyhow, bail};
use immersive_reader::config::load_config;
use immersive_reader::layout::Viewport;
use immersive_reader::phase::ReaderPhase;
use immersive_reader::session::{MemoryFlagStore, MemoryFullscreen};
use immersive_reader::typography::FontSizeSetting;
use immersive_reader::{ReaderEvent, ReaderSession, SessionCommand, SessionSetup, Story};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: immersive-reader <story.json> [--age N] [--width W --height H] \
[--tier T] [--quiz N] [--font-size small|medium|large]";
const MAX_STEPS: usize = 10_000;

#[derive(Debug)]
struct PreviewArgs {
    story_path: PathBuf,
    age: Option<i32>,
    width: Option<f32>,
    height: Option<f32>,
    tier: Option<String>,
    quiz_questions: Option<usize>,
    font_size: Option<FontSizeSetting>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let mut config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    if let Some(font_size) = args.font_size {
        config.font_size = font_size;
    }

    let story = load_story(&args.story_path)?;
    info!(
        path = %args.story_path.display(),
        story_id = %story.id,
        title = %story.title,
        "Opening story"
    );

    let mut setup = SessionSetup::new(story);
    if let Some(age) = args.age {
        setup.profile.age = age;
    }
    setup.viewport = Viewport {
        width: args.width.unwrap_or(setup.viewport.width),
        height: args.height.unwrap_or(setup.viewport.height),
    };
    setup.account_tier = args.tier.clone();
    if let Some(questions) = args.quiz_questions {
        setup.has_quiz = true;
        setup.quiz_question_count = questions;
    }

    let (mut session, events) = ReaderSession::start(
        setup,
        config,
        MemoryFlagStore::default(),
        MemoryFullscreen::new(false),
    );
    log_events(&events);
    log_layout(&session);
    if !session.has_content() {
        warn!("Nothing to read; stopping");
        return Ok(());
    }

    let mut now = Instant::now();
    let step = Duration::from_secs(1);
    for _ in 0..MAX_STEPS {
        now += step;
        session.apply_command(SessionCommand::Tick, now);
        let events = match session.phase() {
            ReaderPhase::Reading => session.apply_command(SessionCommand::NextPage, now),
            ReaderPhase::Quiz => {
                let total = args.quiz_questions.unwrap_or_default();
                session.apply_command(
                    SessionCommand::QuizAnswered {
                        correct: total,
                        total,
                    },
                    now,
                )
            }
            ReaderPhase::QuizFailed | ReaderPhase::EndScreen { .. } => break,
        };
        log_events(&events);
    }

    let view = session.view(now);
    info!(
        phase = ?view.phase,
        actions = ?view.available_actions,
        "Session finished"
    );
    let rendered = serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
    debug!("Final view:\n{rendered}");
    session.apply_command(SessionCommand::Teardown, now);
    Ok(())
}

fn load_story(path: &Path) -> Result<Story> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read story {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid story JSON in {}", path.display()))
}

fn log_events(events: &[ReaderEvent]) {
    for event in events {
        info!(?event, "Reader event");
    }
}

fn log_layout(session: &ReaderSession) {
    let Some(layout) = session.layout() else {
        return;
    };
    info!(
        layout_mode = %layout.layout_mode,
        words_per_page = layout.typography.max_words_per_page,
        font_size = layout.typography.font_size,
        pages = layout.pages.len(),
        spreads = layout.spreads.len(),
        images = layout.images.story.len(),
        "Layout ready"
    );
    for (index, page) in layout.pages.iter().enumerate() {
        debug!(
            index,
            kind = ?page.kind,
            words = page.word_count(),
            image = ?page.image_index,
            "Page"
        );
    }
    for (index, spread) in layout.spreads.iter().enumerate() {
        debug!(
            index,
            variant = ?spread.variant,
            image_side = ?spread.image_side,
            first_page = spread.first_page_index,
            "Spread"
        );
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<PreviewArgs> {
    let story_path = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    if !story_path.exists() {
        return Err(anyhow!("File not found: {}", story_path.display()));
    }

    let mut parsed = PreviewArgs {
        story_path,
        age: None,
        width: None,
        height: None,
        tier: None,
        quiz_questions: None,
        font_size: None,
    };
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| anyhow!("Missing value for {flag}\n{USAGE}"))?;
        match flag.as_str() {
            "--age" => parsed.age = Some(value.parse().context("--age expects an integer")?),
            "--width" => parsed.width = Some(value.parse().context("--width expects a number")?),
            "--height" => {
                parsed.height = Some(value.parse().context("--height expects a number")?)
            }
            "--tier" => parsed.tier = Some(value),
            "--quiz" => {
                parsed.quiz_questions =
                    Some(value.parse().context("--quiz expects a question count")?)
            }
            "--font-size" => {
                parsed.font_size = Some(match value.as_str() {
                    "small" => FontSizeSetting::Small,
                    "medium" => FontSizeSetting::Medium,
                    "large" => FontSizeSetting::Large,
                    other => bail!("Unknown font size: {other}"),
                })
            }
            other => bail!("Unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    debug!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
