//! One reading session: commands in, events out.
//!
//! The session owns the derived layout, the navigation controller and the
//! phase machine. Hosts feed it `SessionCommand`s together with the current
//! instant and forward the returned `ReaderEvent`s. Rendering state is read
//! back through `view`.

use crate::cache::{LayoutCache, layout_fingerprint};
use crate::cancellation::CancellationToken;
use crate::config::ReaderConfig;
use crate::derive::{DerivedLayout, LayoutInputs};
use crate::error::ReaderError;
use crate::events::ReaderEvent;
use crate::layout::{LayoutMode, Viewport, detect_layout_mode};
use crate::navigation::{NavOutcome, NavigationState, PagePositionController};
use crate::pagination::Page;
use crate::phase::{
    EndScreenAction, QuizAvailability, QuizResult, ReaderPhase, ReaderPhaseMachine,
};
use crate::spread::{Side, SpreadHalf, SpreadVariant};
use crate::story::{ActivityResult, ReaderProfile, Story};
use crate::syllables::{ColoredToken, SyllableColorAssigner, SyllableLanguage};
use crate::text_utils::clean_tapped_word;
use crate::tier::TierLimits;
use crate::typography::{FontSizeSetting, TypographyConfig};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Flag recording that the reader has seen the swipe/tap hint.
pub const NAVIGATION_HINT_FLAG: &str = "immersive-reader.navigation-hint-seen";

/// Persistent one-time flags owned by the host.
pub trait FlagStore {
    fn is_set(&self, key: &str) -> bool;
    fn set(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: BTreeSet<String>,
}

impl FlagStore for MemoryFlagStore {
    fn is_set(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    fn set(&mut self, key: &str) {
        self.flags.insert(key.to_string());
    }
}

/// Host fullscreen support. Requests are fire-and-forget; the host reports
/// the outcome later with `SessionCommand::FullscreenChanged`.
pub trait FullscreenControl {
    fn is_supported(&self) -> bool;
    fn request(&mut self, enabled: bool);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFullscreen {
    supported: bool,
    requests: Vec<bool>,
}

impl MemoryFullscreen {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[bool] {
        &self.requests
    }
}

impl FullscreenControl for MemoryFullscreen {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn request(&mut self, enabled: bool) {
        self.requests.push(enabled);
    }
}

/// Everything the host knows about the session before it starts.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    pub story: Story,
    pub profile: ReaderProfile,
    /// `None` uses the configured default tier.
    pub account_tier: Option<String>,
    pub viewport: Viewport,
    pub has_quiz: bool,
    pub quiz_question_count: usize,
    /// `None` uses the configured threshold.
    pub quiz_pass_threshold: Option<f64>,
    pub activity_result: Option<ActivityResult>,
}

impl SessionSetup {
    pub fn new(story: Story) -> Self {
        Self {
            story,
            profile: ReaderProfile::default(),
            account_tier: None,
            viewport: Viewport {
                width: 390.0,
                height: 844.0,
            },
            has_quiz: false,
            quiz_question_count: 0,
            quiz_pass_threshold: None,
            activity_result: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    NextPage,
    PrevPage,
    /// Release an expired transition lock.
    Tick,
    WordTapped { word: String },
    QuizAnswered { correct: usize, total: usize },
    OpenQuiz,
    ReadAgain,
    Retry,
    Resize { viewport: Viewport },
    SetFontSize { font_size: FontSizeSetting },
    SetAccountTier { tier: String },
    DismissNavigationHint,
    ToggleFullscreen,
    FullscreenChanged { enabled: bool },
    Teardown,
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::NextPage => "reader_next_page",
            Self::PrevPage => "reader_prev_page",
            Self::Tick => "reader_tick",
            Self::WordTapped { .. } => "reader_word_tapped",
            Self::QuizAnswered { .. } => "reader_quiz_answered",
            Self::OpenQuiz => "reader_open_quiz",
            Self::ReadAgain => "reader_read_again",
            Self::Retry => "reader_retry",
            Self::Resize { .. } => "reader_resize",
            Self::SetFontSize { .. } => "reader_set_font_size",
            Self::SetAccountTier { .. } => "reader_set_account_tier",
            Self::DismissNavigationHint => "reader_dismiss_navigation_hint",
            Self::ToggleFullscreen => "reader_toggle_fullscreen",
            Self::FullscreenChanged { .. } => "reader_fullscreen_changed",
            Self::Teardown => "reader_teardown",
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PageView {
    pub page: Page,
    pub image_url: Option<String>,
    /// Syllable-colored tokens, one entry per paragraph.
    pub tokens: Vec<Vec<ColoredToken>>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SpreadView {
    pub variant: SpreadVariant,
    pub image_side: Option<Side>,
    pub left: SpreadHalf,
    pub right: SpreadHalf,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReaderView {
    pub story_id: String,
    pub title: String,
    pub no_content: bool,
    pub phase: ReaderPhase,
    pub layout_mode: LayoutMode,
    pub typography: Option<TypographyConfig>,
    pub navigation: NavigationState,
    pub cover_image_url: Option<String>,
    /// Pages visible at the current position, left to right.
    pub pages: Vec<PageView>,
    pub spread: Option<SpreadView>,
    pub show_navigation_hint: bool,
    pub fullscreen: bool,
    pub available_actions: Vec<EndScreenAction>,
    pub last_quiz_result: Option<QuizResult>,
    pub activity_result: Option<ActivityResult>,
}

pub struct ReaderSession<F = MemoryFlagStore, S = MemoryFullscreen> {
    story: Story,
    profile: ReaderProfile,
    account_tier: String,
    viewport: Viewport,
    font_size: FontSizeSetting,
    config: ReaderConfig,
    tier_limits: TierLimits,
    cache: LayoutCache,
    layout: Option<Arc<DerivedLayout>>,
    layout_mode: LayoutMode,
    fingerprint: Option<String>,
    navigation: PagePositionController,
    phase: ReaderPhaseMachine,
    activity_result: Option<ActivityResult>,
    show_navigation_hint: bool,
    fullscreen_enabled: bool,
    fullscreen_pending: Option<bool>,
    cancel: CancellationToken,
    flags: F,
    fullscreen: S,
}

impl<F: FlagStore, S: FullscreenControl> ReaderSession<F, S> {
    /// Build the session and derive the first layout. The returned events
    /// carry either `LayoutRecomputed` or `NoContent`.
    pub fn start(
        setup: SessionSetup,
        config: ReaderConfig,
        flags: F,
        fullscreen: S,
    ) -> (Self, Vec<ReaderEvent>) {
        let quiz = QuizAvailability {
            has_quiz: setup.has_quiz,
            question_count: setup.quiz_question_count,
            pass_threshold: setup
                .quiz_pass_threshold
                .unwrap_or(config.quiz_pass_threshold),
        };
        if setup.has_quiz && !quiz.is_available() {
            info!(story_id = %setup.story.id, "Quiz has no questions; skipping it");
        }
        let account_tier = setup
            .account_tier
            .unwrap_or_else(|| config.default_tier.clone());
        let show_navigation_hint = !flags.is_set(NAVIGATION_HINT_FLAG);

        let mut session = Self {
            phase: ReaderPhaseMachine::new(setup.story.kind(), quiz),
            story: setup.story,
            profile: setup.profile,
            account_tier,
            viewport: setup.viewport,
            font_size: config.font_size,
            tier_limits: config.tier_limits(),
            navigation: PagePositionController::new(1, config.transition_window()),
            config,
            cache: LayoutCache::default(),
            layout: None,
            layout_mode: LayoutMode::default(),
            fingerprint: None,
            activity_result: setup.activity_result,
            show_navigation_hint,
            fullscreen_enabled: false,
            fullscreen_pending: None,
            cancel: CancellationToken::new(),
            flags,
            fullscreen,
        };
        let events = session.recompute();
        (session, events)
    }

    pub fn flags(&self) -> &F {
        &self.flags
    }

    pub fn fullscreen_control(&self) -> &S {
        &self.fullscreen
    }

    /// Token shared with deferred host callbacks; cancelled on teardown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn layout(&self) -> Option<&DerivedLayout> {
        self.layout.as_deref()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn phase(&self) -> ReaderPhase {
        self.phase.phase()
    }

    pub fn has_content(&self) -> bool {
        self.layout.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.navigation.current_index()
    }

    pub fn navigation_state(&self, now: Instant) -> NavigationState {
        self.navigation.state(now)
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Re-derive the layout from the current inputs. Navigation resets to the
    /// first position whenever the page or spread list changes identity.
    pub fn recompute(&mut self) -> Vec<ReaderEvent> {
        let layout_mode = detect_layout_mode(self.viewport, &self.config.layout_thresholds());
        let inputs = LayoutInputs {
            story: &self.story,
            age: self.profile.age,
            font_size: self.font_size,
            account_tier: &self.account_tier,
            tier_limits: &self.tier_limits,
            layout_mode,
            split_oversized_paragraphs: self.config.split_oversized_paragraphs,
            oversized_paragraph_factor: self.config.oversized_paragraph_factor,
        };
        let fingerprint = layout_fingerprint(&inputs);
        if self.fingerprint.as_deref() == Some(fingerprint.as_str()) {
            debug!(layout_mode = %layout_mode, "Layout inputs unchanged");
            return Vec::new();
        }

        let derived = self.cache.get_or_derive(&inputs);
        let first_derivation = self.fingerprint.is_none();
        self.layout_mode = layout_mode;
        self.fingerprint = Some(fingerprint);
        match derived {
            Ok(layout) => {
                self.navigation.reset(layout.position_count());
                let event = ReaderEvent::LayoutRecomputed {
                    layout_mode,
                    pages: layout.pages.len(),
                    spreads: layout.spreads.len(),
                };
                self.layout = Some(layout);
                vec![event]
            }
            Err(ReaderError::NoContent) => {
                warn!(story_id = %self.story.id, "Story has no readable content");
                let was_readable = self.layout.take().is_some();
                self.navigation.reset(1);
                if was_readable || first_derivation {
                    vec![ReaderEvent::NoContent]
                } else {
                    Vec::new()
                }
            }
            Err(err) => {
                warn!(story_id = %self.story.id, "Layout derivation failed: {err}");
                self.layout = None;
                self.navigation.reset(1);
                vec![ReaderEvent::NoContent]
            }
        }
    }

    pub fn apply_command(&mut self, command: SessionCommand, now: Instant) -> Vec<ReaderEvent> {
        let action = command.action();
        if let Err(err) = self.cancel.check_cancelled(action) {
            debug!("Ignoring command: {err}");
            return Vec::new();
        }
        if self.layout.is_none() && !matches!(command, SessionCommand::Teardown) {
            debug!(action, "Ignoring command without readable content");
            return Vec::new();
        }
        debug!(action, "Applying reader command");

        match command {
            SessionCommand::NextPage => self.next_page(now),
            SessionCommand::PrevPage => self.prev_page(now),
            SessionCommand::Tick => {
                if self.navigation.tick(now) {
                    debug!("Page transition finished");
                }
                Vec::new()
            }
            SessionCommand::WordTapped { word } => self.word_tapped(&word),
            SessionCommand::QuizAnswered { correct, total } => {
                self.phase.complete_quiz(correct, total)
            }
            SessionCommand::OpenQuiz => self.phase.open_quiz(),
            SessionCommand::ReadAgain => {
                if matches!(self.phase.phase(), ReaderPhase::EndScreen { .. }) {
                    self.restart()
                } else {
                    Vec::new()
                }
            }
            SessionCommand::Retry => {
                if self.phase.phase() == ReaderPhase::QuizFailed {
                    self.restart()
                } else {
                    Vec::new()
                }
            }
            SessionCommand::Resize { viewport } => {
                self.viewport = viewport;
                self.recompute()
            }
            SessionCommand::SetFontSize { font_size } => {
                self.font_size = font_size;
                self.recompute()
            }
            SessionCommand::SetAccountTier { tier } => {
                self.account_tier = tier;
                self.recompute()
            }
            SessionCommand::DismissNavigationHint => self.dismiss_navigation_hint(),
            SessionCommand::ToggleFullscreen => self.toggle_fullscreen(),
            SessionCommand::FullscreenChanged { enabled } => {
                self.fullscreen_enabled = enabled;
                self.fullscreen_pending = None;
                Vec::new()
            }
            SessionCommand::Teardown => {
                self.teardown();
                Vec::new()
            }
        }
    }

    fn next_page(&mut self, now: Instant) -> Vec<ReaderEvent> {
        if self.phase.phase() != ReaderPhase::Reading {
            return Vec::new();
        }
        match self.navigation.go_next(now) {
            NavOutcome::Moved(index) => {
                let mut events = self.dismiss_navigation_hint();
                events.push(ReaderEvent::PageChanged {
                    index,
                    total: self.navigation.total(),
                });
                events
            }
            NavOutcome::Exhausted => {
                let mut events = vec![ReaderEvent::ContentExhausted];
                events.extend(self.phase.content_exhausted());
                events
            }
            NavOutcome::Locked | NavOutcome::AtStart => Vec::new(),
        }
    }

    fn prev_page(&mut self, now: Instant) -> Vec<ReaderEvent> {
        if self.phase.phase() != ReaderPhase::Reading {
            return Vec::new();
        }
        match self.navigation.go_prev(now) {
            NavOutcome::Moved(index) => {
                let mut events = self.dismiss_navigation_hint();
                events.push(ReaderEvent::PageChanged {
                    index,
                    total: self.navigation.total(),
                });
                events
            }
            NavOutcome::Locked | NavOutcome::AtStart | NavOutcome::Exhausted => Vec::new(),
        }
    }

    fn word_tapped(&mut self, raw: &str) -> Vec<ReaderEvent> {
        if self.phase.phase() != ReaderPhase::Reading {
            return Vec::new();
        }
        match clean_tapped_word(raw, self.config.min_word_tap_chars) {
            Some(word) => vec![ReaderEvent::WordTapped { word }],
            None => {
                debug!(raw, "Ignoring short word tap");
                Vec::new()
            }
        }
    }

    /// Back to reading: first page, or the first story page of a chapter.
    fn restart(&mut self) -> Vec<ReaderEvent> {
        let mut events = self.phase.restart();
        if events.is_empty() {
            return events;
        }
        let Some(layout) = self.layout.as_deref() else {
            return events;
        };
        let start_page = if self.story.kind().is_chapter() && layout.pages.len() > 1 {
            1
        } else {
            0
        };
        self.navigation.jump_to(layout.position_for_page(start_page));
        events.push(ReaderEvent::PageChanged {
            index: self.navigation.current_index(),
            total: self.navigation.total(),
        });
        events
    }

    fn dismiss_navigation_hint(&mut self) -> Vec<ReaderEvent> {
        if !self.show_navigation_hint {
            return Vec::new();
        }
        self.show_navigation_hint = false;
        self.flags.set(NAVIGATION_HINT_FLAG);
        vec![ReaderEvent::NavigationHintDismissed]
    }

    fn toggle_fullscreen(&mut self) -> Vec<ReaderEvent> {
        if !self.fullscreen.is_supported() {
            debug!("Fullscreen not supported by host");
            return Vec::new();
        }
        let enabled = !self.fullscreen_pending.unwrap_or(self.fullscreen_enabled);
        self.fullscreen.request(enabled);
        self.fullscreen_pending = Some(enabled);
        vec![ReaderEvent::FullscreenRequested { enabled }]
    }

    fn teardown(&mut self) {
        self.cancel.cancel();
        self.navigation.cancel_transition();
        self.fullscreen_pending = None;
        info!(story_id = %self.story.id, "Reader session torn down");
    }

    /// Render state at `now`.
    pub fn view(&self, now: Instant) -> ReaderView {
        let assigner = SyllableColorAssigner::new(
            SyllableLanguage::from_code(&self.story.text_language),
            self.config.color_bands,
        );
        let position = self.navigation.current_index();
        let (pages, spread, typography, cover_image_url) = match self.layout.as_deref() {
            Some(layout) => {
                let pages = layout
                    .pages_at(position)
                    .into_iter()
                    .map(|page| PageView {
                        page: page.clone(),
                        image_url: page
                            .image_index
                            .and_then(|index| layout.image_url(index))
                            .map(str::to_string),
                        tokens: assigner.color_page(page),
                    })
                    .collect();
                let spread = layout.spreads.get(position).map(|spread| {
                    let (left, right) = spread.halves();
                    SpreadView {
                        variant: spread.variant,
                        image_side: spread.image_side,
                        left,
                        right,
                    }
                });
                (
                    pages,
                    spread,
                    Some(layout.typography),
                    layout.images.cover.clone(),
                )
            }
            None => (Vec::new(), None, None, None),
        };

        ReaderView {
            story_id: self.story.id.clone(),
            title: self.story.title.clone(),
            no_content: self.layout.is_none(),
            phase: self.phase.phase(),
            layout_mode: self.layout_mode,
            typography,
            navigation: self.navigation.state(now),
            cover_image_url,
            pages,
            spread,
            show_navigation_hint: self.show_navigation_hint,
            fullscreen: self.fullscreen_enabled,
            available_actions: self.phase.available_actions(),
            last_quiz_result: self.phase.last_quiz_result(),
            activity_result: self.activity_result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::EndScreenVariant;
    use std::time::Duration;

    fn paragraph(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    fn story(paragraphs: usize, words: usize) -> Story {
        let content = (0..paragraphs)
            .map(|_| paragraph(words))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_value(serde_json::json!({
            "id": "fox",
            "title": "The Fox",
            "content": content,
            "story_images": ["scene.png"],
        }))
        .expect("story should parse")
    }

    fn chapter(paragraphs: usize, words: usize) -> Story {
        Story {
            series_id: Some("forest".to_string()),
            episode_number: Some(2),
            series_episode_count: Some(4),
            ..story(paragraphs, words)
        }
    }

    fn config() -> ReaderConfig {
        ReaderConfig {
            transition_lock_ms: 300,
            ..ReaderConfig::default()
        }
    }

    fn start(setup: SessionSetup) -> (ReaderSession, Vec<ReaderEvent>) {
        ReaderSession::start(
            setup,
            config(),
            MemoryFlagStore::default(),
            MemoryFullscreen::new(true),
        )
    }

    /// Step forward, waiting out the transition lock each time.
    fn read_to_end(session: &mut ReaderSession, now: &mut Instant) -> Vec<ReaderEvent> {
        let mut events = Vec::new();
        for _ in 0..64 {
            *now += Duration::from_millis(500);
            let step = session.apply_command(SessionCommand::NextPage, *now);
            let exhausted = step.contains(&ReaderEvent::ContentExhausted);
            events.extend(step);
            if exhausted {
                break;
            }
        }
        events
    }

    #[test]
    fn start_reports_layout() {
        let (session, events) = start(SessionSetup::new(story(5, 40)));
        assert_eq!(
            events,
            vec![ReaderEvent::LayoutRecomputed {
                layout_mode: LayoutMode::Phone,
                pages: 3,
                spreads: 0,
            }]
        );
        assert!(session.has_content());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn standalone_without_quiz_goes_to_end_screen_once() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let mut now = Instant::now();
        let events = read_to_end(&mut session, &mut now);

        let completions = events
            .iter()
            .filter(|event| **event == ReaderEvent::Completed)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(
            session.phase(),
            ReaderPhase::EndScreen {
                variant: EndScreenVariant::Single
            }
        );

        now += Duration::from_secs(1);
        assert!(session.apply_command(SessionCommand::NextPage, now).is_empty());
    }

    #[test]
    fn locked_window_drops_navigation() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let now = Instant::now();
        assert!(!session.apply_command(SessionCommand::NextPage, now).is_empty());
        assert!(
            session
                .apply_command(SessionCommand::NextPage, now + Duration::from_millis(100))
                .is_empty()
        );
        assert_eq!(session.current_index(), 1);

        let later = now + Duration::from_millis(300);
        session.apply_command(SessionCommand::Tick, later);
        assert!(!session.navigation_state(later).transition_locked);
    }

    #[test]
    fn first_turn_dismisses_the_hint_once() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let now = Instant::now();
        let events = session.apply_command(SessionCommand::NextPage, now);
        assert_eq!(events[0], ReaderEvent::NavigationHintDismissed);
        assert!(session.flags().is_set(NAVIGATION_HINT_FLAG));

        let events = session.apply_command(SessionCommand::PrevPage, now + Duration::from_secs(1));
        assert_eq!(events, vec![ReaderEvent::PageChanged { index: 0, total: 3 }]);

        let (next, _) = ReaderSession::start(
            SessionSetup::new(story(2, 10)),
            config(),
            session.flags().clone(),
            MemoryFullscreen::default(),
        );
        assert!(!next.view(now).show_navigation_hint);
    }

    #[test]
    fn failed_chapter_quiz_offers_only_retry() {
        let mut setup = SessionSetup::new(chapter(5, 40));
        setup.has_quiz = true;
        setup.quiz_question_count = 5;
        let (mut session, _) = start(setup);
        let mut now = Instant::now();

        let events = read_to_end(&mut session, &mut now);
        assert!(events.contains(&ReaderEvent::Completed));
        assert_eq!(session.phase(), ReaderPhase::Quiz);

        let events = session.apply_command(
            SessionCommand::QuizAnswered {
                correct: 3,
                total: 5,
            },
            now,
        );
        assert!(events.contains(&ReaderEvent::QuizFailed {
            score_percent: 60.0,
            pass_threshold: 80.0,
        }));
        assert_eq!(session.phase(), ReaderPhase::QuizFailed);
        assert_eq!(
            session.view(now).available_actions,
            vec![EndScreenAction::Retry]
        );
        assert!(session.apply_command(SessionCommand::ReadAgain, now).is_empty());

        let events = session.apply_command(SessionCommand::Retry, now);
        assert_eq!(session.phase(), ReaderPhase::Reading);
        assert_eq!(session.current_index(), 1);
        assert!(events.contains(&ReaderEvent::PageChanged { index: 1, total: 4 }));
    }

    #[test]
    fn passing_chapter_quiz_reaches_chapter_end_screen() {
        let mut setup = SessionSetup::new(chapter(2, 10));
        setup.has_quiz = true;
        setup.quiz_question_count = 4;
        let (mut session, _) = start(setup);
        let mut now = Instant::now();
        read_to_end(&mut session, &mut now);

        session.apply_command(
            SessionCommand::QuizAnswered {
                correct: 4,
                total: 4,
            },
            now,
        );
        assert_eq!(
            session.phase(),
            ReaderPhase::EndScreen {
                variant: EndScreenVariant::Chapter
            }
        );
    }

    #[test]
    fn zero_question_quiz_is_skipped() {
        let mut setup = SessionSetup::new(chapter(2, 10));
        setup.has_quiz = true;
        setup.quiz_question_count = 0;
        let (mut session, _) = start(setup);
        let mut now = Instant::now();
        read_to_end(&mut session, &mut now);
        assert!(matches!(session.phase(), ReaderPhase::EndScreen { .. }));
    }

    #[test]
    fn empty_story_is_inert() {
        let (mut session, events) = start(SessionSetup::new(Story {
            content: " \\n \n ".to_string(),
            ..story(1, 1)
        }));
        assert_eq!(events, vec![ReaderEvent::NoContent]);
        assert!(!session.has_content());

        let now = Instant::now();
        assert!(session.apply_command(SessionCommand::NextPage, now).is_empty());
        let view = session.view(now);
        assert!(view.no_content);
        assert!(view.pages.is_empty());
    }

    #[test]
    fn switching_to_landscape_resets_navigation() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let now = Instant::now();
        session.apply_command(SessionCommand::NextPage, now);
        assert_eq!(session.current_index(), 1);

        let events = session.apply_command(
            SessionCommand::Resize {
                viewport: Viewport {
                    width: 1280.0,
                    height: 800.0,
                },
            },
            now,
        );
        assert_eq!(
            events,
            vec![ReaderEvent::LayoutRecomputed {
                layout_mode: LayoutMode::Landscape,
                pages: 3,
                spreads: 2,
            }]
        );
        assert_eq!(session.current_index(), 0);

        let view = session.view(now);
        assert_eq!(view.pages.len(), 2);
        let spread = view.spread.expect("landscape view has a spread");
        assert_eq!(spread.variant, SpreadVariant::ImageText);

        let same_mode = session.apply_command(
            SessionCommand::Resize {
                viewport: Viewport {
                    width: 1366.0,
                    height: 1024.0,
                },
            },
            now,
        );
        assert!(same_mode.is_empty());
    }

    #[test]
    fn font_size_change_repaginates() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let events = session.apply_command(
            SessionCommand::SetFontSize {
                font_size: FontSizeSetting::Large,
            },
            Instant::now(),
        );
        let Some(ReaderEvent::LayoutRecomputed { pages, .. }) = events.first() else {
            panic!("expected a layout event, got {events:?}");
        };
        assert_eq!(*pages, 5);
    }

    #[test]
    fn word_taps_are_cleaned() {
        let (mut session, _) = start(SessionSetup::new(story(2, 10)));
        let now = Instant::now();
        assert_eq!(
            session.apply_command(
                SessionCommand::WordTapped {
                    word: "\u{201C}Dragon!\u{201D}".to_string()
                },
                now
            ),
            vec![ReaderEvent::WordTapped {
                word: "dragon".to_string()
            }]
        );
        assert!(
            session
                .apply_command(
                    SessionCommand::WordTapped {
                        word: "a,".to_string()
                    },
                    now
                )
                .is_empty()
        );
    }

    #[test]
    fn fullscreen_requests_are_fire_and_forget() {
        let (mut session, _) = start(SessionSetup::new(story(2, 10)));
        let now = Instant::now();
        assert_eq!(
            session.apply_command(SessionCommand::ToggleFullscreen, now),
            vec![ReaderEvent::FullscreenRequested { enabled: true }]
        );
        session.apply_command(SessionCommand::FullscreenChanged { enabled: true }, now);
        assert!(session.view(now).fullscreen);
        session.apply_command(SessionCommand::ToggleFullscreen, now);
        assert_eq!(session.fullscreen_control().requests(), &[true, false]);

        let (mut unsupported, _) = ReaderSession::start(
            SessionSetup::new(story(2, 10)),
            config(),
            MemoryFlagStore::default(),
            MemoryFullscreen::new(false),
        );
        assert!(
            unsupported
                .apply_command(SessionCommand::ToggleFullscreen, now)
                .is_empty()
        );
    }

    #[test]
    fn teardown_ignores_everything_after() {
        let (mut session, _) = start(SessionSetup::new(story(5, 40)));
        let token = session.cancellation_token();
        let now = Instant::now();
        session.apply_command(SessionCommand::NextPage, now);
        session.apply_command(SessionCommand::Teardown, now);

        assert!(token.is_cancelled());
        assert!(session.is_torn_down());
        assert!(!session.navigation_state(now).transition_locked);
        assert!(
            session
                .apply_command(SessionCommand::NextPage, now + Duration::from_secs(1))
                .is_empty()
        );
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn view_colors_the_visible_page() {
        let (session, _) = start(SessionSetup::new(story(1, 3)));
        let view = session.view(Instant::now());
        assert_eq!(view.pages.len(), 1);
        let ColoredToken::Word { offset, .. } = &view.pages[0].tokens[0][0] else {
            panic!("expected a word token");
        };
        assert_eq!(*offset, 0);
        assert_eq!(view.typography.map(|t| t.max_words_per_page), Some(80));
    }
}
