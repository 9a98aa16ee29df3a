//! Reading session lifecycle: reading, quiz and end screen.
//!
//! Chapter stories require a passed quiz before the end screen (and with it
//! the way to the next episode) is reached. Standalone stories go straight to
//! the end screen; their quiz is optional and can be taken from there as
//! often as the reader likes.

use crate::events::ReaderEvent;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum EndScreenVariant {
    Single,
    Chapter,
    SeriesComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "phase", rename_all = "kebab-case")]
#[ts(export)]
pub enum ReaderPhase {
    Reading,
    Quiz,
    /// Mandatory quiz not passed; only a retry is offered.
    QuizFailed,
    EndScreen { variant: EndScreenVariant },
}

impl ReaderPhase {
    fn rank(self) -> u8 {
        match self {
            ReaderPhase::Reading => 0,
            ReaderPhase::Quiz | ReaderPhase::QuizFailed => 1,
            ReaderPhase::EndScreen { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[ts(export)]
pub enum StoryKind {
    Standalone,
    Chapter {
        episode_number: u32,
        series_episode_count: u32,
    },
}

impl StoryKind {
    pub fn is_chapter(self) -> bool {
        matches!(self, StoryKind::Chapter { .. })
    }

    pub fn end_screen_variant(self) -> EndScreenVariant {
        match self {
            StoryKind::Standalone => EndScreenVariant::Single,
            StoryKind::Chapter {
                episode_number,
                series_episode_count,
            } if episode_number >= series_episode_count => EndScreenVariant::SeriesComplete,
            StoryKind::Chapter { .. } => EndScreenVariant::Chapter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizAvailability {
    pub has_quiz: bool,
    pub question_count: usize,
    /// Percentage (0-100) needed to pass a mandatory quiz.
    pub pass_threshold: f64,
}

impl QuizAvailability {
    pub fn none() -> Self {
        Self {
            has_quiz: false,
            question_count: 0,
            pass_threshold: 0.0,
        }
    }

    /// A flagged quiz without questions does not count.
    pub fn is_available(&self) -> bool {
        self.has_quiz && self.question_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    pub score_percent: f64,
    pub passed: bool,
}

impl QuizResult {
    pub fn score(correct: usize, total: usize, pass_threshold: f64) -> Self {
        let correct = correct.min(total);
        let score_percent = if total == 0 {
            100.0
        } else {
            correct as f64 * 100.0 / total as f64
        };
        Self {
            correct,
            total,
            score_percent,
            passed: score_percent >= pass_threshold,
        }
    }
}

/// Actions an end or retry screen offers, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum EndScreenAction {
    NextEpisode,
    ReadAgain,
    TakeQuiz,
    Retry,
    StartNewSeries,
    BrowseLibrary,
}

#[derive(Debug, Clone)]
pub struct ReaderPhaseMachine {
    phase: ReaderPhase,
    kind: StoryKind,
    quiz: QuizAvailability,
    completion_fired: bool,
    last_quiz_result: Option<QuizResult>,
}

impl ReaderPhaseMachine {
    pub fn new(kind: StoryKind, quiz: QuizAvailability) -> Self {
        Self {
            phase: ReaderPhase::Reading,
            kind,
            quiz,
            completion_fired: false,
            last_quiz_result: None,
        }
    }

    pub fn phase(&self) -> ReaderPhase {
        self.phase
    }

    pub fn story_kind(&self) -> StoryKind {
        self.kind
    }

    pub fn last_quiz_result(&self) -> Option<QuizResult> {
        self.last_quiz_result
    }

    pub fn quiz_is_mandatory(&self) -> bool {
        self.kind.is_chapter() && self.quiz.is_available()
    }

    /// Forward navigation ran past the last page.
    pub fn content_exhausted(&mut self) -> Vec<ReaderEvent> {
        if self.phase != ReaderPhase::Reading {
            return Vec::new();
        }
        let mut events = Vec::new();
        if !self.completion_fired {
            self.completion_fired = true;
            events.push(ReaderEvent::Completed);
        }
        let next = if self.quiz_is_mandatory() {
            ReaderPhase::Quiz
        } else {
            self.end_screen()
        };
        self.advance(next, &mut events);
        events
    }

    /// Open the optional quiz from a standalone story's end screen.
    pub fn open_quiz(&mut self) -> Vec<ReaderEvent> {
        let allowed = matches!(self.phase, ReaderPhase::EndScreen { .. })
            && !self.kind.is_chapter()
            && self.quiz.is_available();
        let mut events = Vec::new();
        if allowed {
            self.phase = ReaderPhase::Quiz;
            info!("Opened optional quiz from end screen");
            events.push(ReaderEvent::PhaseAdvanced {
                phase: self.phase,
            });
        }
        events
    }

    pub fn complete_quiz(&mut self, correct: usize, total: usize) -> Vec<ReaderEvent> {
        if self.phase != ReaderPhase::Quiz {
            return Vec::new();
        }
        let result = QuizResult::score(correct, total, self.quiz.pass_threshold);
        self.last_quiz_result = Some(result);

        let mut events = vec![ReaderEvent::QuizCompleted {
            correct: result.correct,
            total: result.total,
        }];
        if !self.kind.is_chapter() {
            let next = self.end_screen();
            self.advance(next, &mut events);
            return events;
        }

        if result.passed {
            events.push(ReaderEvent::QuizPassed {
                score_percent: result.score_percent,
            });
            let next = self.end_screen();
            self.advance(next, &mut events);
        } else {
            info!(
                score = result.score_percent,
                threshold = self.quiz.pass_threshold,
                "Mandatory quiz failed"
            );
            events.push(ReaderEvent::QuizFailed {
                score_percent: result.score_percent,
                pass_threshold: self.quiz.pass_threshold,
            });
            self.phase = ReaderPhase::QuizFailed;
            events.push(ReaderEvent::PhaseAdvanced { phase: self.phase });
        }
        events
    }

    /// "Read again" or "retry": back to reading. The caller repositions the
    /// page. Completion is not re-announced on the next pass.
    pub fn restart(&mut self) -> Vec<ReaderEvent> {
        if !matches!(
            self.phase,
            ReaderPhase::EndScreen { .. } | ReaderPhase::QuizFailed
        ) {
            return Vec::new();
        }
        self.phase = ReaderPhase::Reading;
        info!("Restarting reading session");
        vec![ReaderEvent::PhaseAdvanced { phase: self.phase }]
    }

    pub fn available_actions(&self) -> Vec<EndScreenAction> {
        match self.phase {
            ReaderPhase::Reading | ReaderPhase::Quiz => Vec::new(),
            ReaderPhase::QuizFailed => vec![EndScreenAction::Retry],
            ReaderPhase::EndScreen { variant } => match variant {
                EndScreenVariant::Single => {
                    let mut actions = vec![EndScreenAction::ReadAgain];
                    if self.quiz.is_available() {
                        actions.push(EndScreenAction::TakeQuiz);
                    }
                    actions.push(EndScreenAction::BrowseLibrary);
                    actions
                }
                EndScreenVariant::Chapter => {
                    vec![EndScreenAction::NextEpisode, EndScreenAction::ReadAgain]
                }
                EndScreenVariant::SeriesComplete => vec![
                    EndScreenAction::StartNewSeries,
                    EndScreenAction::BrowseLibrary,
                    EndScreenAction::ReadAgain,
                ],
            },
        }
    }

    fn end_screen(&self) -> ReaderPhase {
        ReaderPhase::EndScreen {
            variant: self.kind.end_screen_variant(),
        }
    }

    fn advance(&mut self, next: ReaderPhase, events: &mut Vec<ReaderEvent>) {
        debug_assert!(next.rank() >= self.phase.rank());
        info!(from = ?self.phase, to = ?next, "Reader phase advanced");
        self.phase = next;
        events.push(ReaderEvent::PhaseAdvanced { phase: next });
    }
}
