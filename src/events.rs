//! Events emitted by a reading session.
//!
//! The host receives a single ordered stream of these instead of wiring one
//! callback per concern.

use crate::layout::LayoutMode;
use crate::phase::ReaderPhase;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export)]
pub enum ReaderEvent {
    /// Navigation moved to a new page (or spread in landscape mode).
    PageChanged { index: usize, total: usize },
    /// Forward navigation was requested on the last position.
    ContentExhausted,
    /// The reader finished the story content. Emitted once per session.
    Completed,
    QuizCompleted { correct: usize, total: usize },
    QuizPassed { score_percent: f64 },
    QuizFailed { score_percent: f64, pass_threshold: f64 },
    /// A word was tapped; already cleaned and lowercased.
    WordTapped { word: String },
    PhaseAdvanced { phase: ReaderPhase },
    LayoutRecomputed {
        layout_mode: LayoutMode,
        pages: usize,
        spreads: usize,
    },
    NavigationHintDismissed,
    FullscreenRequested { enabled: bool },
    /// The story has nothing to read; the session stays inert.
    NoContent,
}
