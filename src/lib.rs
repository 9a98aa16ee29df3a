//! Pagination and spread composition for an immersive children's reader.
//!
//! A story's text and illustrations go in; a deterministic list of pages (and,
//! on wide screens, double-page spreads) comes out, together with a session
//! that drives page turns and the reading, quiz and end-screen lifecycle.

pub mod cache;
pub mod cancellation;
pub mod config;
pub mod derive;
pub mod error;
pub mod events;
pub mod image_plan;
pub mod layout;
pub mod navigation;
pub mod normalizer;
pub mod pagination;
pub mod phase;
pub mod session;
pub mod spread;
pub mod story;
pub mod syllables;
pub mod text_utils;
pub mod tier;
pub mod typography;

pub use derive::{DerivedLayout, LayoutInputs, derive_layout};
pub use error::{ReaderError, Result};
pub use events::ReaderEvent;
pub use session::{ReaderSession, SessionCommand, SessionSetup};
pub use story::{ReaderProfile, Story};
