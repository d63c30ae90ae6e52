//! Note tracking
//!
//! Turns per-semitone energy frames into discrete note events.

pub mod tracker;

pub use tracker::{track_notes, NoteTracker};
