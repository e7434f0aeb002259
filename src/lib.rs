//! Patch viewer with line pairing and word-level change highlighting.
//!
//! The engine lives in [`align`]: it numbers hunk lines, pairs removed lines
//! with the added lines that replace them, and marks the words that changed.
//! [`view`] arranges the result into unified or side-by-side rows, and the
//! remaining modules make up the `hl` terminal viewer.

pub mod align;
pub mod app;
pub mod config;
pub mod git;
pub mod syntax;
pub mod ui;
pub mod view;
pub mod watch;
