//! Terminal User Interface module.
//!
//! This module provides the TUI for the news reader, including:
//! - Main event loop (`run`)
//! - Input handling for browse, detail, and search modes
//! - Rendering for the article list, sidebar, ads and overlays
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and overlay dispatch
//! - `helpers` - Background task spawning and shared utilities
//! - `articles` - Heading, article list and its state panels
//! - `banner` - Ad slots and the interstitial
//! - `categories` - Category bar
//! - `detail` - Article detail overlay
//! - `stats` - Engagement stats panel
//! - `status` - Status bar widget

mod articles;
mod banner;
mod categories;
mod detail;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod stats;
mod status;

pub use loop_runner::{run, Action};

/// Frames of the loading spinner.
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
