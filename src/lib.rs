//! newsreel: a terminal news reader.
//!
//! Browses NewsAPI headlines by category, searches articles, and keeps a
//! small engagement ledger (articles read, coins earned, ads watched) fed by
//! a simulated ad service.

pub mod ads;
pub mod app;
pub mod config;
pub mod news;
pub mod retrieval;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
