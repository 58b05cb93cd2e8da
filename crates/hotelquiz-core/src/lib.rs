//! hotelquiz-core: quiz engine and pronunciation scoring for hotel English.
//!
//! This crate holds the question bank, the session state machine, scoring,
//! and the collaborator interfaces (speech, progress storage) that a
//! front end plugs into.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod progress;
pub mod pronunciation;
pub mod report;
pub mod statistics;
pub mod traits;
