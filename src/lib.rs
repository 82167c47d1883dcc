//! Core library for the hackathon-teams command line application.
//!
//! An upload of participants flows through narrow, composable stages: the
//! spreadsheet adapters in [`io`], normalization in [`enrich`], team building
//! in [`assign`], the report cell model in [`report`], and the orchestration
//! helpers in [`pipeline`]. Team names and mentors live in [`roster`];
//! confirmation emails in [`email`].

pub mod assign;
pub mod email;
pub mod enrich;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod roster;
pub mod settings;

pub use error::{HackathonError, Result};
