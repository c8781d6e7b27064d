//! Symptom intake that decides whether a Functional Reach Test is needed,
//! and hands off to the test when it is.

pub mod assessment;
pub mod cli;
pub mod config;
pub mod error;
pub mod intake;
pub mod server;
pub mod upload;
