//! `heart-failure` library crate.
//!
//! The binary (`heart-failure`) is a thin wrapper around this library so that
//! the pipeline stages are testable without spawning processes or talking to a
//! real database.

pub mod app;
pub mod cli;
pub mod components;
pub mod constants;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logger;
pub mod report;

#[cfg(test)]
mod test_support;
