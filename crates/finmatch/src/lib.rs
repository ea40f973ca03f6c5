//! Domain library for the finmatch marketplace connecting part-time finance
//! professionals with businesses.
//!
//! The crate currently ships the worker verification workflow: skills-test
//! grading with retake lockouts, channel-based verification scoring, admin
//! review of references and documents, and the profile approval state
//! machine. HTTP wiring, configuration, and telemetry live alongside so the
//! API service stays a thin shell.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
