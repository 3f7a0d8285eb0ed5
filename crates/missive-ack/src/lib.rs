//! Verification pipeline for nominal payment missives: checks a missive
//! against the validation authority and writes the matching acknowledgement.

pub mod acknowledgement;
pub mod config;
pub mod document;
pub mod error;
pub mod missive;
pub mod pipeline;
pub mod telemetry;
pub mod verification;
