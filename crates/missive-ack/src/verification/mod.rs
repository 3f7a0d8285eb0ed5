//! Ordered business-rule verification of nominal missives against the
//! validation authority.

mod client;
mod outcome;
mod verifier;

#[cfg(test)]
mod tests;

pub use client::{
    CheckKind, CheckRequest, ClientError, HttpVerificationClient, VerificationClient,
};
pub use outcome::{
    PriorityLevel, ReturnCode, RoutingWarning, VerificationOutcome, STALE_TIMESTAMP_CODE,
    STALE_TIMESTAMP_DESCRIPTION,
};
pub use verifier::{MissiveVerifier, VerificationError};
