use tracing::{info, warn};

use super::client::{CheckKind, CheckRequest, ClientError, VerificationClient};
use super::outcome::{PriorityLevel, ReturnCode, RoutingWarning, VerificationOutcome};
use crate::missive::Missive;

/// Runs the fixed rule sequence for nominal missives. Receiver, sender and
/// send-date format are hard gates; date freshness and priority only annotate.
pub struct MissiveVerifier<C> {
    client: C,
}

impl<C: VerificationClient> MissiveVerifier<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn verify(&self, missive: &Missive) -> Result<VerificationOutcome, VerificationError> {
        let missive_id = missive.id().unwrap_or("-");

        let gates = [
            (
                CheckRequest::receiver(missive.receiver()),
                ReturnCode::RECEIVER_REJECTED,
            ),
            (
                CheckRequest::sender(missive.sender()),
                ReturnCode::SENDER_REJECTED,
            ),
            (
                CheckRequest::date_well_formed(missive.send_timestamp()),
                ReturnCode::SEND_DATE_MALFORMED,
            ),
        ];

        for (request, rejection) in gates {
            let passed = self.flag(&request)?;
            log_step(missive_id, request.kind(), passed);
            if !passed {
                return Ok(VerificationOutcome::rejected(rejection));
            }
        }

        let mut warning = None;

        let fresh = self.flag(&CheckRequest::date_fresh(missive.send_timestamp()))?;
        log_step(missive_id, CheckKind::DateFresh, fresh);
        if !fresh {
            warning = Some(RoutingWarning::stale_timestamp());
        }

        let verdict = self.priority(&CheckRequest::priority(missive.priority()))?;
        log_step(
            missive_id,
            CheckKind::Priority,
            verdict == PriorityVerdict::Accepted,
        );
        if let PriorityVerdict::Rejected(Some(label)) = verdict {
            match PriorityLevel::from_label(&label) {
                Some(level) => {
                    // Single warning slot: the priority warning wins.
                    if let Some(previous) = warning.replace(level.warning()) {
                        warn!(
                            missive_id,
                            superseded = previous.code(),
                            priority = level.label(),
                            "routing warning overwritten"
                        );
                    }
                }
                None => warn!(
                    missive_id,
                    label = label.as_str(),
                    "unrecognised priority tier, no warning attached"
                ),
            }
        }

        Ok(VerificationOutcome::accepted(warning))
    }

    fn flag(&self, request: &CheckRequest) -> Result<bool, VerificationError> {
        let body = self.client.check(request)?;
        parse_flag(&body).ok_or_else(|| VerificationError::MalformedResponse {
            action: request.kind().action(),
            body,
        })
    }

    fn priority(&self, request: &CheckRequest) -> Result<PriorityVerdict, VerificationError> {
        let body = self.client.check(request)?;
        let answer = unquote(&body);
        if answer.is_empty() {
            return Err(VerificationError::MalformedResponse {
                action: request.kind().action(),
                body,
            });
        }
        Ok(match parse_flag(answer) {
            Some(true) => PriorityVerdict::Accepted,
            Some(false) => PriorityVerdict::Rejected(None),
            None => PriorityVerdict::Rejected(Some(answer.to_string())),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PriorityVerdict {
    Accepted,
    /// Rejected, optionally naming the tier the authority will apply.
    Rejected(Option<String>),
}

fn log_step(missive_id: &str, kind: CheckKind, passed: bool) {
    let result = if passed { "OK" } else { "KO" };
    info!(missive_id, check = kind.label(), result, "verification step");
}

/// Strips surrounding whitespace and one pair of JSON double quotes.
fn unquote(body: &str) -> &str {
    let trimmed = body.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn parse_flag(body: &str) -> Option<bool> {
    let answer = unquote(body);
    if answer.eq_ignore_ascii_case("true") {
        Some(true)
    } else if answer.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("validation authority gave an unexpected answer to {action}: {body:?}")]
    MalformedResponse { action: &'static str, body: String },
}
