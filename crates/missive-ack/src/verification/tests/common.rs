use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::missive::{Missive, PartyIdentity};
use crate::verification::{
    CheckKind, CheckRequest, ClientError, MissiveVerifier, VerificationClient,
};

/// In-memory authority answering from a per-check script and recording every
/// request it receives. Unscripted checks answer `true`.
#[derive(Default)]
pub(super) struct ScriptedClient {
    answers: HashMap<CheckKind, Result<String, ClientError>>,
    requests: Mutex<Vec<CheckRequest>>,
}

impl ScriptedClient {
    pub(super) fn approving() -> Self {
        Self::default()
    }

    pub(super) fn answer(mut self, kind: CheckKind, body: &str) -> Self {
        self.answers.insert(kind, Ok(body.to_string()));
        self
    }

    pub(super) fn fail(mut self, kind: CheckKind, error: ClientError) -> Self {
        self.answers.insert(kind, Err(error));
        self
    }

    pub(super) fn requests(&self) -> Vec<CheckRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub(super) fn calls(&self) -> Vec<CheckKind> {
        self.requests().iter().map(CheckRequest::kind).collect()
    }
}

impl VerificationClient for ScriptedClient {
    fn check(&self, request: &CheckRequest) -> Result<String, ClientError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());
        self.answers
            .get(&request.kind())
            .cloned()
            .unwrap_or_else(|| Ok("true".to_string()))
    }
}

pub(super) fn verifier(
    client: ScriptedClient,
) -> (MissiveVerifier<Arc<ScriptedClient>>, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    (MissiveVerifier::new(client.clone()), client)
}

pub(super) fn nominal_missive() -> Missive {
    Missive::new(
        Some("MSV-2026-0001".to_string()),
        PartyIdentity::new("BICVERT1XXX", "QX42BICVERT1XXX0000000000000000001"),
        PartyIdentity::new("BICROUGEXXX", "QX07BICROUGEXXX0000000000000000042"),
        "2026-10-18T09:30:00+02:00",
        "HIGH",
    )
}

pub(super) const ALL_CHECKS: [CheckKind; 5] = [
    CheckKind::Receiver,
    CheckKind::Sender,
    CheckKind::DateWellFormed,
    CheckKind::DateFresh,
    CheckKind::Priority,
];
