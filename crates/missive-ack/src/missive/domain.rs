use crate::document::{child_elements, element_text, XmlDocument};

pub const MISSIVE_ID_TAG: &str = "sem:MsvId";
pub const RECEIVER_TAG: &str = "sem:Rcv";
pub const SENDER_TAG: &str = "sem:Snd";
pub const SEND_TIMESTAMP_TAG: &str = "sem:SndDtTm";
pub const PRIORITY_TAG: &str = "sem:MsvPri";

/// BIC plus the account identifier (IBAN or QXBAN) of one missive party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyIdentity {
    pub bic: String,
    pub iban: String,
}

impl PartyIdentity {
    pub fn new(bic: impl Into<String>, iban: impl Into<String>) -> Self {
        Self {
            bic: bic.into(),
            iban: iban.into(),
        }
    }
}

/// Fields of a nominal missive consumed by verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Missive {
    id: Option<String>,
    receiver: PartyIdentity,
    sender: PartyIdentity,
    send_timestamp: String,
    priority: String,
}

impl Missive {
    pub fn new(
        id: Option<String>,
        receiver: PartyIdentity,
        sender: PartyIdentity,
        send_timestamp: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            id,
            receiver,
            sender,
            send_timestamp: send_timestamp.into(),
            priority: priority.into(),
        }
    }

    /// Extracts the verification fields. Party blocks carry the BIC as their
    /// first element child and the account identifier as the second.
    pub fn from_document(document: &XmlDocument) -> Result<Self, MissiveError> {
        let receiver = party(document, RECEIVER_TAG)?;
        let sender = party(document, SENDER_TAG)?;
        let send_timestamp = document
            .first_text(SEND_TIMESTAMP_TAG)
            .ok_or(MissiveError::MissingField(SEND_TIMESTAMP_TAG))?;
        let priority = document
            .first_text(PRIORITY_TAG)
            .ok_or(MissiveError::MissingField(PRIORITY_TAG))?;
        let id = document
            .first_text(MISSIVE_ID_TAG)
            .filter(|value| !value.is_empty());

        Ok(Self {
            id,
            receiver,
            sender,
            send_timestamp,
            priority,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn receiver(&self) -> &PartyIdentity {
        &self.receiver
    }

    pub fn sender(&self) -> &PartyIdentity {
        &self.sender
    }

    pub fn send_timestamp(&self) -> &str {
        &self.send_timestamp
    }

    pub fn priority(&self) -> &str {
        &self.priority
    }
}

fn party(document: &XmlDocument, tag: &'static str) -> Result<PartyIdentity, MissiveError> {
    let element = document
        .find(tag)
        .ok_or(MissiveError::MissingField(tag))?;
    let mut children = child_elements(element);
    match (children.next(), children.next()) {
        (Some(bic), Some(iban)) => Ok(PartyIdentity::new(element_text(bic), element_text(iban))),
        _ => Err(MissiveError::IncompleteParty(tag)),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MissiveError {
    #[error("missive is missing required element {0}")]
    MissingField(&'static str),
    #[error("{0} must contain a BIC and an account identifier")]
    IncompleteParty(&'static str),
}
