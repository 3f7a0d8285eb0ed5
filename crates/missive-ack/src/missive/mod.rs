//! Inbound missive model and message-type classification.

mod domain;

pub use domain::{
    Missive, MissiveError, PartyIdentity, MISSIVE_ID_TAG, PRIORITY_TAG, RECEIVER_TAG,
    SENDER_TAG, SEND_TIMESTAMP_TAG,
};

use crate::document::XmlDocument;

pub const MESSAGE_TYPE_TAG: &str = "sem:MsvTyp";
pub const NOMINAL_TYPE: &str = "Nominal";

/// Message type carried by `sem:MsvTyp`. Only a type reading exactly
/// `Nominal`, surrounding whitespace included, is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissiveKind {
    Nominal,
    Other(String),
    Untyped,
}

impl MissiveKind {
    pub fn classify(document: &XmlDocument) -> Self {
        let raw = document
            .find(MESSAGE_TYPE_TAG)
            .and_then(|element| element.get_text())
            .map(|text| text.into_owned());
        match raw {
            Some(value) if value == NOMINAL_TYPE => Self::Nominal,
            Some(value) if value.trim().is_empty() => Self::Untyped,
            Some(value) => Self::Other(value),
            None => Self::Untyped,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Nominal)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Nominal => NOMINAL_TYPE,
            Self::Other(value) => value,
            Self::Untyped => "untyped",
        }
    }
}
