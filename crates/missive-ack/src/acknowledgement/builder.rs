use crate::document::XmlDocument;
use crate::verification::{ReturnCode, RoutingWarning, VerificationOutcome};

pub const STATUS_TAG: &str = "sem:AcqSta";
pub const CLASS_TAG: &str = "sem:AcqCla";
pub const SUBCLASS_TAG: &str = "sem:AcqSub";
pub const DETAIL_TAG: &str = "sem:AcqDet";
pub const WARNING_CODE_TAG: &str = "sem:Code";
pub const WARNING_DESCRIPTION_TAG: &str = "sem:Descr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcknowledgementStatus {
    Ack,
    Nack,
}

impl AcknowledgementStatus {
    pub fn from_outcome(outcome: &VerificationOutcome) -> Self {
        if outcome.accepted {
            Self::Ack
        } else {
            Self::Nack
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ack => "ACK",
            Self::Nack => "NACK",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACK" => Some(Self::Ack),
            "NACK" => Some(Self::Nack),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("acknowledgement template has no {0} element")]
    MissingTag(&'static str),
}

/// Writes `outcome` into an acknowledgement shell. Return-code tags are only
/// touched when the outcome carries a code, warning tags only when it carries
/// a warning; whatever the template holds there otherwise is left alone.
pub fn populate(
    template: XmlDocument,
    outcome: &VerificationOutcome,
) -> Result<XmlDocument, BuildError> {
    let mut document = template;
    let status = AcknowledgementStatus::from_outcome(outcome);
    write(&mut document, STATUS_TAG, status.as_str())?;

    if let Some(code) = outcome.return_code {
        write(&mut document, CLASS_TAG, &code.class.to_string())?;
        write(&mut document, SUBCLASS_TAG, &code.subclass.to_string())?;
        write(&mut document, DETAIL_TAG, &code.detail.to_string())?;
    }

    if let Some(warning) = &outcome.warning {
        write(&mut document, WARNING_CODE_TAG, warning.code())?;
        write(&mut document, WARNING_DESCRIPTION_TAG, warning.description())?;
    }

    Ok(document)
}

fn write(document: &mut XmlDocument, tag: &'static str, value: &str) -> Result<(), BuildError> {
    if document.set_text(tag, value) {
        Ok(())
    } else {
        Err(BuildError::MissingTag(tag))
    }
}

/// Values read back from a populated acknowledgement. Empty or unparseable
/// tags read as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub status: Option<AcknowledgementStatus>,
    pub return_code: Option<ReturnCode>,
    pub warning: Option<RoutingWarning>,
}

impl Acknowledgement {
    pub fn read(document: &XmlDocument) -> Self {
        let status = document
            .first_text(STATUS_TAG)
            .and_then(|value| AcknowledgementStatus::parse(&value));

        let number = |tag: &str| {
            document
                .first_text(tag)
                .and_then(|value| value.parse::<u8>().ok())
        };
        let return_code = match (number(CLASS_TAG), number(SUBCLASS_TAG), number(DETAIL_TAG)) {
            (Some(class), Some(subclass), Some(detail)) => {
                Some(ReturnCode::new(class, subclass, detail))
            }
            _ => None,
        };

        let warning = document
            .first_text(WARNING_CODE_TAG)
            .filter(|code| !code.is_empty())
            .map(|code| {
                let description = document
                    .first_text(WARNING_DESCRIPTION_TAG)
                    .unwrap_or_default();
                RoutingWarning::new(code, description)
            });

        Self {
            status,
            return_code,
            warning,
        }
    }
}
