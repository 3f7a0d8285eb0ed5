use serde::Serialize;
use std::fmt;

/// Three-part acknowledgement classification. The triple is opaque: only the
/// named constants are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReturnCode {
    pub class: u8,
    pub subclass: u8,
    pub detail: u8,
}

impl ReturnCode {
    pub const RECEIVER_REJECTED: Self = Self::new(4, 2, 4);
    pub const SENDER_REJECTED: Self = Self::new(4, 2, 5);
    pub const SEND_DATE_MALFORMED: Self = Self::new(4, 3, 3);
    pub const ACCEPTED: Self = Self::new(2, 1, 9);

    pub const fn new(class: u8, subclass: u8, detail: u8) -> Self {
        Self {
            class,
            subclass,
            detail,
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.class, self.subclass, self.detail)
    }
}

pub const STALE_TIMESTAMP_CODE: &str = "BAD_TIME";
pub const STALE_TIMESTAMP_DESCRIPTION: &str = "timestamp SndDtTm (missive id #MsvId) is greater \
than the datetime of receipt server ; the difference is #n milliseconds";

/// Non-rejecting diagnostic attached to an accepted missive. Descriptions keep
/// their `#MsvId` / `#n` placeholders verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingWarning {
    code: String,
    description: String,
}

impl RoutingWarning {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn stale_timestamp() -> Self {
        Self::new(STALE_TIMESTAMP_CODE, STALE_TIMESTAMP_DESCRIPTION)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Priority tier the authority may downgrade a missive to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityLevel {
    Highest,
    High,
    Normal,
    Low,
    Lowest,
}

struct PriorityWarning {
    level: PriorityLevel,
    label: &'static str,
    code: &'static str,
    description: &'static str,
}

static PRIORITY_WARNINGS: [PriorityWarning; 5] = [
    PriorityWarning {
        level: PriorityLevel::Highest,
        label: "HIGHEST",
        code: "PRI_HIGHEST",
        description: "missive will be handled with \"HIGHEST\" priority only",
    },
    PriorityWarning {
        level: PriorityLevel::High,
        label: "HIGH",
        code: "PRI_HIGH",
        description: "missive will be handled with \"HIGH\" priority only",
    },
    PriorityWarning {
        level: PriorityLevel::Normal,
        label: "NORMAL",
        code: "PRI_NORM",
        description: "missive will be handled with \"NORMAL\" priority only",
    },
    PriorityWarning {
        level: PriorityLevel::Low,
        label: "LOW",
        code: "PRI_LOW",
        description: "missive will be handled with \"LOW\" priority only",
    },
    PriorityWarning {
        level: PriorityLevel::Lowest,
        label: "LOWEST",
        code: "PRI_LOWEST",
        description: "missive will be handled with \"LOWEST\" priority only",
    },
];

impl PriorityLevel {
    /// Exact, case-sensitive match on the authority's tier labels.
    pub fn from_label(label: &str) -> Option<Self> {
        PRIORITY_WARNINGS
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.level)
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn warning(self) -> RoutingWarning {
        let entry = self.entry();
        RoutingWarning::new(entry.code, entry.description)
    }

    fn entry(self) -> &'static PriorityWarning {
        let row = match self {
            Self::Highest => 0,
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
            Self::Lowest => 4,
        };
        &PRIORITY_WARNINGS[row]
    }
}

/// Result of verifying one missive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub accepted: bool,
    pub return_code: Option<ReturnCode>,
    pub warning: Option<RoutingWarning>,
}

impl VerificationOutcome {
    pub fn rejected(return_code: ReturnCode) -> Self {
        Self {
            accepted: false,
            return_code: Some(return_code),
            warning: None,
        }
    }

    pub fn accepted(warning: Option<RoutingWarning>) -> Self {
        Self {
            accepted: true,
            return_code: Some(ReturnCode::ACCEPTED),
            warning,
        }
    }

    pub fn summary(&self) -> String {
        let verdict = if self.accepted { "accepted" } else { "rejected" };
        let code = self
            .return_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string());
        match &self.warning {
            Some(warning) => format!("{verdict} ({code}) with warning {}", warning.code()),
            None => format!("{verdict} ({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_table_maps_every_label() {
        let expected = [
            ("HIGHEST", "PRI_HIGHEST"),
            ("HIGH", "PRI_HIGH"),
            ("NORMAL", "PRI_NORM"),
            ("LOW", "PRI_LOW"),
            ("LOWEST", "PRI_LOWEST"),
        ];
        for (label, code) in expected {
            let level = PriorityLevel::from_label(label).expect("known label");
            assert_eq!(level.label(), label);
            let warning = level.warning();
            assert_eq!(warning.code(), code);
            assert_eq!(
                warning.description(),
                format!("missive will be handled with \"{label}\" priority only")
            );
        }
    }

    #[test]
    fn unknown_priority_labels_have_no_level() {
        assert_eq!(PriorityLevel::from_label("URGENT"), None);
        assert_eq!(PriorityLevel::from_label("low"), None);
        assert_eq!(PriorityLevel::from_label(""), None);
    }

    #[test]
    fn stale_timestamp_keeps_placeholders() {
        let warning = RoutingWarning::stale_timestamp();
        assert_eq!(warning.code(), "BAD_TIME");
        assert!(warning.description().contains("#MsvId"));
        assert!(warning.description().contains("#n milliseconds"));
    }

    #[test]
    fn outcome_serializes_as_flat_record() {
        let outcome = VerificationOutcome::accepted(Some(PriorityLevel::Normal.warning()));
        let record = serde_json::to_value(&outcome).expect("outcome serializes");
        assert_eq!(record["accepted"], true);
        assert_eq!(
            record["return_code"],
            serde_json::json!({ "class": 2, "subclass": 1, "detail": 9 })
        );
        assert_eq!(record["warning"]["code"], "PRI_NORM");

        let rejected = serde_json::to_value(VerificationOutcome::rejected(
            ReturnCode::RECEIVER_REJECTED,
        ))
        .expect("outcome serializes");
        assert!(rejected["warning"].is_null());
    }

    #[test]
    fn summary_describes_outcomes() {
        assert_eq!(
            VerificationOutcome::rejected(ReturnCode::SENDER_REJECTED).summary(),
            "rejected (4-2-5)"
        );
        assert_eq!(
            VerificationOutcome::accepted(Some(PriorityLevel::Low.warning())).summary(),
            "accepted (2-1-9) with warning PRI_LOW"
        );
    }
}
