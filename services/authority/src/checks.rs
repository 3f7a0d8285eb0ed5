use crate::registry::Registry;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// How far into the future a send timestamp may lie and still be correct.
const CLOCK_SKEW_SECS: i64 = 3;
const QXBAN_LEN: usize = 34;

pub fn receiver_valid(registry: &Registry, bic: &str, iban: &str) -> bool {
    registry.accepts_receiver_bic(bic) && registry.accepts_receiver_iban(iban)
}

pub fn sender_valid(registry: &Registry, bic: &str, iban: &str) -> bool {
    registry.accepts_sender_bic(bic) && is_valid_qxban(iban, bic) && !registry.is_blacklisted(iban)
}

/// `QX`, two check digits, the issuing BIC (8-character BICs padded with
/// `XXX`) and an uppercase alphanumeric account part, 34 characters in all.
pub fn is_valid_qxban(qxban: &str, bic: &str) -> bool {
    let qxban = qxban.trim();
    if qxban.len() != QXBAN_LEN {
        return false;
    }
    let bic = if bic.len() == 8 {
        format!("{bic}XXX")
    } else {
        bic.to_string()
    };
    if bic.len() != 11 {
        return false;
    }

    let bytes = qxban.as_bytes();
    bytes.starts_with(b"QX")
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && &bytes[4..15] == bic.as_bytes()
        && bytes[15..]
            .iter()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
}

/// RFC 3339, or a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
pub fn parse_send_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn date_correct(raw: &str, now: DateTime<Utc>) -> bool {
    parse_send_date(raw)
        .map(|sent| sent <= now + Duration::seconds(CLOCK_SKEW_SECS))
        .unwrap_or(false)
}

pub fn date_passed(raw: &str, now: DateTime<Utc>) -> bool {
    parse_send_date(raw)
        .map(|sent| sent < now)
        .unwrap_or(false)
}

/// `true` for a listed priority, otherwise the tier the missive is demoted to.
pub fn priority_answer(registry: &Registry, priority: &str) -> String {
    if registry.accepts_priority(priority) {
        "true".to_string()
    } else {
        registry.default_priority().to_string()
    }
}
