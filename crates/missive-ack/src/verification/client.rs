use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::config::AuthorityConfig;
use crate::missive::PartyIdentity;

/// Individual check offered by the validation authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Receiver,
    Sender,
    DateWellFormed,
    DateFresh,
    Priority,
}

impl CheckKind {
    /// Value of the `action` query parameter.
    pub fn action(self) -> &'static str {
        match self {
            Self::Receiver => "verify_receiver",
            Self::Sender => "verify_sender",
            Self::DateWellFormed => "verify_date_correct",
            Self::DateFresh => "verify_date_passed",
            Self::Priority => "verify_priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Receiver => "receiver",
            Self::Sender => "sender",
            Self::DateWellFormed => "date_wellformed",
            Self::DateFresh => "date_fresh",
            Self::Priority => "priority",
        }
    }
}

/// One check plus its raw parameter values. Encoding happens on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    kind: CheckKind,
    params: Vec<(&'static str, String)>,
}

impl CheckRequest {
    pub fn receiver(party: &PartyIdentity) -> Self {
        Self::new(
            CheckKind::Receiver,
            vec![
                ("receiverBIC", party.bic.clone()),
                ("receiverIBAN", party.iban.clone()),
            ],
        )
    }

    pub fn sender(party: &PartyIdentity) -> Self {
        Self::new(
            CheckKind::Sender,
            vec![
                ("senderBIC", party.bic.clone()),
                ("senderIBAN", party.iban.clone()),
            ],
        )
    }

    pub fn date_well_formed(date: &str) -> Self {
        Self::new(CheckKind::DateWellFormed, vec![("date", date.to_string())])
    }

    pub fn date_fresh(date: &str) -> Self {
        Self::new(CheckKind::DateFresh, vec![("date", date.to_string())])
    }

    pub fn priority(priority: &str) -> Self {
        Self::new(CheckKind::Priority, vec![("priority", priority.to_string())])
    }

    fn new(kind: CheckKind, params: Vec<(&'static str, String)>) -> Self {
        Self { kind, params }
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Synchronous RPC to the validation authority. Returns the raw answer; the
/// verifier owns its interpretation.
pub trait VerificationClient: Send + Sync {
    fn check(&self, request: &CheckRequest) -> Result<String, ClientError>;
}

impl<T: VerificationClient + ?Sized> VerificationClient for Arc<T> {
    fn check(&self, request: &CheckRequest) -> Result<String, ClientError> {
        (**self).check(request)
    }
}

impl<T: VerificationClient + ?Sized> VerificationClient for Box<T> {
    fn check(&self, request: &CheckRequest) -> Result<String, ClientError> {
        (**self).check(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("validation authority url is not configured")]
    AuthorityUnavailable,
    #[error("validation authority url '{url}' is invalid: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("unable to build validation authority client: {0}")]
    Setup(String),
    #[error("validation authority call {action} failed: {reason}")]
    Communication {
        action: &'static str,
        reason: String,
    },
    #[error("validation authority answered {action} with HTTP {status}")]
    Status { action: &'static str, status: u16 },
}

/// Blocking HTTP client bounded by the configured connect and request
/// timeouts.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    endpoint: Option<Url>,
    http: Client,
}

impl HttpVerificationClient {
    /// A missing URL is not an error here: every check then fails with
    /// [`ClientError::AuthorityUnavailable`], so ineligible missives still run.
    pub fn from_config(config: &AuthorityConfig) -> Result<Self, ClientError> {
        let endpoint = config
            .url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|err| ClientError::InvalidEndpoint {
                    url: raw.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("missive-ack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClientError::Setup(err.to_string()))?;

        Ok(Self { endpoint, http })
    }
}

impl VerificationClient for HttpVerificationClient {
    fn check(&self, request: &CheckRequest) -> Result<String, ClientError> {
        let action = request.kind().action();
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(ClientError::AuthorityUnavailable)?;

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(request.params().len() + 1);
        query.push(("action", action));
        query.extend(
            request
                .params()
                .iter()
                .map(|(key, value)| (*key, value.as_str())),
        );

        debug!(action, %endpoint, "querying validation authority");
        let response = self
            .http
            .get(endpoint.clone())
            .query(&query)
            .send()
            .map_err(|err| ClientError::Communication {
                action,
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                action,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|err| ClientError::Communication {
            action,
            reason: err.to_string(),
        })?;

        Ok(body.lines().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn authority(url: Option<&str>) -> AuthorityConfig {
        AuthorityConfig {
            url: url.map(str::to_string),
            request_timeout: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn requests_carry_wire_parameter_names() {
        let party = PartyIdentity::new("BICVERT1XXX", "QX12 0000");
        let receiver = CheckRequest::receiver(&party);
        assert_eq!(receiver.kind().action(), "verify_receiver");
        assert_eq!(receiver.param("receiverBIC"), Some("BICVERT1XXX"));
        assert_eq!(receiver.param("receiverIBAN"), Some("QX12 0000"));

        let sender = CheckRequest::sender(&party);
        assert_eq!(sender.kind().action(), "verify_sender");
        assert_eq!(sender.param("senderBIC"), Some("BICVERT1XXX"));

        assert_eq!(
            CheckRequest::date_fresh("2026-01-01T00:00:00+01:00").param("date"),
            Some("2026-01-01T00:00:00+01:00")
        );
        assert_eq!(
            CheckRequest::priority("HIGH").kind().action(),
            "verify_priority"
        );
    }

    #[test]
    fn missing_endpoint_fails_every_check() {
        let client = HttpVerificationClient::from_config(&authority(None)).expect("client builds");
        let result = client.check(&CheckRequest::priority("NORMAL"));
        assert_eq!(result, Err(ClientError::AuthorityUnavailable));
    }

    #[test]
    fn invalid_endpoint_is_rejected_up_front() {
        let result = HttpVerificationClient::from_config(&authority(Some("not a url")));
        assert!(matches!(result, Err(ClientError::InvalidEndpoint { .. })));
    }

    #[test]
    fn unreachable_authority_is_a_communication_error() {
        let client = HttpVerificationClient::from_config(&authority(Some("http://127.0.0.1:9/ws")))
            .expect("client builds");
        let result = client.check(&CheckRequest::date_well_formed("2026-01-01T00:00:00Z"));
        assert!(matches!(
            result,
            Err(ClientError::Communication {
                action: "verify_date_correct",
                ..
            })
        ));
    }
}
