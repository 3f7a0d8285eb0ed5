use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Identifiers and priorities the authority accepts, loaded from `list,value`
/// CSV rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    receiver_bics: HashSet<String>,
    receiver_ibans: HashSet<String>,
    sender_bics: HashSet<String>,
    blacklisted_sender_ibans: HashSet<String>,
    priorities: HashSet<String>,
    default_priority: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unable to open registry {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed registry: {0}")]
    Csv(#[from] csv::Error),
    #[error("registry row {row} names unknown list '{list}'")]
    UnknownList { row: usize, list: String },
    #[error("registry must define exactly one priority_default, found {0}")]
    DefaultPriority(usize),
}

#[derive(Debug, Deserialize)]
struct RegistryRow {
    list: String,
    value: String,
}

impl Registry {
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let file = File::open(path).map_err(|source| RegistryError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        let mut registry = Registry::default();
        let mut defaults = Vec::new();

        for (index, record) in csv_reader.deserialize::<RegistryRow>().enumerate() {
            let row = record?;
            let target = match row.list.as_str() {
                "receiver_bic" => &mut registry.receiver_bics,
                "receiver_iban" => &mut registry.receiver_ibans,
                "sender_bic" => &mut registry.sender_bics,
                "sender_iban_blacklist" => &mut registry.blacklisted_sender_ibans,
                "priority" => &mut registry.priorities,
                "priority_default" => {
                    defaults.push(row.value);
                    continue;
                }
                _ => {
                    return Err(RegistryError::UnknownList {
                        row: index + 1,
                        list: row.list,
                    })
                }
            };
            target.insert(row.value);
        }

        if defaults.len() != 1 {
            return Err(RegistryError::DefaultPriority(defaults.len()));
        }
        registry.default_priority = defaults.remove(0);

        Ok(registry)
    }

    pub fn accepts_receiver_bic(&self, bic: &str) -> bool {
        self.receiver_bics.contains(bic)
    }

    pub fn accepts_receiver_iban(&self, iban: &str) -> bool {
        self.receiver_ibans.contains(iban)
    }

    pub fn accepts_sender_bic(&self, bic: &str) -> bool {
        self.sender_bics.contains(bic)
    }

    pub fn is_blacklisted(&self, iban: &str) -> bool {
        self.blacklisted_sender_ibans.contains(iban)
    }

    pub fn accepts_priority(&self, priority: &str) -> bool {
        self.priorities.contains(priority)
    }

    pub fn default_priority(&self) -> &str {
        &self.default_priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "list,value
# receivers
receiver_bic,BICVERT1XXX
receiver_iban, QX42BICVERT1XXX0000000000000000001
sender_bic,BICROUGEXXX
sender_iban_blacklist,QX07BICROUGEXXX0000000000000000666
priority,HIGH
priority,NORMAL
priority_default,LOW
";

    #[test]
    fn loads_every_list() {
        let registry = Registry::from_reader(SAMPLE.as_bytes()).expect("registry loads");
        assert!(registry.accepts_receiver_bic("BICVERT1XXX"));
        assert!(registry.accepts_receiver_iban("QX42BICVERT1XXX0000000000000000001"));
        assert!(registry.accepts_sender_bic("BICROUGEXXX"));
        assert!(registry.is_blacklisted("QX07BICROUGEXXX0000000000000000666"));
        assert!(registry.accepts_priority("NORMAL"));
        assert!(!registry.accepts_priority("LOW"));
        assert_eq!(registry.default_priority(), "LOW");
    }

    #[test]
    fn rejects_unknown_lists() {
        let err = Registry::from_reader("list,value\npriority_default,LOW\nbanned,X\n".as_bytes())
            .expect_err("unknown list");
        assert!(matches!(err, RegistryError::UnknownList { row: 2, .. }));
    }

    #[test]
    fn requires_a_single_default_priority() {
        let missing = Registry::from_reader("list,value\npriority,HIGH\n".as_bytes());
        assert!(matches!(missing, Err(RegistryError::DefaultPriority(0))));

        let twice = Registry::from_reader(
            "list,value\npriority_default,LOW\npriority_default,LOWEST\n".as_bytes(),
        );
        assert!(matches!(twice, Err(RegistryError::DefaultPriority(2))));
    }
}
