use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Document store backends for gallery documents.
///
/// Defined in core because it is selected through configuration and consumed by the
/// db crate's factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStoreBackend {
    Postgres,
    Memory,
}

impl FromStr for DocumentStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DocumentStoreBackend::Postgres),
            "memory" => Ok(DocumentStoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid document store backend: {}", s)),
        }
    }
}

impl Display for DocumentStoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentStoreBackend::Postgres => write!(f, "postgres"),
            DocumentStoreBackend::Memory => write!(f, "memory"),
        }
    }
}
