use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MnemosError;

/// Kind of association between two memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Association,
    Temporal,
    Causal,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Association => "association",
            Self::Temporal => "temporal",
            Self::Causal => "causal",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = MnemosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "association" => Ok(Self::Association),
            "temporal" => Ok(Self::Temporal),
            "causal" => Ok(Self::Causal),
            other => Err(MnemosError::validation(
                "link_type",
                format!("unknown link type '{other}'"),
            )),
        }
    }
}

/// One directed row of a symmetric link pair.
///
/// Storage always holds the reverse row `(target_id, source_id)` with the
/// same strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryLink {
    pub source_id: String,
    pub target_id: String,
    pub strength: f64,
    pub link_type: LinkType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemoryLink {
    pub fn reversed(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
            ..self.clone()
        }
    }
}
