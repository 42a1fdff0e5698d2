use serde::{Deserialize, Serialize};

/// What `store` did with the new content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StoreOutcome {
    Created { id: String },
    /// A near-duplicate already existed and was reinforced instead.
    Reinforced { id: String, similarity: f64 },
}

impl StoreOutcome {
    /// Id of the memory that now holds the content.
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id } | Self::Reinforced { id, .. } => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}
