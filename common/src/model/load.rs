use serde::{Deserialize, Serialize};

/// Progress of an asynchronous fetch that feeds the filter state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    /// Waiting for the request with this id.
    Loading(u64),
    Loaded,
    /// The fetch failed; the message is for display only.
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading(_))
    }
}
