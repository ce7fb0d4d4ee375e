//! Filter cascade state.
//!
//! `FilterState` holds the user's selection next to the option lists it was
//! validated against. The phase is derived from the selection rather than
//! stored, so the two can never disagree.

use crate::catalog::IndicatorOption;
use crate::model::load::LoadStatus;
use serde::{Deserialize, Serialize};

/// What the user has picked so far. Every level is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub area: Option<String>,
    pub indicator_id: Option<String>,
    pub source: Option<String>,
    pub territory: Option<String>,
}

/// How far down the cascade the selection reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPhase {
    Empty,
    AreaSelected,
    IndicatorSelected,
    SourceResolved,
    TerritoryResolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub selection: FilterSelection,
    pub indicator_options: Vec<IndicatorOption>,
    pub source_options: Vec<String>,
    pub territory_options: Vec<String>,
    /// Progress of the territory discovery fetch.
    pub territories: LoadStatus,
    /// Set once the selected indicator resolves to a concrete sheet.
    pub source_resolved: bool,
    #[serde(skip)]
    pub(crate) last_request: u64,
}

impl FilterState {
    pub fn phase(&self) -> FilterPhase {
        let s = &self.selection;
        if s.indicator_id.is_some() && self.source_resolved && s.territory.is_some() {
            FilterPhase::TerritoryResolved
        } else if s.indicator_id.is_some() && self.source_resolved {
            FilterPhase::SourceResolved
        } else if s.indicator_id.is_some() {
            FilterPhase::IndicatorSelected
        } else if s.area.is_some() {
            FilterPhase::AreaSelected
        } else {
            FilterPhase::Empty
        }
    }

    /// A state with a territory pre-selected, kept until the options prove it invalid.
    pub fn with_default_territory(territory: &str) -> Self {
        let mut state = Self::default();
        if !territory.trim().is_empty() {
            state.selection.territory = Some(territory.trim().to_string());
        }
        state
    }
}
