//! Reducer for the filter cascade.
//!
//! Each upper-level change re-validates everything below it against the fresh
//! option lists: a lower value that is no longer offered is cleared, a level
//! with exactly one option is auto-selected. Territory options need a fetch, so
//! the reducer hands back a [`TerritoryRequest`] and later accepts only the
//! answer carrying the id of the most recent request.

use super::messages::{FilterEvent, TerritoryRequest};
use super::state::FilterState;
use crate::catalog::Catalog;
use crate::model::load::LoadStatus;
use crate::pipeline::parse::normalize_key;
use log::debug;

/// The next state, plus the fetch to run if territory options must be rediscovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: FilterState,
    pub fetch: Option<TerritoryRequest>,
}

impl Transition {
    fn stay(state: FilterState) -> Self {
        Self { state, fetch: None }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applies `event` to `state`.
pub fn update(catalog: &Catalog, mut state: FilterState, event: FilterEvent) -> Transition {
    match event {
        FilterEvent::SelectArea(area) => {
            state.selection.area = non_blank(area);
            state.indicator_options = catalog.indicators(state.selection.area.as_deref());

            let current = state.selection.indicator_id.take();
            let indicator = match current {
                Some(id) if state.indicator_options.iter().any(|o| o.id == id) => Some(id),
                _ if state.indicator_options.len() == 1 => {
                    Some(state.indicator_options[0].id.clone())
                }
                _ => None,
            };
            select_indicator(catalog, state, indicator)
        }
        FilterEvent::SelectIndicator(indicator) => {
            select_indicator(catalog, state, non_blank(indicator))
        }
        FilterEvent::SelectSource(source) => {
            let source = non_blank(source).filter(|s| state.source_options.contains(s));
            if source == state.selection.source && state.source_resolved {
                return Transition::stay(state);
            }
            state.selection.source = source;
            refresh_territories(catalog, state)
        }
        FilterEvent::SelectTerritory(territory) => {
            state.selection.territory = match non_blank(territory) {
                Some(t) if state.territory_options.is_empty() => Some(t),
                Some(t) => {
                    let key = normalize_key(&t);
                    state
                        .territory_options
                        .iter()
                        .find(|o| normalize_key(o) == key)
                        .cloned()
                }
                None => None,
            };
            Transition::stay(state)
        }
        FilterEvent::TerritoriesLoaded {
            request,
            territories,
        } => {
            if state.territories != LoadStatus::Loading(request) {
                debug!("filter: dropping stale territory response {}", request);
                return Transition::stay(state);
            }
            state.territories = LoadStatus::Loaded;
            state.selection.territory =
                reconcile_territory(state.selection.territory.take(), &territories);
            state.territory_options = territories;
            Transition::stay(state)
        }
        FilterEvent::TerritoriesFailed { request, message } => {
            if state.territories != LoadStatus::Loading(request) {
                debug!("filter: dropping stale territory failure {}", request);
                return Transition::stay(state);
            }
            state.territories = LoadStatus::Failed(message);
            state.territory_options.clear();
            Transition::stay(state)
        }
    }
}

/// Sets the indicator and re-derives sources; rediscovers territories when
/// the resolved sheet may have changed.
fn select_indicator(
    catalog: &Catalog,
    mut state: FilterState,
    indicator: Option<String>,
) -> Transition {
    let area = state.selection.area.as_deref();
    let indicator = indicator.filter(|id| match area {
        Some(_) => catalog.indicators(area).iter().any(|o| o.id == *id),
        None => catalog.resolve(id, None).is_some(),
    });
    let changed = indicator != state.selection.indicator_id;
    state.selection.indicator_id = indicator;

    state.source_options = match &state.selection.indicator_id {
        Some(id) => catalog.sources(id),
        None => Vec::new(),
    };
    let previous_source = state.selection.source.take();
    state.selection.source = match previous_source.clone() {
        Some(s) if state.source_options.contains(&s) => Some(s),
        _ if state.source_options.len() == 1 => Some(state.source_options[0].clone()),
        _ => None,
    };

    if !changed && state.selection.source == previous_source && state.source_resolved {
        return Transition::stay(state);
    }
    refresh_territories(catalog, state)
}

/// Starts territory discovery for the current (indicator, source), or resets
/// the territory level when the selection does not pin down a sheet.
fn refresh_territories(catalog: &Catalog, mut state: FilterState) -> Transition {
    state.territory_options.clear();

    let entry = state.selection.indicator_id.as_deref().and_then(|id| {
        let needs_source = !state.source_options.is_empty();
        match state.selection.source.as_deref() {
            Some(source) => catalog.resolve(id, Some(source)),
            None if !needs_source => catalog.resolve(id, None),
            None => None,
        }
    });

    let Some(entry) = entry.cloned() else {
        state.source_resolved = false;
        state.territories = LoadStatus::Idle;
        return Transition::stay(state);
    };

    state.source_resolved = true;
    state.last_request += 1;
    state.territories = LoadStatus::Loading(state.last_request);
    let fetch = Some(TerritoryRequest {
        request: state.last_request,
        entry,
    });
    Transition { state, fetch }
}

/// Keeps a selected territory that is still offered, auto-selects a lone
/// option, clears anything else. An empty option list leaves the selection alone.
fn reconcile_territory(current: Option<String>, options: &[String]) -> Option<String> {
    match options {
        [] => current,
        [only] => Some(only.clone()),
        _ => current.filter(|c| {
            let key = normalize_key(c);
            options.iter().any(|o| normalize_key(o) == key)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPhase;
    use crate::model::sheet::sheet_from_strings;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::from_sheet(&sheet_from_strings(vec![
            vec!["area", "indicador_id", "fonte", "sheet", "range"],
            vec!["Acolhimento", "X", "A", "x_a", "A:E"],
            vec!["Acolhimento", "Y", "B", "y_b", "A:E"],
            vec!["Acolhimento", "Y", "C", "y_c", "A:E"],
            vec!["Adoção", "Z", "", "z", "A:E"],
        ]))
    }

    fn apply(catalog: &Catalog, state: FilterState, event: FilterEvent) -> Transition {
        update(catalog, state, event)
    }

    #[test]
    fn single_source_is_auto_selected_and_cleared_on_indicator_change() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectIndicator(Some("X".into())));
        assert_eq!(t.state.selection.source.as_deref(), Some("A"));
        assert_eq!(t.fetch.as_ref().map(|f| f.entry.sheet_name.as_str()), Some("x_a"));

        let t = apply(&catalog, t.state, FilterEvent::SelectIndicator(Some("Y".into())));
        assert_eq!(t.state.selection.source, None);
        assert_eq!(t.state.source_options, vec!["B", "C"]);
        assert!(t.fetch.is_none());
        assert_eq!(t.state.territories, LoadStatus::Idle);
        assert_eq!(t.state.phase(), FilterPhase::IndicatorSelected);
    }

    #[test]
    fn single_indicator_in_area_is_auto_selected() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectArea(Some("Adoção".into())));
        assert_eq!(t.state.selection.indicator_id.as_deref(), Some("Z"));
        assert_eq!(t.state.selection.source, None);
        assert_eq!(t.state.phase(), FilterPhase::SourceResolved);
        assert_eq!(t.fetch.map(|f| f.entry.sheet_name), Some("z".to_string()));
    }

    #[test]
    fn area_change_clears_indicator_from_other_area() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectIndicator(Some("X".into())));
        let t = apply(&catalog, t.state, FilterEvent::SelectArea(Some("Adoção".into())));
        assert_eq!(t.state.selection.indicator_id.as_deref(), Some("Z"));

        let t = apply(&catalog, t.state, FilterEvent::SelectArea(Some("Acolhimento".into())));
        assert_eq!(t.state.selection.indicator_id, None);
        assert_eq!(t.state.indicator_options.len(), 2);
        assert_eq!(t.state.phase(), FilterPhase::AreaSelected);
    }

    #[test]
    fn indicator_outside_the_selected_area_is_rejected() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectArea(Some("Adoção".into())));
        let t = apply(&catalog, t.state, FilterEvent::SelectIndicator(Some("X".into())));
        assert_eq!(t.state.selection.area.as_deref(), Some("Adoção"));
        assert_eq!(t.state.selection.indicator_id, None);
        assert!(t.fetch.is_none());
        assert_eq!(t.state.phase(), FilterPhase::AreaSelected);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectIndicator(Some("Y".into())));
        let t = apply(&catalog, t.state, FilterEvent::SelectSource(Some("A".into())));
        assert_eq!(t.state.selection.source, None);
        let t = apply(&catalog, t.state, FilterEvent::SelectSource(Some("C".into())));
        assert_eq!(t.fetch.map(|f| f.entry.sheet_name), Some("y_c".to_string()));
    }

    #[test]
    fn stale_territory_responses_are_dropped() {
        let catalog = catalog();
        let t = apply(&catalog, FilterState::default(), FilterEvent::SelectIndicator(Some("Y".into())));
        let first = apply(&catalog, t.state, FilterEvent::SelectSource(Some("B".into())));
        let first_id = first.fetch.as_ref().map(|f| f.request).unwrap();
        let second = apply(&catalog, first.state, FilterEvent::SelectSource(Some("C".into())));
        let second_id = second.fetch.as_ref().map(|f| f.request).unwrap();
        assert!(second_id > first_id);

        let late = apply(
            &catalog,
            second.state,
            FilterEvent::TerritoriesLoaded {
                request: first_id,
                territories: vec!["Stale".into()],
            },
        );
        assert!(late.state.territory_options.is_empty());
        assert!(late.state.territories.is_loading());

        let fresh = apply(
            &catalog,
            late.state,
            FilterEvent::TerritoriesLoaded {
                request: second_id,
                territories: vec!["Fresh".into()],
            },
        );
        assert_eq!(fresh.state.territory_options, vec!["Fresh"]);
        assert_eq!(fresh.state.selection.territory.as_deref(), Some("Fresh"));
        assert_eq!(fresh.state.phase(), FilterPhase::TerritoryResolved);
    }

    fn loaded(territories: &[&str], preset: Option<&str>) -> FilterState {
        let catalog = catalog();
        let state = preset.map(FilterState::with_default_territory).unwrap_or_default();
        let t = apply(&catalog, state, FilterEvent::SelectIndicator(Some("X".into())));
        let request = t.fetch.map(|f| f.request).unwrap();
        apply(
            &catalog,
            t.state,
            FilterEvent::TerritoriesLoaded {
                request,
                territories: territories.iter().map(|s| s.to_string()).collect(),
            },
        )
        .state
    }

    #[test]
    fn valid_preset_territory_is_preserved_exactly() {
        let state = loaded(&["Niterói", "RJ"], Some("rj"));
        assert_eq!(state.selection.territory.as_deref(), Some("rj"));
    }

    #[test]
    fn invalid_territory_is_cleared_when_options_arrive() {
        let state = loaded(&["Niterói", "Angra"], Some("RJ"));
        assert_eq!(state.selection.territory, None);
    }

    #[test]
    fn lone_territory_replaces_case_variant() {
        let state = loaded(&["RJ"], Some("rj"));
        assert_eq!(state.selection.territory.as_deref(), Some("RJ"));
    }

    #[test]
    fn failed_discovery_keeps_the_selection_and_empties_options() {
        let catalog = catalog();
        let state = FilterState::with_default_territory("RJ");
        let t = apply(&catalog, state, FilterEvent::SelectIndicator(Some("X".into())));
        let request = t.fetch.map(|f| f.request).unwrap();
        let t = apply(
            &catalog,
            t.state,
            FilterEvent::TerritoriesFailed {
                request,
                message: "timeout".into(),
            },
        );
        assert_eq!(t.state.territories, LoadStatus::Failed("timeout".into()));
        assert!(t.state.territory_options.is_empty());
        assert_eq!(t.state.selection.territory.as_deref(), Some("RJ"));
    }

    #[test]
    fn territory_selection_snaps_to_option_spelling() {
        let state = loaded(&["Niterói", "RJ"], None);
        let t = apply(&catalog(), state, FilterEvent::SelectTerritory(Some("niteroi".into())));
        assert_eq!(t.state.selection.territory.as_deref(), Some("Niterói"));
        let t = apply(&catalog(), t.state, FilterEvent::SelectTerritory(Some("Marte".into())));
        assert_eq!(t.state.selection.territory, None);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: FilterEvent =
            serde_json::from_str(r#"{"type":"select_area","value":"Acolhimento"}"#).unwrap();
        assert_eq!(event, FilterEvent::SelectArea(Some("Acolhimento".into())));
        let event: FilterEvent =
            serde_json::from_str(r#"{"type":"select_source","value":null}"#).unwrap();
        assert_eq!(event, FilterEvent::SelectSource(None));
    }
}
