//! Cascading area → indicator → source → territory selection as a pure reducer.
//!
//! The caller owns the state, feeds [`FilterEvent`]s to [`update`] and performs
//! the [`TerritoryRequest`] it may get back, reporting the result as another event.

mod messages;
mod state;
mod update;

pub use messages::{FilterEvent, TerritoryRequest};
pub use state::{FilterPhase, FilterSelection, FilterState};
pub use update::{Transition, update};
