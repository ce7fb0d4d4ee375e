//! Shared data model and the read-side pipeline of the shelter indicators dashboard.
//!
//! A fetched sheet goes through [`pipeline`]: cell parsing, header-driven
//! decoding, merged-date forward-fill, aggregation and percentage
//! normalization. [`catalog`] maps an indicator to the sheet that holds it and
//! [`filter`] drives the cascading selection that picks which sheet and
//! territory to aggregate. Nothing here performs I/O.

pub mod catalog;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod requests;
