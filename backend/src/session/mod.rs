//! Server-held filter sessions.
//!
//! A session pairs the catalog loaded when it was created with the filter
//! state the client drives through events. Territory discovery runs as a
//! background task that reports back through the updater channel, so a slow
//! sheet never holds the session lock.

pub mod state;
