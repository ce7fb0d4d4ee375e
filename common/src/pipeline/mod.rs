//! Raw sheet to chart-ready series, leaves first:
//! [`parse`] → [`decode`] → [`fill`] → [`aggregate`] → [`percent`].

pub mod aggregate;
pub mod decode;
pub mod fill;
pub mod kpi;
pub mod parse;
pub mod percent;
