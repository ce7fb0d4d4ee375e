//! HTTP surface of the dashboard.
//!
//! - `/api/sheets`: raw ranges straight from the spreadsheet.
//! - `/api/catalog`: the parsed indicator catalog.
//! - `/api/dashboard`: series, overview and filter sessions built on the pipeline.
//!
//! Responses are never cached: the sheet can be edited at any time.

pub mod catalog;
pub mod dashboard;
pub mod sheets;

use crate::config::Config;
use crate::error::ProxyError;
use crate::source::{SheetSource, SourceError};
use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, HttpResponseBuilder};
use log::warn;
use std::sync::Arc;

/// What every handler needs: where the sheets come from and how to read them.
pub struct AppState {
    /// Google Sheets in production, a CSV directory when `DATA_DIR` is set.
    pub source: Arc<dyn SheetSource>,
    /// Ranges, default territory and the other start-up settings.
    pub config: Config,
}

/// `200 OK` with caching disabled.
pub(crate) fn fresh() -> HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.insert_header(CacheControl(vec![CacheDirective::NoStore]));
    builder
}

/// Splits an upstream result into data and a display message.
///
/// Transport and shape failures become the type's empty value plus the error
/// text; missing configuration still ends the request.
pub(crate) fn degrade<T: Default>(
    result: Result<T, SourceError>,
    what: &str,
) -> Result<(T, Option<String>), ProxyError> {
    match result {
        Ok(value) => Ok((value, None)),
        Err(SourceError::MissingConfig(key)) => Err(ProxyError::MissingConfig(key)),
        Err(e) => {
            warn!("{} unavailable: {}", what, e);
            Ok((T::default(), Some(e.to_string())))
        }
    }
}
