use serde::Deserialize;

/// Query string of `GET /api/sheets`.
#[derive(Debug, Deserialize)]
pub struct SheetQuery {
    /// A1 notation, e.g. `dados!A1:E200` or a bare sheet name.
    pub range: Option<String>,
}

/// Query string of `GET /api/dashboard/series`.
#[derive(Debug, Deserialize, Default)]
pub struct SeriesQuery {
    pub indicator: String,
    pub source: Option<String>,
    pub territory: Option<String>,
    /// Fixed denominator for the percentage view; the breakdown's own sum when absent.
    pub fixed_total: Option<f64>,
}

/// Query string of `GET /api/dashboard/sessions/{id}/series`; the rest comes from the session.
#[derive(Debug, Deserialize, Default)]
pub struct SessionSeriesQuery {
    pub fixed_total: Option<f64>,
}
