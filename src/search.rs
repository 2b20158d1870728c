//! Search form redirect target

use crate::error::ApiError;
use reqwest::Url;

/// URL the search form navigates to, or `None` for an empty query
///
/// The query is sent as-is (no trimming), form-encoded into `q`.
pub fn search_url(base: &Url, query: &str) -> Result<Option<Url>, ApiError> {
    if query.is_empty() {
        return Ok(None);
    }

    let mut url = base
        .join("search")
        .map_err(|e| ApiError::InvalidUrl(format!("search: {}", e)))?;
    url.query_pairs_mut().clear().append_pair("q", query);

    Ok(Some(url))
}
