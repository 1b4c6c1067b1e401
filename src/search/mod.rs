//! Search-and-paginate pipeline shared by every collection.
//!
//! A raw query is split into pagination options, hard conditions evaluated
//! by the [`DocumentStore`], and soft filters applied in memory to the
//! store's result. The filtered sequence is then paginated.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::search::Collection;
use crate::domain::types::TypeConstraintError;
use crate::pagination::PageData;
use crate::repository::DocumentStore;
use crate::repository::errors::RepositoryError;

pub mod matching;
pub mod request;

pub use matching::{Field, SoftFilter, lookup, normalize};
pub use request::{ConstantQuery, RawQuery, SearchRequest};

#[derive(Debug, Error)]
pub enum SearchError {
    /// The query itself is malformed.
    #[error("{0}")]
    Validation(String),
    /// The store refused or failed to evaluate the hard conditions.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl From<TypeConstraintError> for SearchError {
    fn from(err: TypeConstraintError) -> Self {
        SearchError::Validation(err.to_string())
    }
}

pub type SearchResult<T> = Result<T, SearchError>;

/// One page of matching documents together with its pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub data: Vec<Value>,
    pub page_data: PageData,
}

/// Parses `raw` and runs it against `collection`.
pub fn search<S>(store: &S, collection: Collection, raw: RawQuery) -> SearchResult<PageResult>
where
    S: DocumentStore + ?Sized,
{
    let request = SearchRequest::from_raw(raw)?;
    execute(store, collection, &request)
}

/// Runs an already parsed request.
///
/// The store sees only the hard conditions. Soft filters and pagination are
/// applied to whatever it returns, so `totalItems` counts records that passed
/// both.
pub fn execute<S>(
    store: &S,
    collection: Collection,
    request: &SearchRequest,
) -> SearchResult<PageResult>
where
    S: DocumentStore + ?Sized,
{
    let documents = store
        .find_documents(collection, &request.hard_query())
        .map_err(|err| {
            log::error!("Failed to query {collection}: {err}");
            err
        })?;
    let fetched = documents.len();

    let matched = matching::apply_filters(documents, &request.filters);
    let page_data = PageData::new(matched.len(), request.page.page_no, request.page.size);
    let range = page_data.range();

    log::debug!(
        "Search over {collection}: {fetched} fetched, {} matched, returning {}..{}",
        matched.len(),
        range.start,
        range.end
    );

    let data = matched
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();

    Ok(PageResult { data, page_data })
}
