//! Full sweeps over paginated registry queries

use super::{Bundle, FetchError, QueryFilter, RemoteClient};
use crate::domain::resource::ResourceKind;

/// Fetches every page of a query
///
/// The total reported by the first page bounds the sweep: pages are requested
/// at `0, page_size, 2 * page_size, ...` while the offset is below that total.
/// An empty page ends the sweep early so a shrinking collection cannot loop.
pub async fn fetch_all_pages(
    client: &dyn RemoteClient,
    kind: ResourceKind,
    filter: &QueryFilter,
    page_size: usize,
) -> Result<Vec<Bundle>, FetchError> {
    let page_size = page_size.max(1);

    let first = client.query(kind, filter, 0, page_size).await?;
    let total = first.total_results;
    let mut exhausted = first.is_empty();
    let mut pages = vec![first];
    let mut offset = page_size;

    while !exhausted && offset < total {
        let page = client.query(kind, filter, offset, page_size).await?;
        exhausted = page.is_empty();

        if !exhausted {
            pages.push(page);
        }

        offset += page_size;
    }

    Ok(pages)
}
