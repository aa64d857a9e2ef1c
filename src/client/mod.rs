mod http;
mod wire;

pub use http::HttpCatalogClient;

use crate::item::CatalogItem;
use crate::Result;

/// Read-only access to the remote catalog.
///
/// There is no caching: every call goes back to the remote source.
#[allow(async_fn_in_trait)]
pub trait CatalogClient: Send + Sync {
    /// Fetch the first `limit` listed items together with their detail
    /// records, in listing order.
    ///
    /// All or nothing: if the listing or any single detail request fails,
    /// the whole call fails and no partial catalog is returned.
    async fn fetch_catalog_page(&self, limit: u32) -> Result<Vec<CatalogItem>>;

    /// Fetch the detail record of a single item.
    ///
    /// Fails with [`crate::PokedexError::NotFound`] when the remote source
    /// doesn't know `id`.
    async fn fetch_item_by_id(&self, id: u32) -> Result<CatalogItem>;
}
