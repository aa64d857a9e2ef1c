use futures::future::try_join_all;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::wire::{DetailRecord, ListingEntry, ListingPage};
use crate::client::CatalogClient;
use crate::config::{normalize, Config};
use crate::item::CatalogItem;
use crate::{PokedexError, Result};

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));
const LISTING_ENDPOINT: &str = "pokemon";

/// [`CatalogClient`] talking HTTP/JSON to the remote catalog API.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// The base URL is normalized to end with `/` whatever way the
    /// configuration was built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: normalize(config.api_base_url.clone())?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `url` and decode its JSON body. `Ok(None)` on 404, any other
    /// non-success status is a network error.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>> {
        log::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PokedexError::Network(format!(
                "{url} responded with {status}"
            )));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| PokedexError::Parse(format!("{url}: {e}")))
    }

    async fn fetch_listed(&self, entry: ListingEntry) -> Result<CatalogItem> {
        let url = self.base_url.join(&entry.url)?;
        let record: DetailRecord =
            self.get_json(&url).await?.ok_or_else(|| {
                PokedexError::Network(format!("{url} responded with 404"))
            })?;
        Ok(record.into_item(Some(entry.name)))
    }
}

impl CatalogClient for HttpCatalogClient {
    async fn fetch_catalog_page(&self, limit: u32) -> Result<Vec<CatalogItem>> {
        let mut url = self.base_url.join(LISTING_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let page: ListingPage = self.get_json(&url).await?.ok_or_else(|| {
            PokedexError::Network(format!("{url} responded with 404"))
        })?;
        log::debug!(
            "listing has {} entries, fetching details",
            page.results.len()
        );

        // Details are fetched concurrently, `try_join_all` keeps the
        // listing order and bails out on the first failure.
        let items = try_join_all(
            page.results
                .into_iter()
                .map(|entry| self.fetch_listed(entry)),
        )
        .await?;
        log::info!("fetched {} catalog items", items.len());
        Ok(items)
    }

    async fn fetch_item_by_id(&self, id: u32) -> Result<CatalogItem> {
        let url = self
            .base_url
            .join(&format!("{LISTING_ENDPOINT}/{id}"))?;
        let record: DetailRecord = self
            .get_json(&url)
            .await?
            .ok_or(PokedexError::NotFound(id))?;
        Ok(record.into_item(None))
    }
}
