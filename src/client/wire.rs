//! Response bodies of the remote catalog API, reduced to the fields
//! the catalog needs.

use serde::Deserialize;

use crate::item::CatalogItem;

#[derive(Debug, Deserialize)]
pub(crate) struct ListingPage {
    pub results: Vec<ListingEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingEntry {
    pub name: String,
    /// Reference to the detail record, absolute or relative to the API root.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sprites {
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedRef {
    pub name: String,
}

impl DetailRecord {
    /// Normalize into a [`CatalogItem`]. `display_name` overrides the
    /// record's own name, the listing is authoritative for it.
    pub fn into_item(self, display_name: Option<String>) -> CatalogItem {
        let image_uri = self
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|artwork| artwork.front_default)
            .unwrap_or_default();
        CatalogItem {
            id: self.id,
            display_name: display_name.unwrap_or(self.name),
            image_uri,
            categories: self
                .types
                .into_iter()
                .map(|slot| slot.kind.name)
                .collect(),
        }
    }
}
