use serde::{Deserialize, Serialize};

/// Badge color used for categories without a dedicated one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#68A085";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("fire", "#FF6B47"),
    ("water", "#4A90E2"),
    ("grass", "#7ED321"),
    ("electric", "#F5A623"),
    ("psychic", "#BD10E0"),
    ("ice", "#50E3C2"),
    ("dragon", "#7B68EE"),
    ("dark", "#2C2C54"),
    ("fairy", "#FFB3BA"),
    ("fighting", "#D0021B"),
    ("poison", "#B013C4"),
    ("ground", "#F8E71C"),
    ("flying", "#87CEEB"),
    ("bug", "#9ACD32"),
    ("rock", "#8B4513"),
    ("ghost", "#9C88FF"),
    ("steel", "#B0C4DE"),
    ("normal", "#A8A878"),
];

/// A single catalog entry, as assembled from the listing and its detail
/// record. Never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u32,
    pub display_name: String,
    pub image_uri: String,
    pub categories: Vec<String>,
}

impl CatalogItem {
    /// Display name with its first letter upper-cased, `"bulbasaur"`
    /// becomes `"Bulbasaur"`.
    pub fn title(&self) -> String {
        let mut chars = self.display_name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Catalog number padded to three digits, e.g. `#007`.
    pub fn number(&self) -> String {
        format!("#{:03}", self.id)
    }

    /// Case-insensitive substring match on the display name. `needle` is
    /// expected to be lower-cased already.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
    }
}

/// Badge color of a category. Lookup is exact: category names come
/// lower-cased from the remote catalog.
pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}
