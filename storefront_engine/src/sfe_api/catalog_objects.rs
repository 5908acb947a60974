use rsg_common::Vnd;
use serde::{Deserialize, Serialize};

/// The closed set of fields that a category edit may touch. Unknown fields are rejected at
/// deserialisation time rather than merged blindly into the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryUpdate {
    pub new_name: Option<String>,
    pub new_name_en: Option<String>,
    pub new_description: Option<String>,
    pub new_image: Option<String>,
    /// Requesting a new position triggers the swap reassignment described in
    /// [`crate::traits::CatalogManagement::update_category`].
    pub new_order: Option<i64>,
}

impl CategoryUpdate {
    pub fn is_empty(&self) -> bool {
        !self.has_field_changes() && self.new_order.is_none()
    }

    /// True when any field other than the position is being changed.
    pub fn has_field_changes(&self) -> bool {
        self.new_name.is_some() ||
            self.new_name_en.is_some() ||
            self.new_description.is_some() ||
            self.new_image.is_some()
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.new_order = Some(order);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.new_name = Some(name.into());
        self
    }
}

/// One entry of a bulk (drag-and-drop) reorder request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: i64,
    #[serde(rename = "order")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub new_name: Option<String>,
    pub new_name_en: Option<String>,
    pub new_description: Option<String>,
    pub new_image: Option<String>,
    pub new_category_id: Option<i64>,
    pub new_price: Option<Vnd>,
    pub new_featured: Option<bool>,
    pub new_available: Option<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none() &&
            self.new_name_en.is_none() &&
            self.new_description.is_none() &&
            self.new_image.is_none() &&
            self.new_category_id.is_none() &&
            self.new_price.is_none() &&
            self.new_featured.is_none() &&
            self.new_available.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductQueryFilter {
    pub category_id: Option<i64>,
    pub featured: Option<bool>,
    /// Unavailable products are hidden unless this is set.
    #[serde(default)]
    pub include_unavailable: bool,
    /// Case-insensitive substring match over names and descriptions.
    pub search: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductQueryFilter {
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = Some(term.into());
        self
    }
}
