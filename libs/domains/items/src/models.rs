use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Price ordering for listings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

/// Item entity, as stored in the collection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique positive identifier, assigned on creation
    pub id: u64,
    /// Display name, unique across the collection ignoring case
    pub name: String,
    /// Free-form category label
    pub category: String,
    /// Non-negative price
    pub price: f64,
}

/// DTO for creating a new item
///
/// Every field is required; they are optional here only so that a missing
/// field is reported as a validation failure instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateItem {
    #[validate(required, length(min = 3, max = 60))]
    #[schema(min_length = 3, max_length = 60, example = "Laptop Pro")]
    pub name: Option<String>,
    #[validate(required, length(min = 3, max = 60))]
    #[schema(min_length = 3, max_length = 60, example = "Electronics")]
    pub category: Option<String>,
    #[validate(required, range(min = 0.0))]
    #[schema(minimum = 0.0, example = 2499.0)]
    pub price: Option<f64>,
}

impl CreateItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            price: Some(price),
        }
    }
}

/// DTO for partially updating an item
///
/// At least one field must be present. Fields that are absent keep their
/// current value; unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_update_not_empty"))]
pub struct UpdateItem {
    #[validate(length(min = 3, max = 60))]
    #[schema(min_length = 3, max_length = 60)]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 60))]
    #[schema(min_length = 3, max_length = 60)]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(minimum = 0.0)]
    pub price: Option<f64>,
}

impl UpdateItem {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none()
    }
}

fn validate_update_not_empty(update: &UpdateItem) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::new("empty_update")
            .with_message("At least one of name, category or price is required".into()));
    }
    Ok(())
}

/// Listing parameters: search, pagination and ordering
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    /// Case-insensitive substring matched against item names
    pub q: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    #[param(minimum = 1, default = 1)]
    pub page: u32,
    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    #[param(minimum = 1, default = 10)]
    pub limit: u32,
    /// Price ordering; collection order when absent
    pub order: Option<SortOrder>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            q: None,
            page: default_page(),
            limit: default_limit(),
            order: None,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    /// Number of items matching the search, before pagination
    pub total: usize,
    pub page: u32,
    pub total_pages: usize,
    pub limit: u32,
}

/// Aggregate statistics over the whole collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub total: usize,
    /// Mean price; 0 for an empty collection
    pub average_price: f64,
    pub min_price_item: Option<Item>,
    pub max_price_item: Option<Item>,
}

impl Item {
    /// Apply the fields present in a patch
    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
    }

    /// Whether this item's name equals `name` ignoring case
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item_requires_every_field() {
        let errors = CreateItem {
            name: Some("Desk".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        let fields = errors.field_errors();
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_create_item_bounds() {
        assert!(CreateItem::new("abc", "xyz", 0.0).validate().is_ok());
        assert!(CreateItem::new("ab", "xyz", 1.0).validate().is_err());
        assert!(CreateItem::new("abc", "x".repeat(61), 1.0).validate().is_err());
        assert!(CreateItem::new("abc", "xyz", -0.01).validate().is_err());
    }

    #[test]
    fn test_create_item_rejects_unknown_fields() {
        let result: Result<CreateItem, _> = serde_json::from_str(
            r#"{"name":"Desk","category":"Furniture","price":10,"color":"red"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_update_is_invalid() {
        assert!(UpdateItem::default().validate().is_err());

        let update = UpdateItem {
            price: Some(5.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let update = UpdateItem {
            name: Some("no".to_string()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let result: Result<UpdateItem, _> = serde_json::from_str(r#"{"id":7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let mut item = Item {
            id: 1,
            name: "Laptop Pro".to_string(),
            category: "Electronics".to_string(),
            price: 2499.0,
        };
        item.apply_update(UpdateItem {
            price: Some(1999.0),
            ..Default::default()
        });

        assert_eq!(item.name, "Laptop Pro");
        assert_eq!(item.category, "Electronics");
        assert_eq!(item.price, 1999.0);
    }

    #[test]
    fn test_query_defaults() {
        let query: ItemQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.q.is_none());
        assert!(query.order.is_none());
    }

    #[test]
    fn test_query_rejects_zero_page() {
        let query = ItemQuery {
            page: 0,
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_sort_order_wire_names() {
        assert_eq!(SortOrder::PriceAsc.to_string(), "price_asc");
        assert_eq!(
            "price_desc".parse::<SortOrder>().unwrap(),
            SortOrder::PriceDesc
        );
    }

    #[test]
    fn test_page_and_stats_use_camel_case() {
        let page = ItemPage {
            items: vec![],
            total: 0,
            page: 1,
            total_pages: 0,
            limit: 10,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalPages"], 0);

        let stats = ItemStats {
            total: 0,
            average_price: 0.0,
            min_price_item: None,
            max_price_item: None,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["averagePrice"], 0.0);
        assert!(value["minPriceItem"].is_null());
    }

    #[test]
    fn test_has_name_ignores_case() {
        let item = Item {
            id: 1,
            name: "Laptop Pro".to_string(),
            category: "Electronics".to_string(),
            price: 1.0,
        };
        assert!(item.has_name("laptop pro"));
        assert!(item.has_name("LAPTOP PRO"));
        assert!(!item.has_name("Laptop"));
    }
}
