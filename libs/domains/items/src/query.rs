//! Search, ordering and pagination over a snapshot of the collection.

use crate::models::{Item, ItemPage, ItemQuery, SortOrder};

/// Apply a listing query to `items`.
///
/// Filters by lowercase substring on the name, sorts stably by price when an
/// order is given, then cuts out the requested page. A page past the end
/// yields an empty `items` array with the totals still filled in.
pub fn apply(items: Vec<Item>, query: &ItemQuery) -> ItemPage {
    let needle = query
        .q
        .as_deref()
        .map(str::to_lowercase)
        .filter(|q| !q.is_empty());

    let mut matched: Vec<Item> = match needle {
        Some(needle) => items
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect(),
        None => items,
    };

    match query.order {
        Some(SortOrder::PriceAsc) => matched.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Some(SortOrder::PriceDesc) => matched.sort_by(|a, b| b.price.total_cmp(&a.price)),
        None => {}
    }

    let total = matched.len();
    let limit = query.limit.max(1) as usize;
    let page = query.page.max(1) as usize;
    let total_pages = total.div_ceil(limit);

    let items = matched
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    ItemPage {
        items,
        total,
        page: query.page,
        total_pages,
        limit: query.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str, price: f64) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: "Misc".to_string(),
            price,
        }
    }

    fn catalog() -> Vec<Item> {
        vec![
            item(1, "Laptop Pro", 2499.0),
            item(2, "Noise Cancelling Headphones", 399.0),
            item(3, "Ultra-Wide Monitor", 999.0),
            item(4, "Ergonomic Chair", 799.0),
            item(5, "Standing Desk", 1199.0),
        ]
    }

    fn ids(page: &ItemPage) -> Vec<u64> {
        page.items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_defaults_return_first_page_in_collection_order() {
        let page = apply(catalog(), &ItemQuery::default());
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let query = ItemQuery {
            q: Some("DESK".to_string()),
            ..Default::default()
        };
        let page = apply(catalog(), &query);
        assert_eq!(ids(&page), vec![5]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let query = ItemQuery {
            q: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(apply(catalog(), &query).total, 5);
    }

    #[test]
    fn test_price_ordering() {
        let asc = ItemQuery {
            order: Some(SortOrder::PriceAsc),
            ..Default::default()
        };
        assert_eq!(ids(&apply(catalog(), &asc)), vec![2, 4, 3, 5, 1]);

        let desc = ItemQuery {
            order: Some(SortOrder::PriceDesc),
            ..Default::default()
        };
        assert_eq!(ids(&apply(catalog(), &desc)), vec![1, 5, 3, 4, 2]);
    }

    #[test]
    fn test_ordering_is_stable_for_equal_prices() {
        let items = vec![item(1, "Alpha", 5.0), item(2, "Beta", 1.0), item(3, "Gamma", 5.0)];
        let query = ItemQuery {
            order: Some(SortOrder::PriceDesc),
            ..Default::default()
        };
        assert_eq!(ids(&apply(items, &query)), vec![1, 3, 2]);
    }

    #[test]
    fn test_pagination() {
        let query = ItemQuery {
            page: 2,
            limit: 2,
            ..Default::default()
        };
        let page = apply(catalog(), &query);
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let last = ItemQuery {
            page: 3,
            limit: 2,
            ..Default::default()
        };
        assert_eq!(ids(&apply(catalog(), &last)), vec![5]);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let query = ItemQuery {
            page: 9,
            limit: 2,
            ..Default::default()
        };
        let page = apply(catalog(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn test_no_matches() {
        let query = ItemQuery {
            q: Some("zzz".to_string()),
            ..Default::default()
        };
        let page = apply(catalog(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }
}
