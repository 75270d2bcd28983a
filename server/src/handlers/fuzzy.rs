//! Fuzzy search over item reports.

use actix_web::web;
use serde::Deserialize;

use crate::model::{Item, ItemKind};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// How well `query` matches `text`, ignoring case. Lower is better:
/// `0` for a substring hit, `1` when the query's characters appear in
/// order, `None` otherwise. An empty query matches everything.
pub fn match_rank(query: &str, text: &str) -> Option<u8> {
    let query = query.trim().to_lowercase();
    let text = text.to_lowercase();
    if query.is_empty() || text.contains(&query) {
        return Some(0);
    }

    let mut haystack = text.chars();
    let in_order = query
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|c| haystack.any(|h| h == c));
    in_order.then_some(1)
}

fn item_rank(query: &str, item: &Item) -> Option<u8> {
    item.searchable_fields()
        .iter()
        .filter_map(|field| match_rank(query, field))
        .min()
}

/// Matching items, substring hits first.
pub async fn search(
    kind: web::Data<ItemKind>,
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> web::Json<Vec<Item>> {
    let mut ranked: Vec<(u8, Item)> = state
        .items
        .list(**kind)
        .await
        .into_iter()
        .filter_map(|item| item_rank(&query.q, &item).map(|rank| (rank, item)))
        .collect();
    ranked.sort_by_key(|(rank, item)| (*rank, item.id));

    web::Json(ranked.into_iter().map(|(_, item)| item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_ignores_case() {
        assert_eq!(match_rank("UMBR", "Black umbrella"), Some(0));
    }

    #[test]
    fn test_subsequence_match() {
        assert_eq!(match_rank("blkpck", "Blue backpack"), Some(1));
        assert_eq!(match_rank("lap top", "Laptop"), Some(1));
    }

    #[test]
    fn test_out_of_order_does_not_match() {
        assert_eq!(match_rank("kcab", "backpack"), None);
        assert_eq!(match_rank("wallet", "watch"), None);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(match_rank("  ", "anything"), Some(0));
    }
}
