// src/extract.rs
//! Reference extractors: functions from a page history to the visible items.
//!
//! Any of these can be handed to [`ListConfig::new`](crate::ListConfig::new)
//! through a small closure. They are pure, so the same history always
//! produces the same collection, and an empty history produces an empty one.

use std::collections::BTreeMap;
use std::hash::Hash;

use indexmap::IndexMap;

/// A page that carries a batch of items.
pub trait ItemPage {
    type Item;

    fn items(&self) -> &[Self::Item];
}

impl<T> ItemPage for Vec<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }
}

/// All items of all pages, in history order.
pub fn flatten<P>(pages: &[P]) -> Vec<P::Item>
where
    P: ItemPage,
    P::Item: Clone,
{
    pages
        .iter()
        .flat_map(|page| page.items().iter().cloned())
        .collect()
}

/// Items deduplicated by `key` and sorted ascending by it.
///
/// When two pages carry the same key, the item from the later page wins.
pub fn unique_sorted_by<P, K, F>(pages: &[P], key: F) -> Vec<P::Item>
where
    P: ItemPage,
    P::Item: Clone,
    K: Ord,
    F: Fn(&P::Item) -> K,
{
    let mut by_key = BTreeMap::new();
    for item in pages.iter().flat_map(|page| page.items()) {
        by_key.insert(key(item), item.clone());
    }
    by_key.into_values().collect()
}

/// Items deduplicated by `key`, kept at the position they were first seen.
///
/// When two pages carry the same key, the item from the later page wins.
pub fn unique_by<P, K, F>(pages: &[P], key: F) -> Vec<P::Item>
where
    P: ItemPage,
    P::Item: Clone,
    K: Hash + Eq,
    F: Fn(&P::Item) -> K,
{
    let mut by_key = IndexMap::new();
    for item in pages.iter().flat_map(|page| page.items()) {
        by_key.insert(key(item), item.clone());
    }
    by_key.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        rev: u32,
    }

    fn row(id: u32, rev: u32) -> Row {
        Row { id, rev }
    }

    #[test]
    fn test_empty_history_yields_no_items() {
        let pages: Vec<Vec<u32>> = Vec::new();
        assert!(flatten(&pages).is_empty());
        assert!(unique_sorted_by(&pages, |n| *n).is_empty());
        assert!(unique_by(&pages, |n| *n).is_empty());
    }

    #[test]
    fn test_flatten_keeps_duplicates_and_order() {
        let pages = vec![vec![3, 1], vec![1, 2]];
        assert_eq!(flatten(&pages), vec![3, 1, 1, 2]);
    }

    #[test]
    fn test_unique_sorted_by_later_page_wins() {
        let pages = vec![
            vec![row(2, 0), row(1, 0)],
            vec![row(2, 1), row(3, 0)],
        ];
        assert_eq!(
            unique_sorted_by(&pages, |r| r.id),
            vec![row(1, 0), row(2, 1), row(3, 0)]
        );
    }

    #[test]
    fn test_unique_by_keeps_first_position() {
        let pages = vec![
            vec![row(5, 0), row(1, 0)],
            vec![row(5, 1), row(0, 0)],
        ];
        assert_eq!(
            unique_by(&pages, |r| r.id),
            vec![row(5, 1), row(1, 0), row(0, 0)]
        );
    }

    #[test]
    fn test_extraction_is_pure() {
        let pages = vec![vec![9, 4], vec![4, 7]];
        assert_eq!(
            unique_sorted_by(&pages, |n| *n),
            unique_sorted_by(&pages, |n| *n)
        );
    }
}
