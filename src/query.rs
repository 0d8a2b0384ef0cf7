//! Pure derived views over a restaurant set.
//!
//! Filters and projections used by the fetch layer's derived entry points.
//! No I/O; order-preserving over the input slice.

use crate::models::Restaurant;

/// Sentinel filter value meaning "no constraint on this axis".
pub const ALL: &str = "all";

/// Restaurants with an exact cuisine match.
pub fn by_cuisine<'a>(restaurants: &'a [Restaurant], cuisine: &str) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| r.cuisine_type == cuisine)
        .collect()
}

/// Restaurants with an exact neighborhood match.
pub fn by_neighborhood<'a>(
    restaurants: &'a [Restaurant],
    neighborhood: &str,
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| r.neighborhood == neighborhood)
        .collect()
}

/// Restaurants matching both axes, where [`ALL`] on either axis disables
/// that constraint.
pub fn by_cuisine_and_neighborhood<'a>(
    restaurants: &'a [Restaurant],
    cuisine: &str,
    neighborhood: &str,
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| cuisine == ALL || r.cuisine_type == cuisine)
        .filter(|r| neighborhood == ALL || r.neighborhood == neighborhood)
        .collect()
}

/// Distinct neighborhoods in first-occurrence order.
pub fn neighborhoods(restaurants: &[Restaurant]) -> Vec<String> {
    dedup_first(restaurants.iter().map(|r| r.neighborhood.clone()))
}

/// Distinct cuisines in first-occurrence order.
pub fn cuisines(restaurants: &[Restaurant]) -> Vec<String> {
    dedup_first(restaurants.iter().map(|r| r.cuisine_type.clone()))
}

fn dedup_first(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

// ============================================================================
// Tests
// ============================================================================
