//! Visibility predicates: the category gate, the search gate, and their
//! conjunction.
//!
//! A card is visible exactly when both gates pass. Changing either constraint
//! re-applies both, so a search can never resurface cards excluded by the
//! active category and vice versa.

use crate::core::catalog::{Vehicle, WILDCARD_CATEGORY};

/// Category gate: the wildcard admits everything, any other filter admits
/// only exact tag matches. An unknown filter simply admits nothing.
#[must_use]
pub fn category_matches(vehicle_category: &str, active_filter: &str) -> bool {
    active_filter == WILDCARD_CATEGORY || vehicle_category == active_filter
}

/// Search gate over pre-lowercased text. The empty needle matches everything.
#[must_use]
pub fn search_matches(haystack_lower: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack_lower.contains(needle_lower)
}

/// Full visibility predicate over a record and the raw constraints.
///
/// Case folding happens here; hot paths that already hold lowercased text
/// should use the two gates directly.
#[must_use]
pub fn vehicle_visible(vehicle: &Vehicle, active_filter: &str, term: &str) -> bool {
    category_matches(&vehicle.category, active_filter)
        && search_matches(&vehicle.searchable_text(), &term.to_lowercase())
}
