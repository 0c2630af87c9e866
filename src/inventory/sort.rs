//! Sort keys and the comparator over catalog records.
//!
//! Ordering is always applied with a stable sort, so records that compare
//! equal keep their prior relative positions. A missing price or year is
//! already 0 by the time records reach the comparator.

#![allow(missing_docs)]

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::catalog::Vehicle;

/// The five sort criteria offered by the sort control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Leave the current arrangement untouched.
    #[default]
    None,
    PriceLow,
    PriceHigh,
    YearNew,
    YearOld,
}

impl SortKey {
    /// Every key, in control order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::PriceLow,
        Self::PriceHigh,
        Self::YearNew,
        Self::YearOld,
    ];

    /// Stable machine token, as carried by sort-selection events.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::YearNew => "year-new",
            Self::YearOld => "year-old",
        }
    }

    /// Human label for the sort control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Featured",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::YearNew => "Year: Newest First",
            Self::YearOld => "Year: Oldest First",
        }
    }

    /// Parse a token, case-insensitively. Unknown tokens are not a key.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| token.eq_ignore_ascii_case(key.token()))
    }

    /// Advance to the next key, wrapping back to `None`.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::None => Self::PriceLow,
            Self::PriceLow => Self::PriceHigh,
            Self::PriceHigh => Self::YearNew,
            Self::YearNew => Self::YearOld,
            Self::YearOld => Self::None,
        }
    }

    /// Compare two records under this key.
    #[must_use]
    pub fn compare(self, a: &Vehicle, b: &Vehicle) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::YearNew => b.year.cmp(&a.year),
            Self::YearOld => a.year.cmp(&b.year),
        }
    }
}
