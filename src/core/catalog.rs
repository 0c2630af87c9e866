//! Vehicle catalog: the fixed collection the inventory view is computed over.
//!
//! The collection is loaded once per session and never mutated afterwards;
//! filtering, searching, and sorting are views over it. Numeric fields are
//! deliberately lenient: an absent or unparseable price/year degrades to `0`
//! instead of failing the load.

#![allow(missing_docs)]

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SibError};

/// Reserved category token that disables the filter constraint.
pub const WILDCARD_CATEGORY: &str = "all";

/// Stable identity of a vehicle within one catalog.
pub type VehicleId = u64;

/// One inventory record. Read-only after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Card headline, e.g. "2020 Honda Accord LX".
    pub label: String,
    /// Open category tag (sedan, suv, truck, ...). Never the wildcard.
    pub category: String,
    /// Asking price in whole dollars; 0 means "not listed".
    #[serde(default, deserialize_with = "lenient_u64")]
    pub price: u64,
    /// Model year; 0 means "not listed".
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: u32,
}

impl Vehicle {
    /// The card text a substring search runs over, pre-lowercased.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.label,
            self.category,
            self.display_price(),
            self.display_year()
        )
        .to_lowercase()
    }

    /// Price as shown on the card.
    #[must_use]
    pub fn display_price(&self) -> String {
        if self.price == 0 {
            return "Call for price".to_string();
        }
        format!("${}", group_thousands(self.price))
    }

    /// Year as shown on the card.
    #[must_use]
    pub fn display_year(&self) -> String {
        if self.year == 0 {
            return "n/a".to_string();
        }
        self.year.to_string()
    }
}

/// Insert commas every three digits: 35000 -> "35,000".
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// The full showroom stock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub vehicles: Vec<Vehicle>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SibError::MissingCatalog {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| SibError::io(path, source))?;
        let catalog: Self = serde_json::from_str(&raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Write the catalog as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SibError::io(parent, source))?;
        }
        fs::write(path, rendered).map_err(|source| SibError::io(path, source))
    }

    /// Structural checks: unique ids, non-empty labels, no wildcard categories.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<VehicleId> = HashSet::with_capacity(self.vehicles.len());
        for vehicle in &self.vehicles {
            if !seen.insert(vehicle.id) {
                return Err(SibError::InvalidCatalog {
                    details: format!("duplicate vehicle id {}", vehicle.id),
                });
            }
            if vehicle.label.trim().is_empty() {
                return Err(SibError::InvalidCatalog {
                    details: format!("vehicle {} has an empty label", vehicle.id),
                });
            }
            if vehicle.category.trim().is_empty() {
                return Err(SibError::InvalidCatalog {
                    details: format!("vehicle {} has an empty category", vehicle.id),
                });
            }
            if vehicle.category == WILDCARD_CATEGORY {
                return Err(SibError::InvalidCatalog {
                    details: format!(
                        "vehicle {} uses the reserved category {WILDCARD_CATEGORY:?}",
                        vehicle.id
                    ),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Distinct categories in sorted order, for building filter controls.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .vehicles
            .iter()
            .map(|vehicle| vehicle.category.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Small fixed stock used by demos and tests.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            vehicles: vec![
                Vehicle {
                    id: 1,
                    label: "2020 Honda Accord LX".to_string(),
                    category: "sedan".to_string(),
                    price: 20_000,
                    year: 2020,
                },
                Vehicle {
                    id: 2,
                    label: "2022 Ford Explorer XLT".to_string(),
                    category: "suv".to_string(),
                    price: 35_000,
                    year: 2022,
                },
                Vehicle {
                    id: 3,
                    label: "2019 Toyota Camry SE".to_string(),
                    category: "sedan".to_string(),
                    price: 15_000,
                    year: 2019,
                },
                Vehicle {
                    id: 4,
                    label: "2021 Chevrolet Silverado 1500".to_string(),
                    category: "truck".to_string(),
                    price: 38_500,
                    year: 2021,
                },
                Vehicle {
                    id: 5,
                    label: "2018 Mazda MX-5 Miata".to_string(),
                    category: "coupe".to_string(),
                    price: 21_400,
                    year: 2018,
                },
                Vehicle {
                    id: 6,
                    label: "2023 Subaru Outback Premium".to_string(),
                    category: "suv".to_string(),
                    price: 31_200,
                    year: 2023,
                },
            ],
        }
    }

    /// Generate a randomized stock of `count` vehicles from a seed.
    ///
    /// The same seed always yields the same catalog.
    #[must_use]
    pub fn seeded(count: usize, seed: u64) -> Self {
        const MAKES: [(&str, &[&str]); 4] = [
            ("sedan", &["Honda Accord", "Toyota Camry", "Mazda 6", "Kia K5"]),
            ("suv", &["Ford Explorer", "Subaru Outback", "Honda CR-V"]),
            ("truck", &["Chevrolet Silverado", "Ford F-150", "Ram 1500"]),
            ("coupe", &["Mazda MX-5", "Ford Mustang", "Toyota GR86"]),
        ];
        const TRIMS: [&str; 4] = ["LX", "SE", "XLT", "Premium"];

        let mut rng = StdRng::seed_from_u64(seed);
        let mut vehicles = Vec::with_capacity(count);
        for id in 1..=count as u64 {
            let (category, models) = MAKES[rng.random_range(0..MAKES.len())];
            let model = models[rng.random_range(0..models.len())];
            let trim = TRIMS[rng.random_range(0..TRIMS.len())];
            let year = rng.random_range(2012_u32..=2024);
            // Round to the nearest hundred so prices read like window stickers.
            let price = rng.random_range(80_u64..=650) * 100;
            vehicles.push(Vehicle {
                id,
                label: format!("{year} {model} {trim}"),
                category: category.to_string(),
                price,
                year,
            });
        }
        Self { vehicles }
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientU64;

    impl Visitor<'_> for LenientU64 {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an integer, a numeric string, or null")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<u64, E> {
            Ok(value.try_into().unwrap_or(0))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<u64, E> {
            if value.is_finite() && value > 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(value.trunc() as u64)
            } else {
                Ok(0)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<u64, E> {
            Ok(parse_leading_digits(value))
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(LenientU64)
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let wide = lenient_u64(deserializer)?;
    Ok(wide.try_into().unwrap_or(0))
}

/// Leading-digit parse in the style of `parseInt`: `"20k miles" -> 20`,
/// `"fresh" -> 0`. Anything that overflows also degrades to 0.
fn parse_leading_digits(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_valid() {
        let catalog = Catalog::sample();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut catalog = Catalog::sample();
        catalog.vehicles[1].id = catalog.vehicles[0].id;
        let err = catalog.validate().expect_err("expected duplicate id error");
        assert_eq!(err.code(), "SIB-2002");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn wildcard_category_rejected() {
        let mut catalog = Catalog::sample();
        catalog.vehicles[0].category = WILDCARD_CATEGORY.to_string();
        let err = catalog.validate().expect_err("expected wildcard error");
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let catalog = Catalog::sample();
        let categories = catalog.categories();
        assert_eq!(categories, vec!["coupe", "sedan", "suv", "truck"]);
    }

    #[test]
    fn load_missing_file_is_a_catalog_error() {
        let err = Catalog::load(Path::new("/nonexistent/sib/catalog.json")).unwrap_err();
        assert_eq!(err.code(), "SIB-2001");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stock").join("catalog.json");

        let catalog = Catalog::sample();
        catalog.save(&path).expect("save should succeed");
        let loaded = Catalog::load(&path).expect("load should succeed");
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn lenient_fields_degrade_to_zero() {
        let raw = r#"{
            "vehicles": [
                {"id": 1, "label": "Mystery Wagon", "category": "wagon"},
                {"id": 2, "label": "Sticker Sedan", "category": "sedan", "price": "20k", "year": "2015 model"},
                {"id": 3, "label": "Odd Coupe", "category": "coupe", "price": "fresh", "year": null},
                {"id": 4, "label": "Float Truck", "category": "truck", "price": 19999.99, "year": 2021}
            ]
        }"#;
        let catalog: Catalog = serde_json::from_str(raw).expect("lenient parse");

        assert_eq!(catalog.vehicles[0].price, 0);
        assert_eq!(catalog.vehicles[0].year, 0);
        assert_eq!(catalog.vehicles[1].price, 20);
        assert_eq!(catalog.vehicles[1].year, 2015);
        assert_eq!(catalog.vehicles[2].price, 0);
        assert_eq!(catalog.vehicles[2].year, 0);
        assert_eq!(catalog.vehicles[3].price, 19_999);
    }

    #[test]
    fn searchable_text_is_lowercase_and_includes_card_fields() {
        let vehicle = &Catalog::sample().vehicles[0];
        let text = vehicle.searchable_text();
        assert!(text.contains("honda accord"));
        assert!(text.contains("sedan"));
        assert!(text.contains("$20,000"));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn display_price_groups_thousands_and_handles_unlisted() {
        let mut vehicle = Catalog::sample().vehicles[0].clone();
        assert_eq!(vehicle.display_price(), "$20,000");
        vehicle.price = 1_234_567;
        assert_eq!(vehicle.display_price(), "$1,234,567");
        vehicle.price = 0;
        assert_eq!(vehicle.display_price(), "Call for price");
    }

    #[test]
    fn seeded_catalog_is_deterministic_and_valid() {
        let first = Catalog::seeded(24, 7);
        let second = Catalog::seeded(24, 7);
        let different = Catalog::seeded(24, 8);

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 24);
        assert!(first.validate().is_ok());
    }
}
