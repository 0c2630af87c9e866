#![forbid(unsafe_code)]

//! Showroom Inventory Browser (sib): a terminal front end for a used-car
//! dealership's stock.
//!
//! Three surfaces share one catalog. The landing screen plays scroll-driven
//! section reveals and count-up statistics. The inventory screen filters,
//! searches, and sorts the vehicle cards. The contact screen walks a message
//! form field by field. Every behavior is pure state plus explicit time, so
//! the whole interaction layer tests without a terminal.
//!
//! # Embedding
//!
//! ```rust
//! use showroom_inventory_browser::prelude::*;
//!
//! let catalog = Catalog::sample();
//! let mut inventory = InventoryController::new(&catalog, RenderLedger::default());
//! inventory.set_search_term("honda");
//! assert!(inventory.visible_ids().len() < catalog.len());
//! ```
//!
//! Modules can also be reached directly:
//!
//! ```rust
//! use showroom_inventory_browser::inventory::sort::SortKey;
//!
//! assert_eq!(SortKey::parse("price-low"), Some(SortKey::PriceLow));
//! ```

pub mod prelude;

pub mod core;
pub mod forms;
pub mod interact;
pub mod inventory;
pub mod logger;
#[cfg(feature = "tui")]
pub mod tui;
