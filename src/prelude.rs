//! One-stop imports for embedding the browser as a library.
//!
//! ```rust
//! use showroom_inventory_browser::prelude::*;
//!
//! let catalog = Catalog::sample();
//! let mut inventory = InventoryController::new(&catalog, NullPort);
//! inventory.set_filter("sedan");
//! assert_eq!(inventory.visible_ids().len(), 2);
//! ```

// Core
pub use crate::core::catalog::{Catalog, Vehicle, VehicleId, WILDCARD_CATEGORY};
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SibError};

// Inventory
pub use crate::inventory::{
    InventoryController, NullPort, RecordingPort, RenderInstruction, RenderLedger, RenderPort,
    SortKey, ViewState,
};

// Interaction machinery
pub use crate::interact::{
    CounterAnimation, Debouncer, NavEntry, NavMenu, RevealEngine, ScrollView, Throttler,
};

// Contact form
pub use crate::forms::{ContactFieldId, ContactForm, FieldRules, SubmissionRecord};

// Interaction log
pub use crate::logger::{InteractionEvent, InteractionLog, LogEntry, LogHandle, Severity};
