//! Inventory browsing: filter, search, and sort over a vehicle catalog.
//!
//! The module is split along the seam between deciding and drawing. Pure
//! predicate and comparator functions live in [`filter`] and [`sort`]; the
//! [`controller`] owns the view state and turns each operation into render
//! instructions; [`port`] defines the rendering surface those instructions
//! cross, with test and TUI implementations.

pub mod controller;
pub mod filter;
pub mod port;
pub mod sort;

pub use controller::{InventoryController, ViewState};
pub use port::{NullPort, RecordingPort, RenderInstruction, RenderLedger, RenderPort};
pub use sort::SortKey;
