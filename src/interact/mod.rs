//! Motion and timing primitives shared by the interactive surfaces.
//!
//! Everything here is pure state plus explicit time: callers hand in
//! `Instant`s or tick the machines themselves, so every behavior is
//! reproducible in tests without sleeping.

pub mod counters;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod timers;

pub use counters::CounterAnimation;
pub use nav::{NavEntry, NavMenu};
pub use reveal::RevealEngine;
pub use scroll::ScrollView;
pub use timers::{Debouncer, Throttler};
