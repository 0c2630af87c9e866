//! Terminal browser for the showroom.
//!
//! Elm-shaped: `model` holds all display state, `update` folds messages
//! into it, `render` draws it, and `runtime` owns the event loop and
//! timer scheduling. `input` resolves keys by modal precedence so the
//! precedence rules live in exactly one place.

#![allow(missing_docs)]

pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;
pub mod update;
pub mod widgets;

pub use runtime::run_browser;
