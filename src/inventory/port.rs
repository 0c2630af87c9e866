//! The rendering contract between the view controller and a presentation
//! layer.
//!
//! The controller never touches a widget tree. It issues three kinds of
//! instruction through [`RenderPort`]: per-card visibility, the full card
//! sequence after a reorder, and which single filter control is active.
//! Instructions are idempotent; re-applying the current state is harmless.

use std::collections::HashSet;

use crate::core::catalog::{VehicleId, WILDCARD_CATEGORY};

/// One rendering instruction, as captured by [`RecordingPort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    Show(VehicleId),
    Hide(VehicleId),
    Reorder(Vec<VehicleId>),
    ActivateFilterControl(String),
}

/// Presentation-layer seam the controller renders through.
pub trait RenderPort {
    /// Make one card visible.
    fn show_item(&mut self, id: VehicleId);
    /// Remove one card from view.
    fn hide_item(&mut self, id: VehicleId);
    /// Re-seat all cards in the given sequence.
    fn reorder_items(&mut self, order: &[VehicleId]);
    /// Mark exactly this filter control active and deactivate the rest.
    fn set_active_filter(&mut self, category: &str);
}

/// Test double that records the exact instruction stream.
#[derive(Debug, Default)]
pub struct RecordingPort {
    pub instructions: Vec<RenderInstruction>,
}

impl RecordingPort {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded instructions, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<RenderInstruction> {
        std::mem::take(&mut self.instructions)
    }
}

impl RenderPort for RecordingPort {
    fn show_item(&mut self, id: VehicleId) {
        self.instructions.push(RenderInstruction::Show(id));
    }

    fn hide_item(&mut self, id: VehicleId) {
        self.instructions.push(RenderInstruction::Hide(id));
    }

    fn reorder_items(&mut self, order: &[VehicleId]) {
        self.instructions
            .push(RenderInstruction::Reorder(order.to_vec()));
    }

    fn set_active_filter(&mut self, category: &str) {
        self.instructions
            .push(RenderInstruction::ActivateFilterControl(category.to_string()));
    }
}

/// Live snapshot of the rendered picture, for immediate-mode drawing.
///
/// Instead of replaying instructions, a frame renderer reads the ledger:
/// which cards are visible, in what sequence, and which filter chip is lit.
#[derive(Debug, Clone)]
pub struct RenderLedger {
    visible: HashSet<VehicleId>,
    order: Vec<VehicleId>,
    active_filter: String,
}

impl RenderLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: HashSet::new(),
            order: Vec::new(),
            active_filter: WILDCARD_CATEGORY.to_string(),
        }
    }

    #[must_use]
    pub fn is_visible(&self, id: VehicleId) -> bool {
        self.visible.contains(&id)
    }

    /// The full card sequence, hidden cards included.
    #[must_use]
    pub fn order(&self) -> &[VehicleId] {
        &self.order
    }

    /// Visible cards in display sequence.
    #[must_use]
    pub fn visible_in_order(&self) -> Vec<VehicleId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.visible.contains(id))
            .collect()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }
}

impl Default for RenderLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPort for RenderLedger {
    fn show_item(&mut self, id: VehicleId) {
        self.visible.insert(id);
    }

    fn hide_item(&mut self, id: VehicleId) {
        self.visible.remove(&id);
    }

    fn reorder_items(&mut self, order: &[VehicleId]) {
        self.order = order.to_vec();
    }

    fn set_active_filter(&mut self, category: &str) {
        self.active_filter = category.to_string();
    }
}

/// Sink for headless queries where nothing is drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPort;

impl RenderPort for NullPort {
    fn show_item(&mut self, _id: VehicleId) {}
    fn hide_item(&mut self, _id: VehicleId) {}
    fn reorder_items(&mut self, _order: &[VehicleId]) {}
    fn set_active_filter(&mut self, _category: &str) {}
}
