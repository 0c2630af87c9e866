//! The inventory view controller.
//!
//! One controller instance owns the [`ViewState`] for a session and derives
//! two things from it: which cards are visible and in what sequence they sit.
//! Both are idempotent functions of the current state and the fixed catalog;
//! nothing accumulates across operations.
//!
//! Filter and search always compose: every recompute applies
//! `category gate AND search gate`, so narrowing one constraint can never
//! resurface cards excluded by the other. Sorting rearranges the full
//! collection, hidden cards included, and never touches visibility.
//!
//! All operations are total. An unknown category or a term that matches
//! nothing is a valid empty view, not an error.

use crate::core::catalog::{Catalog, Vehicle, VehicleId, WILDCARD_CATEGORY};
use crate::inventory::filter;
use crate::inventory::port::RenderPort;
use crate::inventory::sort::SortKey;

/// The three orthogonal view constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Current category constraint; the wildcard disables it.
    pub active_filter: String,
    /// Current free-text constraint, kept as typed; matching is
    /// case-insensitive.
    pub search_term: String,
    /// Current sort criterion.
    pub sort_key: SortKey,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_filter: WILDCARD_CATEGORY.to_string(),
            search_term: String::new(),
            sort_key: SortKey::None,
        }
    }
}

struct Slot {
    vehicle: Vehicle,
    /// Lowercased card text, computed once at load.
    haystack: String,
}

/// Owner of the view state, rendering through an injected port.
pub struct InventoryController<P: RenderPort> {
    items: Vec<Slot>,
    /// Current arrangement as indices into `items`; always a permutation.
    order: Vec<usize>,
    state: ViewState,
    port: P,
}

impl<P: RenderPort> InventoryController<P> {
    /// Build a controller over a fixed catalog. The collection is copied;
    /// later catalog edits do not reach a live session.
    ///
    /// No instructions are emitted yet; call [`sync_port`](Self::sync_port)
    /// to paint the initial picture.
    #[must_use]
    pub fn new(catalog: &Catalog, port: P) -> Self {
        let items: Vec<Slot> = catalog
            .vehicles
            .iter()
            .map(|vehicle| Slot {
                haystack: vehicle.searchable_text(),
                vehicle: vehicle.clone(),
            })
            .collect();
        let order = (0..items.len()).collect();
        Self {
            items,
            order,
            state: ViewState::default(),
            port,
        }
    }

    /// Set the category constraint and re-derive visibility.
    ///
    /// Any string is accepted; a category no card carries yields an empty
    /// view. The port is told which single filter control is now active
    /// before the visibility sweep runs.
    pub fn set_filter(&mut self, category: &str) {
        self.state.active_filter = category.to_string();
        self.port.set_active_filter(category);
        self.apply_visibility();
    }

    /// Set the free-text constraint and re-derive visibility.
    ///
    /// The empty term matches everything. Callers wired to per-keystroke
    /// input should debounce before invoking this; the controller itself
    /// applies the term synchronously.
    pub fn set_search_term(&mut self, term: &str) {
        self.state.search_term = term.to_string();
        self.apply_visibility();
    }

    /// Re-sort the full collection under `key` and emit the new sequence.
    ///
    /// The sort is stable: records that compare equal keep their current
    /// relative positions, and `SortKey::None` leaves the arrangement
    /// untouched. Visibility is not recomputed.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.state.sort_key = key;
        let items = &self.items;
        self.order
            .sort_by(|&a, &b| key.compare(&items[a].vehicle, &items[b].vehicle));
        self.emit_order();
    }

    /// Restore default constraints and load order, then repaint.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
        self.order = (0..self.items.len()).collect();
        self.port.set_active_filter(WILDCARD_CATEGORY);
        self.apply_visibility();
        self.emit_order();
    }

    /// Emit the complete current picture: active control, visibility of
    /// every card, and the full sequence. For ports attached to a freshly
    /// built controller.
    pub fn sync_port(&mut self) {
        let active = self.state.active_filter.clone();
        self.port.set_active_filter(&active);
        self.apply_visibility();
        self.emit_order();
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether one card passes the current constraints.
    #[must_use]
    pub fn is_visible(&self, id: VehicleId) -> bool {
        let needle = self.state.search_term.to_lowercase();
        self.items
            .iter()
            .find(|slot| slot.vehicle.id == id)
            .is_some_and(|slot| self.slot_visible(slot, &needle))
    }

    /// The full card sequence, hidden cards included.
    #[must_use]
    pub fn order_ids(&self) -> Vec<VehicleId> {
        self.order
            .iter()
            .map(|&index| self.items[index].vehicle.id)
            .collect()
    }

    /// Visible card ids in display sequence.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<VehicleId> {
        self.visible_vehicles()
            .into_iter()
            .map(|vehicle| vehicle.id)
            .collect()
    }

    /// Visible records in display sequence.
    #[must_use]
    pub fn visible_vehicles(&self) -> Vec<&Vehicle> {
        let needle = self.state.search_term.to_lowercase();
        self.order
            .iter()
            .map(|&index| &self.items[index])
            .filter(|slot| self.slot_visible(slot, &needle))
            .map(|slot| &slot.vehicle)
            .collect()
    }

    /// All records in display sequence, visibility ignored.
    pub fn vehicles_in_order(&self) -> impl Iterator<Item = &Vehicle> {
        self.order.iter().map(|&index| &self.items[index].vehicle)
    }

    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.items
            .iter()
            .map(|slot| &slot.vehicle)
            .find(|vehicle| vehicle.id == id)
    }

    #[must_use]
    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Tear the controller apart, keeping the port.
    pub fn into_port(self) -> P {
        self.port
    }

    fn slot_visible(&self, slot: &Slot, needle_lower: &str) -> bool {
        filter::category_matches(&slot.vehicle.category, &self.state.active_filter)
            && filter::search_matches(&slot.haystack, needle_lower)
    }

    /// Sweep every card in display sequence, emitting show or hide for each.
    fn apply_visibility(&mut self) {
        let needle = self.state.search_term.to_lowercase();
        for position in 0..self.order.len() {
            let index = self.order[position];
            let id = self.items[index].vehicle.id;
            let visible = filter::category_matches(
                &self.items[index].vehicle.category,
                &self.state.active_filter,
            ) && filter::search_matches(&self.items[index].haystack, &needle);
            if visible {
                self.port.show_item(id);
            } else {
                self.port.hide_item(id);
            }
        }
    }

    fn emit_order(&mut self) {
        let ids: Vec<VehicleId> = self
            .order
            .iter()
            .map(|&index| self.items[index].vehicle.id)
            .collect();
        self.port.reorder_items(&ids);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::catalog::Vehicle;
    use crate::inventory::port::{NullPort, RecordingPort, RenderInstruction, RenderLedger};

    /// The three-record collection from the reference scenario:
    /// sedan $20k/2020, suv $35k/2022, sedan $15k/2019.
    fn scenario_catalog() -> Catalog {
        Catalog {
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
            ],
        }
    }

    fn recording_controller() -> InventoryController<RecordingPort> {
        InventoryController::new(&scenario_catalog(), RecordingPort::new())
    }

    #[test]
    fn fresh_controller_shows_everything_in_load_order() {
        let controller = recording_controller();
        assert_eq!(controller.visible_ids(), vec![1, 2, 3]);
        assert_eq!(controller.order_ids(), vec![1, 2, 3]);
        assert_eq!(controller.state().active_filter, WILDCARD_CATEGORY);
        assert_eq!(controller.state().sort_key, SortKey::None);
        // Nothing is emitted until an operation or sync runs.
        assert!(controller.port().instructions.is_empty());
    }

    #[test]
    fn wildcard_filter_admits_every_card() {
        let mut controller = recording_controller();
        controller.set_filter("sedan");
        controller.set_filter(WILDCARD_CATEGORY);
        assert_eq!(controller.visible_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn concrete_filter_admits_exactly_its_category() {
        let mut controller = recording_controller();
        controller.set_filter("sedan");
        assert_eq!(controller.visible_ids(), vec![1, 3]);

        controller.set_filter("suv");
        assert_eq!(controller.visible_ids(), vec![2]);
    }

    #[test]
    fn unknown_category_yields_empty_view_without_error() {
        let mut controller = recording_controller();
        controller.set_filter("truck");
        assert!(controller.visible_ids().is_empty());
        // Still recoverable; the collection is untouched.
        controller.set_filter(WILDCARD_CATEGORY);
        assert_eq!(controller.visible_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn filter_emits_active_control_then_a_full_sweep() {
        let mut controller = recording_controller();
        controller.set_filter("sedan");

        assert_eq!(
            controller.port_mut().drain(),
            vec![
                RenderInstruction::ActivateFilterControl("sedan".to_string()),
                RenderInstruction::Show(1),
                RenderInstruction::Hide(2),
                RenderInstruction::Show(3),
            ]
        );
    }

    #[test]
    fn search_is_case_insensitive_and_empty_matches_all() {
        let mut controller = recording_controller();
        controller.set_search_term("HONDA");
        assert_eq!(controller.visible_ids(), vec![1]);

        controller.set_search_term("");
        assert_eq!(controller.visible_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn search_respects_active_filter() {
        let mut controller = recording_controller();
        controller.set_filter("sedan");
        // "ford" only matches the suv, which the filter excludes.
        controller.set_search_term("ford");
        assert!(controller.visible_ids().is_empty());

        // And the filter keeps applying once the term relaxes.
        controller.set_search_term("");
        assert_eq!(controller.visible_ids(), vec![1, 3]);
    }

    #[test]
    fn filter_respects_active_search() {
        let mut controller = recording_controller();
        controller.set_search_term("toyota");
        controller.set_filter("sedan");
        assert_eq!(controller.visible_ids(), vec![3]);

        controller.set_filter("suv");
        assert!(controller.visible_ids().is_empty());
    }

    #[test]
    fn constraint_application_order_is_immaterial() {
        let mut filter_first = recording_controller();
        filter_first.set_filter("sedan");
        filter_first.set_search_term("2019");

        let mut search_first = recording_controller();
        search_first.set_search_term("2019");
        search_first.set_filter("sedan");

        assert_eq!(filter_first.visible_ids(), search_first.visible_ids());
    }

    #[test]
    fn reference_scenario_end_to_end() {
        let mut controller = recording_controller();

        controller.set_filter("sedan");
        assert_eq!(controller.visible_ids(), vec![1, 3]);

        controller.set_sort_key(SortKey::PriceLow);
        // The full collection reorders by price (15000, 20000, 35000).
        assert_eq!(controller.order_ids(), vec![3, 1, 2]);
        // Visibility is untouched by the sort.
        assert_eq!(controller.visible_ids(), vec![3, 1]);
        assert!(!controller.is_visible(2));
    }

    #[test]
    fn sort_emits_one_reorder_with_the_full_sequence() {
        let mut controller = recording_controller();
        controller.set_sort_key(SortKey::PriceLow);

        assert_eq!(
            controller.port_mut().drain(),
            vec![RenderInstruction::Reorder(vec![3, 1, 2])]
        );
    }

    #[test]
    fn sort_none_keeps_current_arrangement() {
        let mut controller = recording_controller();
        controller.set_sort_key(SortKey::PriceHigh);
        assert_eq!(controller.order_ids(), vec![2, 1, 3]);

        // Selecting the neutral criterion re-emits the unchanged sequence.
        controller.port_mut().drain();
        controller.set_sort_key(SortKey::None);
        assert_eq!(controller.order_ids(), vec![2, 1, 3]);
        assert_eq!(
            controller.port_mut().drain(),
            vec![RenderInstruction::Reorder(vec![2, 1, 3])]
        );
    }

    #[test]
    fn sorting_twice_by_the_same_key_changes_nothing() {
        let mut controller = recording_controller();
        controller.set_sort_key(SortKey::YearNew);
        let once = controller.order_ids();
        controller.set_sort_key(SortKey::YearNew);
        assert_eq!(controller.order_ids(), once);
    }

    #[test]
    fn equal_keys_preserve_relative_order() {
        let catalog = Catalog {
            vehicles: vec![
                Vehicle {
                    id: 10,
                    label: "First twin".to_string(),
                    category: "sedan".to_string(),
                    price: 18_000,
                    year: 2020,
                },
                Vehicle {
                    id: 11,
                    label: "Second twin".to_string(),
                    category: "suv".to_string(),
                    price: 18_000,
                    year: 2021,
                },
                Vehicle {
                    id: 12,
                    label: "Cheaper".to_string(),
                    category: "sedan".to_string(),
                    price: 9_000,
                    year: 2019,
                },
            ],
        };
        let mut controller = InventoryController::new(&catalog, NullPort);

        controller.set_sort_key(SortKey::PriceLow);
        // The twins tie on price and keep load order relative to each other.
        assert_eq!(controller.order_ids(), vec![12, 10, 11]);

        // After sorting by year the twins are split; re-sorting by price
        // must preserve the arrangement current at that point.
        controller.set_sort_key(SortKey::YearNew);
        assert_eq!(controller.order_ids(), vec![11, 10, 12]);
        controller.set_sort_key(SortKey::PriceLow);
        assert_eq!(controller.order_ids(), vec![12, 11, 10]);
    }

    #[test]
    fn missing_price_sorts_as_zero() {
        let mut catalog = scenario_catalog();
        catalog.vehicles.push(Vehicle {
            id: 4,
            label: "Project car".to_string(),
            category: "coupe".to_string(),
            price: 0,
            year: 0,
        });
        let mut controller = InventoryController::new(&catalog, NullPort);

        controller.set_sort_key(SortKey::PriceLow);
        assert_eq!(controller.order_ids(), vec![4, 3, 1, 2]);
        controller.set_sort_key(SortKey::YearOld);
        assert_eq!(controller.order_ids()[0], 4);
    }

    #[test]
    fn reset_restores_defaults_and_load_order() {
        let mut controller = recording_controller();
        controller.set_filter("suv");
        controller.set_search_term("ford");
        controller.set_sort_key(SortKey::PriceLow);

        controller.reset();
        assert_eq!(controller.state(), &ViewState::default());
        assert_eq!(controller.order_ids(), vec![1, 2, 3]);
        assert_eq!(controller.visible_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn sync_port_paints_the_whole_current_picture() {
        let mut controller = recording_controller();
        controller.set_filter("sedan");
        controller.port_mut().drain();

        controller.sync_port();
        let stream = controller.port_mut().drain();
        assert_eq!(
            stream,
            vec![
                RenderInstruction::ActivateFilterControl("sedan".to_string()),
                RenderInstruction::Show(1),
                RenderInstruction::Hide(2),
                RenderInstruction::Show(3),
                RenderInstruction::Reorder(vec![1, 2, 3]),
            ]
        );
    }

    #[test]
    fn ledger_port_mirrors_controller_queries() {
        let mut controller = InventoryController::new(&scenario_catalog(), RenderLedger::new());
        controller.sync_port();
        controller.set_filter("sedan");
        controller.set_sort_key(SortKey::PriceLow);

        assert_eq!(
            controller.port().visible_in_order(),
            controller.visible_ids()
        );
        assert_eq!(controller.port().order(), controller.order_ids());
        assert_eq!(controller.port().active_filter(), "sedan");
    }

    #[test]
    fn empty_catalog_operations_are_total() {
        let mut controller = InventoryController::new(&Catalog::default(), RecordingPort::new());
        controller.set_filter("sedan");
        controller.set_search_term("anything");
        controller.set_sort_key(SortKey::PriceLow);

        assert!(controller.is_empty());
        assert!(controller.visible_ids().is_empty());
        assert_eq!(
            controller.port_mut().drain(),
            vec![
                RenderInstruction::ActivateFilterControl("sedan".to_string()),
                RenderInstruction::Reorder(Vec::new()),
            ]
        );
    }

    // ──────────────────── property tests ────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Filter(String),
        Search(String),
        Sort(SortKey),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop_oneof![
                Just(WILDCARD_CATEGORY.to_string()),
                Just("sedan".to_string()),
                Just("suv".to_string()),
                Just("hovercraft".to_string()),
            ]
            .prop_map(Op::Filter),
            "[a-z0-9 ]{0,8}".prop_map(Op::Search),
            prop_oneof![
                Just(SortKey::None),
                Just(SortKey::PriceLow),
                Just(SortKey::PriceHigh),
                Just(SortKey::YearNew),
                Just(SortKey::YearOld),
            ]
            .prop_map(Op::Sort),
        ]
    }

    fn apply<P: RenderPort>(controller: &mut InventoryController<P>, op: &Op) {
        match op {
            Op::Filter(category) => controller.set_filter(category),
            Op::Search(term) => controller.set_search_term(term),
            Op::Sort(key) => controller.set_sort_key(*key),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// Whatever the operation sequence, the arrangement stays a
        /// permutation of the collection and visibility matches the pure
        /// predicate record by record.
        #[test]
        fn operations_preserve_view_invariants(
            ops in prop::collection::vec(arb_op(), 0..24)
        ) {
            let catalog = Catalog::sample();
            let mut controller = InventoryController::new(&catalog, NullPort);
            for op in &ops {
                apply(&mut controller, op);

                let mut order = controller.order_ids();
                order.sort_unstable();
                let mut expected: Vec<u64> =
                    catalog.vehicles.iter().map(|v| v.id).collect();
                expected.sort_unstable();
                prop_assert_eq!(order, expected);

                let state = controller.state().clone();
                for vehicle in &catalog.vehicles {
                    let expected_visible = crate::inventory::filter::vehicle_visible(
                        vehicle,
                        &state.active_filter,
                        &state.search_term,
                    );
                    prop_assert_eq!(controller.is_visible(vehicle.id), expected_visible);
                }
            }
        }

        /// A ledger port driven by instructions always agrees with the
        /// controller's own queries.
        #[test]
        fn ledger_stays_consistent_with_controller(
            ops in prop::collection::vec(arb_op(), 1..24)
        ) {
            let catalog = Catalog::sample();
            let mut controller =
                InventoryController::new(&catalog, RenderLedger::new());
            controller.sync_port();
            for op in &ops {
                apply(&mut controller, op);
            }

            prop_assert_eq!(
                controller.port().visible_in_order(),
                controller.visible_ids()
            );
            prop_assert_eq!(controller.port().order(), controller.order_ids());
            prop_assert_eq!(
                controller.port().active_filter(),
                controller.state().active_filter.as_str()
            );
        }
    }
}
