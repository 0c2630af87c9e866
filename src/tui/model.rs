//! Elm-style state model for the showroom browser TUI.
//!
//! Every piece of display state lives in [`BrowserModel`]. Input and timer
//! events arrive as [`BrowserMsg`] values; the update function answers with
//! [`BrowserCmd`] values that describe side-effects without performing them.
//!
//! **Design invariant:** the model does no I/O, so a session replays as a
//! plain sequence of messages.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::core::catalog::{Catalog, WILDCARD_CATEGORY};
use crate::core::config::Config;
use crate::forms::{ContactForm, FieldRules};
use crate::interact::counters::CounterAnimation;
use crate::interact::nav::{NavEntry, NavMenu};
use crate::interact::reveal::RevealEngine;
use crate::interact::scroll::ScrollView;
use crate::interact::timers::Debouncer;
use crate::inventory::controller::InventoryController;
use crate::inventory::port::RenderLedger;
use crate::inventory::sort::SortKey;
use crate::logger::LogHandle;

/// The motion knobs in the config are expressed in source-layout pixels.
/// One terminal row stands in for roughly sixteen of them, so the fixed
/// header allowance of 80 becomes five rows and the reveal margin of 50
/// becomes three.
pub const ROW_PX: u32 = 16;

// ──────────────────── screens ────────────────────

/// Top-level pages in the browser, mirroring the site's page split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Landing page: hero, feature cards, animated statistics.
    #[default]
    Home,
    /// The inventory browser: filter chips, search, sort, vehicle cards.
    Inventory,
    /// The contact form.
    Contact,
}

/// Prev/next navigation wraps modulo this.
const SCREEN_COUNT: u8 = 3;

impl Screen {
    pub const ALL: [Self; 3] = [Self::Home, Self::Inventory, Self::Contact];

    /// 1-based screen number for hotkey mapping (keys `1`-`3`).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Inventory => 2,
            Self::Contact => 3,
        }
    }

    /// Resolve a 1-based number key to a screen. Returns `None` for
    /// out-of-range.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Home),
            2 => Some(Self::Inventory),
            3 => Some(Self::Contact),
            _ => None,
        }
    }

    /// Next screen in navigation order, wrapping Contact → Home.
    #[must_use]
    pub const fn next(self) -> Self {
        let n = self.number() % SCREEN_COUNT + 1;
        match Self::from_number(n) {
            Some(screen) => screen,
            None => Self::Home,
        }
    }

    /// Previous screen in navigation order, wrapping Home → Contact.
    #[must_use]
    pub const fn prev(self) -> Self {
        let n = if self.number() == 1 {
            SCREEN_COUNT
        } else {
            self.number() - 1
        };
        match Self::from_number(n) {
            Some(screen) => screen,
            None => Self::Contact,
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Inventory => "Inventory",
            Self::Contact => "Contact",
        }
    }

    /// Identifier used in log entries.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Inventory => "inventory",
            Self::Contact => "contact",
        }
    }
}

// ──────────────────── notifications ────────────────────

/// Toast notification shown in the top-right corner.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Matches the ID inside a scheduled expiry command, so a stale expiry
    /// cannot dismiss a newer toast.
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

/// How a toast is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

// ──────────────────── home page ────────────────────

/// One statistic figure on the landing page.
#[derive(Debug, Clone)]
pub struct StatFigure {
    pub label: &'static str,
    pub counter: CounterAnimation,
}

/// The landing-page statistics: figure text and caption.
pub const HOME_STATS: [(&str, &str); 4] = [
    ("500+", "Vehicles Sold"),
    ("98%", "Customer Satisfaction"),
    ("15", "Years in Business"),
    ("1,200+", "Happy Customers"),
];

/// Feature cards under the hero.
pub const HOME_FEATURES: [(&str, &str); 4] = [
    ("Quality Inspected", "Every vehicle passes a 120-point inspection"),
    ("Fair Pricing", "Market-checked prices with no hidden fees"),
    ("Easy Financing", "On-the-spot approval with local lenders"),
    ("Trade-Ins Welcome", "Same-day appraisal for your current car"),
];

/// Row extents of the landing-page sections, in content rows.
pub mod home_rows {
    pub const HERO_TOP: u32 = 0;
    pub const HERO_HEIGHT: u32 = 10;
    pub const FEATURES_TOP: u32 = 12;
    pub const FEATURE_CARD_HEIGHT: u32 = 5;
    pub const STATS_TOP: u32 = 36;
    pub const STATS_HEIGHT: u32 = 8;
    pub const CTA_TOP: u32 = 46;
    pub const CTA_HEIGHT: u32 = 6;
    pub const CONTENT_HEIGHT: u32 = 54;
}

/// Scroll, reveal, and counter state for the landing page.
#[derive(Debug)]
pub struct HomeState {
    pub scroll: ScrollView,
    /// One-shot fade-in tracking for cards and sections.
    pub reveal: RevealEngine,
    /// Half-visibility gate that starts the statistic counters.
    pub counter_gate: RevealEngine,
    pub stats: Vec<StatFigure>,
    pub counters_started: bool,
}

/// Reveal target ids for the landing page.
pub mod home_targets {
    pub const FEATURE_BASE: u64 = 1;
    pub const STATS: u64 = 10;
    pub const CTA: u64 = 11;
}

/// Content rows the home page can show at a given terminal height, after
/// the tab strip, status line, and body borders.
#[must_use]
pub fn home_viewport_height(rows: u16) -> u32 {
    u32::from(rows.saturating_sub(4).max(1))
}

impl HomeState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let motion = &config.motion;
        let mut scroll = ScrollView::new(motion.header_offset / ROW_PX);
        scroll.set_extent(home_rows::CONTENT_HEIGHT, home_viewport_height(24));
        scroll.add_anchor("hero", home_rows::HERO_TOP);
        scroll.add_anchor("features", home_rows::FEATURES_TOP);
        scroll.add_anchor("stats", home_rows::STATS_TOP);
        scroll.add_anchor("visit", home_rows::CTA_TOP);

        let mut reveal = RevealEngine::new(
            motion.reveal_threshold,
            motion.reveal_bottom_margin / ROW_PX,
        );
        let mut card_top = home_rows::FEATURES_TOP + 1;
        for index in 0..HOME_FEATURES.len() as u64 {
            reveal.observe(
                home_targets::FEATURE_BASE + index,
                card_top,
                home_rows::FEATURE_CARD_HEIGHT,
            );
            card_top += home_rows::FEATURE_CARD_HEIGHT + 1;
        }
        reveal.observe(home_targets::STATS, home_rows::STATS_TOP, home_rows::STATS_HEIGHT);
        reveal.observe(home_targets::CTA, home_rows::CTA_TOP, home_rows::CTA_HEIGHT);

        let mut counter_gate = RevealEngine::new(motion.counter_threshold, 0);
        counter_gate.observe(home_targets::STATS, home_rows::STATS_TOP, home_rows::STATS_HEIGHT);

        let stats = HOME_STATS
            .iter()
            .map(|&(figure, label)| StatFigure {
                label,
                counter: CounterAnimation::parse(figure, motion.counter_steps),
            })
            .collect();

        Self {
            scroll,
            reveal,
            counter_gate,
            stats,
            counters_started: false,
        }
    }

    /// Re-evaluate both reveal engines at the current offset. Starts the
    /// counters the first time the statistics band is half visible.
    pub fn sweep(&mut self) {
        let top = self.scroll.offset();
        let height = self.scroll.viewport_height();
        self.reveal.sweep(top, height);
        if !self.counters_started && !self.counter_gate.sweep(top, height).is_empty() {
            self.counters_started = true;
        }
    }

    /// Advance the statistic counters by one frame, once started.
    pub fn tick_counters(&mut self) {
        if !self.counters_started {
            return;
        }
        for stat in &mut self.stats {
            stat.counter.tick();
        }
    }
}

// ──────────────────── messages and commands ────────────────────

/// Input and timer events consumed by the update function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserMsg {
    /// Raw key event from the terminal.
    Key(KeyEvent),
    /// Periodic frame tick from the runtime.
    Tick,
    /// A scheduled search-debounce deadline elapsed.
    SearchDebounceFired { generation: u64 },
    /// A scheduled success-banner expiry elapsed.
    BannerExpired { generation: u64 },
    /// A toast's display window elapsed.
    NotificationExpired(u64),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
}

/// Side-effects requested by the update function and executed by the
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCmd {
    /// Nothing to do.
    None,
    /// Stop the event loop and leave the TUI.
    Quit,
    /// Deliver [`BrowserMsg::SearchDebounceFired`] after the delay.
    ScheduleSearchCommit { generation: u64, after: Duration },
    /// Deliver [`BrowserMsg::BannerExpired`] after the delay.
    ScheduleBannerExpiry { generation: u64, after: Duration },
    /// Deliver [`BrowserMsg::NotificationExpired`] after the delay.
    ScheduleNotificationExpiry { id: u64, after: Duration },
    /// Execute several commands in order.
    Batch(Vec<BrowserCmd>),
}

// ──────────────────── model ────────────────────

/// Complete display state for the browser TUI.
///
/// The update function mutates the model in place; the render function
/// reads it immutably.
pub struct BrowserModel {
    /// Which page is on screen.
    pub screen: Screen,
    /// Collapsible navigation drawer over the three screens.
    pub nav: NavMenu<Screen>,
    /// Whether the contextual key map overlay is open.
    pub help_visible: bool,

    // ── Inventory screen ──
    /// View state owner; renders into a ledger the draw pass reads.
    pub controller: InventoryController<RenderLedger>,
    /// Filter chips: the wildcard first, then every catalog category.
    pub categories: Vec<String>,
    /// Chip the chip cursor rests on.
    pub chip_cursor: usize,
    /// Text in the search box, which may not be committed yet.
    pub search_input: String,
    /// Whether keystrokes go to the search box.
    pub search_focused: bool,
    /// Trailing-edge debounce between typing and committing the term.
    pub debouncer: Debouncer<String>,
    /// Cursor within the visible vehicle list.
    pub selected: usize,

    // ── Home screen ──
    pub home: HomeState,

    // ── Contact screen ──
    pub contact: ContactForm,
    /// Success banner text, shown until its expiry fires.
    pub banner: Option<String>,
    /// Generation stamp for banner expiry; a stale expiry is ignored.
    pub banner_generation: u64,

    // ── Chrome ──
    /// Active notification toasts (oldest first).
    pub notifications: Vec<Notification>,
    /// Source of fresh toast IDs, never reused within a session.
    pub next_notification_id: u64,
    /// Last known (columns, rows).
    pub terminal_size: (u16, u16),
    /// Frames elapsed, wrapping at `u64::MAX`.
    pub tick: u64,
    /// Set once the user asks to leave; the runtime exits its loop on it.
    pub quit: bool,

    pub config: Config,
    pub log: LogHandle,
    /// Session start, for the stop entry's duration.
    pub started: Instant,
}

impl BrowserModel {
    /// Build the initial model over a catalog. The configured starting
    /// filter and sort are applied, then the ledger port is synced so the
    /// first draw already has the full picture.
    pub fn new(config: Config, catalog: &Catalog, log: LogHandle) -> crate::core::errors::Result<Self> {
        let mut controller = InventoryController::new(catalog, RenderLedger::new());
        if config.view.default_filter != WILDCARD_CATEGORY {
            controller.set_filter(&config.view.default_filter);
        }
        if let Some(key) = SortKey::parse(&config.view.default_sort) {
            if key != SortKey::None {
                controller.set_sort_key(key);
            }
        }
        controller.sync_port();

        let mut categories = vec![WILDCARD_CATEGORY.to_string()];
        categories.extend(catalog.categories());
        let chip_cursor = categories
            .iter()
            .position(|chip| *chip == config.view.default_filter)
            .unwrap_or(0);

        let nav = NavMenu::new(
            Screen::ALL
                .iter()
                .map(|&screen| NavEntry {
                    label: screen.title().to_string(),
                    target: screen,
                })
                .collect(),
        );

        let debouncer = Debouncer::new(Duration::from_millis(config.view.debounce_ms));
        let contact = ContactForm::new(FieldRules::new()?);
        let home = HomeState::new(&config);

        Ok(Self {
            screen: Screen::Home,
            nav,
            help_visible: false,
            controller,
            categories,
            chip_cursor,
            search_input: String::new(),
            search_focused: false,
            debouncer,
            selected: 0,
            home,
            contact,
            banner: None,
            banner_generation: 0,
            notifications: Vec::new(),
            next_notification_id: 0,
            terminal_size: (80, 24),
            tick: 0,
            quit: false,
            config,
            log,
            started: Instant::now(),
        })
    }

    /// Append a toast, dropping the oldest beyond the configured cap.
    /// Returns the toast's id for expiry scheduling.
    pub fn push_notification(&mut self, level: NotificationLevel, message: &str) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            id,
            level,
            message: message.to_string(),
        });
        while self.notifications.len() > self.config.tui.max_notifications {
            self.notifications.remove(0);
        }
        id
    }

    /// Number of cards passing the current constraints.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.controller.visible_ids().len()
    }

    /// Clamp the list cursor into the visible range.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    /// Index of the chip matching the active filter, if it is one of ours.
    #[must_use]
    pub fn active_chip(&self) -> Option<usize> {
        let active = &self.controller.state().active_filter;
        self.categories.iter().position(|chip| chip == active)
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_numbers_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_number(screen.number()), Some(screen));
        }
        assert_eq!(Screen::from_number(0), None);
        assert_eq!(Screen::from_number(4), None);
    }

    #[test]
    fn screen_next_prev_wrap() {
        assert_eq!(Screen::Contact.next(), Screen::Home);
        assert_eq!(Screen::Home.prev(), Screen::Contact);
        let mut screen = Screen::Home;
        for _ in 0..SCREEN_COUNT {
            screen = screen.next();
        }
        assert_eq!(screen, Screen::Home);
    }

    fn model() -> BrowserModel {
        let config = Config::default();
        BrowserModel::new(config, &Catalog::sample(), LogHandle::disabled()).unwrap()
    }

    #[test]
    fn new_model_shows_the_whole_catalog() {
        let model = model();
        assert_eq!(model.screen, Screen::Home);
        assert_eq!(model.visible_count(), model.controller.len());
        assert_eq!(model.categories[0], WILDCARD_CATEGORY);
        assert_eq!(model.active_chip(), Some(0));
        // Ledger already carries the initial picture.
        assert_eq!(
            model.controller.port().visible_count(),
            model.controller.len()
        );
    }

    #[test]
    fn chips_cover_every_catalog_category() {
        let model = model();
        let catalog = Catalog::sample();
        for category in catalog.categories() {
            assert!(model.categories.contains(&category), "{category}");
        }
    }

    #[test]
    fn notifications_cap_at_the_configured_maximum() {
        let mut model = model();
        for n in 0..5 {
            model.push_notification(NotificationLevel::Info, &format!("toast {n}"));
        }
        assert_eq!(model.notifications.len(), model.config.tui.max_notifications);
        // Oldest dropped first; ids stay monotonic.
        assert_eq!(model.notifications[0].message, "toast 2");
        assert!(model.notifications.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn selection_clamps_to_visible_cards() {
        let mut model = model();
        model.selected = 100;
        model.clamp_selection();
        assert_eq!(model.selected, model.visible_count() - 1);

        model.controller.set_filter("no-such-category");
        model.clamp_selection();
        assert_eq!(model.selected, 0);
    }

    #[test]
    fn home_counters_wait_for_the_stats_band() {
        let config = Config::default();
        let mut home = HomeState::new(&config);
        home.scroll.set_extent(home_rows::CONTENT_HEIGHT, 20);

        // At the top of the page the stats band is below the fold.
        home.sweep();
        assert!(!home.counters_started);
        home.tick_counters();
        assert_eq!(home.stats[0].counter.display(), "0+");

        // Scroll the stats band fully into view.
        home.scroll.scroll_to(home_rows::STATS_TOP);
        home.sweep();
        assert!(home.counters_started);
        home.tick_counters();
        assert_ne!(home.stats[0].counter.display(), "0+");
    }

    #[test]
    fn home_reveal_is_monotonic_across_scrolling() {
        let config = Config::default();
        let mut home = HomeState::new(&config);
        home.scroll.set_extent(home_rows::CONTENT_HEIGHT, 20);

        home.scroll.scroll_to(home_rows::STATS_TOP);
        home.sweep();
        assert!(home.reveal.is_revealed(home_targets::STATS));

        home.scroll.scroll_to(0);
        home.sweep();
        assert!(home.reveal.is_revealed(home_targets::STATS));
    }
}
