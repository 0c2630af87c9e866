//! Repro: selecting the last card and then applying a narrowing chip used
//! to leave the selection past the end of the visible list, which the card
//! window then sliced out of range.

#![cfg(feature = "tui")]
#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use showroom_inventory_browser::core::catalog::Catalog;
use showroom_inventory_browser::core::config::Config;
use showroom_inventory_browser::logger::LogHandle;
use showroom_inventory_browser::tui::model::{BrowserModel, BrowserMsg};
use showroom_inventory_browser::tui::render::render;
use showroom_inventory_browser::tui::update::update;

fn press(model: &mut BrowserModel, code: KeyCode) {
    update(model, BrowserMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

#[test]
fn narrowing_filter_clamps_the_selection() {
    let mut model = BrowserModel::new(Config::default(), &Catalog::sample(), LogHandle::disabled())
        .expect("model should build");
    update(&mut model, BrowserMsg::Resize(80, 24));
    press(&mut model, KeyCode::Char('2'));

    // Walk to the last of the six cards.
    for _ in 0..5 {
        press(&mut model, KeyCode::Down);
    }
    assert_eq!(model.selected, 5);

    // all -> coupe -> sedan leaves two visible cards.
    press(&mut model, KeyCode::Right);
    press(&mut model, KeyCode::Right);
    press(&mut model, KeyCode::Enter);

    assert!(model.selected < model.visible_count());
    let frame = render(&model);
    assert!(frame.contains("Showing 2 of 6 vehicles"), "{frame}");
}
