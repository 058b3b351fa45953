//! UI Components
//!
//! Screens, sheets and small widgets of the declutter app.

use wasm_bindgen::JsCast;

mod bottom_nav;
mod box_picker_sheet;
mod boxes_view;
mod celebration;
mod config_error;
mod dialog;
mod discard_sheet;
mod header_badges;
mod item_row;
mod piles_view;
mod settings_view;
mod sign_in;
mod sort_view;
mod stats_view;
mod swipe_card;
mod toast_stack;
mod upload_panel;

pub use bottom_nav::{BottomNav, Screen};
pub use box_picker_sheet::BoxPickerSheet;
pub use boxes_view::BoxesView;
pub use celebration::Celebration;
pub use config_error::ConfigError;
pub use discard_sheet::DiscardSheet;
pub use header_badges::HeaderBadges;
pub use item_row::ItemRow;
pub use piles_view::PilesView;
pub use settings_view::SettingsView;
pub use sign_in::SignIn;
pub use sort_view::SortView;
pub use stats_view::StatsView;
pub use swipe_card::SwipeCard;
pub use toast_stack::ToastStack;
pub use upload_panel::UploadPanel;

/// Current value of the input element that fired `ev`
pub(crate) fn input_value(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}
