//! Dialog Helpers
//!
//! Keyboard handling shared by the bottom sheets: Escape closes, Tab stays
//! inside, and the first control takes focus when the sheet opens.

use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use declutter_core::dialog::{dialog_key, DialogKey};

const FOCUSABLE: &str = "button:not([disabled]), input:not([disabled]), select:not([disabled]), \
                         textarea:not([disabled]), a[href], [tabindex]:not([tabindex=\"-1\"])";

fn focusable_elements(container: &web_sys::Element) -> Vec<web_sys::HtmlElement> {
    let Ok(nodes) = container.query_selector_all(FOCUSABLE) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect()
}

/// Focus the first control of `sheet` once it is mounted
pub fn focus_first_on_open(sheet: NodeRef<Div>) {
    Effect::new(move |_| {
        if let Some(el) = sheet.get() {
            if let Some(first) = focusable_elements(&el).first() {
                let _ = first.focus();
            }
        }
    });
}

/// Create keydown handler for a sheet: Escape runs `on_close`, Tab wraps
pub fn make_on_dialog_keydown(
    sheet: NodeRef<Div>,
    on_close: Callback<()>,
) -> impl Fn(web_sys::KeyboardEvent) + Copy + 'static {
    move |ev: web_sys::KeyboardEvent| {
        let Some(el) = sheet.get_untracked() else {
            return;
        };
        let elements = focusable_elements(&el);
        let active = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element());
        let focused = active
            .as_ref()
            .and_then(|a| elements.iter().position(|e| e.is_same_node(Some(a.as_ref()))));

        match dialog_key(&ev.key(), ev.shift_key(), focused, elements.len()) {
            DialogKey::Close => {
                ev.prevent_default();
                on_close.run(());
            }
            DialogKey::Focus(i) => {
                ev.prevent_default();
                if let Some(target) = elements.get(i) {
                    let _ = target.focus();
                }
            }
            DialogKey::Pass => {}
        }
    }
}
