#![allow(warnings)]
//! Declutter Frontend Entry Point

mod app;
mod commands;
mod components;
mod context;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

/// Lines kept for the in-app log viewer
const LOG_CAPACITY: usize = 500;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = ring_logger::init_logger(LOG_CAPACITY, "Declutter") {
        web_sys::console::warn_1(&format!("logger not installed: {}", err).into());
    }
    mount_to_body(App);
}
