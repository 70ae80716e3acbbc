//! TutorHub: the peer-tutoring side of the farm and tutoring dashboard.
//!
//! The core is a small append-only [`store::RecordStore`] used for reviews,
//! plagiarism scan results and violation reports, each mirrored to a
//! [`storage::KeyValueStorage`] backend (browser localStorage on the client,
//! sqlite on the server). [`access::AccessGate`] guards the premium pages.

pub mod access;
pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;

    console_error_panic_hook::set_once();
    leptos::mount_to_body(App);
}
