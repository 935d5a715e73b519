//! Platform layer
//!
//! `Presenter` implementations:
//! - `headless`: records every call (native builds, tests)
//! - `web`: DOM elements and input wiring (wasm32 only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessPresenter;
