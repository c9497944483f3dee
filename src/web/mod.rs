//! Browser implementations of the controller seams
//!
//! - `dom.rs` - DomPage: `Page` over `web_sys::Document`
//! - `fetch.rs` - FetchTransport: `Transport` over `window.fetch`
//! - `timers.rs` - BrowserEventLoop: `setTimeout` + `spawn_local`
//! - `bindings.rs` - WasmAnnotator: event listener wiring + JS exports

pub mod bindings;
pub mod dom;
pub mod fetch;
pub mod timers;

pub use bindings::WasmAnnotator;
pub use dom::DomPage;
pub use fetch::FetchTransport;
pub use timers::BrowserEventLoop;

use wasm_bindgen::JsValue;

/// Render a JS exception for log/error messages
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
