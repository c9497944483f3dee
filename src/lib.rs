//! Sentanno UI: Candidate Pick + Keyword Annotation Controller
//!
//! A Rust/WASM implementation of the sentanno browser-side interaction layer.
//! Keeps a document's annotation record (accepted/rejected candidates, keyword
//! string) in sync between the page and the annotation server.
//!
//! # Architecture
//! - `record.rs` - AnnotationRecord, CandidateLabel, BusyCounter, endpoint payloads
//! - `keywords.rs` - Keyword set normalization and HTML escaping
//! - `config.rs` - Host-supplied configuration and DOM selectors
//! - `view.rs` - `Page` seam + View Sync (labels, keyword chips, busy indicator)
//! - `remote.rs` - `Transport` seam + Remote Mutator (pick, keyword save, URL building)
//! - `event_loop.rs` - `EventLoop` seam (timers, local task spawning)
//! - `controller.rs` - `Annotator` session state and initialization
//! - `input.rs` - Input Controller (hotkeys, clicks, debounced keyword edits)
//! - `web/` - Browser implementations of the seams + `WasmAnnotator` export
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { WasmAnnotator } from 'sentanno-ui';
//!
//! await init();
//!
//! const annotator = WasmAnnotator.load({
//!   metadata: METADATA,
//!   pickUrl: PICK_ANNO_URL,
//!   saveKeywordsUrl: SAVE_KEYWORDS_URL,
//!   hotkeys: HOTKEYS,
//! });
//!
//! // Drive a pick directly (normally bound to clicks/hotkeys)
//! const picks = await annotator.selectCandidate('positive');
//! console.log(picks.accepted, annotator.allCandidatesLabeled());
//! ```

pub mod config;
pub mod console;
pub mod controller;
pub mod event_loop;
pub mod input;
pub mod keywords;
pub mod record;
pub mod remote;
pub mod view;
pub mod web;

#[cfg(test)]
mod tests;

pub use config::*;
pub use controller::*;
pub use event_loop::*;
pub use input::*;
pub use keywords::*;
pub use record::*;
pub use remote::*;
pub use view::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("sentanno-ui v{}", env!("CARGO_PKG_VERSION"))
}
