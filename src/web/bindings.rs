//! WasmAnnotator: browser entry point
//!
//! Decodes the host configuration, binds candidate clicks, keyword input
//! events and document key-downs to an `Annotator`, and exposes the
//! mutations as promise-returning methods.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Event, EventTarget, KeyboardEvent};

use super::{BrowserEventLoop, DomPage, FetchTransport};
use crate::config::{AnnotatorConfig, ConfigError};
use crate::controller::Annotator;

pub type BrowserAnnotator = Annotator<DomPage, FetchTransport, BrowserEventLoop>;

// =============================================================================
// Listener
// =============================================================================

/// An event listener that unregisters itself on drop
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

// =============================================================================
// WasmAnnotator
// =============================================================================

/// Annotation controller bound to the current document
///
/// # Example (JavaScript)
/// ```javascript
/// const annotator = WasmAnnotator.load({
///   metadata: METADATA,
///   pickUrl: PICK_ANNO_URL,
///   saveKeywordsUrl: SAVE_KEYWORDS_URL,
///   hotkeys: HOTKEYS,
/// });
/// ```
#[wasm_bindgen]
pub struct WasmAnnotator {
    annotator: BrowserAnnotator,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WasmAnnotator {
    /// Bind to the document and render the initial record
    #[wasm_bindgen]
    pub fn load(config: JsValue) -> Result<WasmAnnotator, JsValue> {
        let config: AnnotatorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let page = DomPage::new(window.clone(), document.clone(), config.selectors.clone());
        let keyword_input = page.keyword_input().ok_or_else(|| {
            JsValue::from_str(&format!(
                "Keyword input #{} not found",
                config.selectors.keyword_input_id
            ))
        })?;
        let candidates: Vec<_> = page
            .candidate_elements()
            .into_iter()
            .map(|el| {
                let id = page.candidate_id(&el);
                (el, id)
            })
            .collect();
        let input_focused = page.keyword_input_has_focus();

        let annotator = Annotator::load(
            page,
            FetchTransport::new(window.clone()),
            BrowserEventLoop::new(window),
            config,
        )?;
        // an input focused before load (autofocus) never reaches the focus listener
        annotator.keyword_focus_changed(input_focused);

        let mut listeners = Vec::with_capacity(candidates.len() + 4);

        for (element, candidate_id) in candidates {
            let a = annotator.clone();
            listeners.push(Listener::attach(&element, "click", move |_| {
                a.candidate_clicked(&candidate_id)
            })?);
        }

        let a = annotator.clone();
        listeners.push(Listener::attach(&keyword_input, "input", move |_| {
            a.keywords_changed()
        })?);
        let a = annotator.clone();
        listeners.push(Listener::attach(&keyword_input, "focus", move |_| {
            a.keyword_focus_changed(true)
        })?);
        let a = annotator.clone();
        listeners.push(Listener::attach(&keyword_input, "blur", move |_| {
            a.keyword_focus_changed(false)
        })?);

        let a = annotator.clone();
        listeners.push(Listener::attach(&document, "keydown", move |event: Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if a.handle_key(&key_event.key()).suppresses_default() {
                event.prevent_default();
                event.stop_propagation();
            }
        })?);

        Ok(WasmAnnotator {
            annotator,
            _listeners: listeners,
        })
    }

    /// Pick a candidate; resolves with `{accepted, rejected}`
    #[wasm_bindgen(js_name = selectCandidate)]
    pub fn select_candidate(&self, candidate_id: String) -> js_sys::Promise {
        let annotator = self.annotator.clone();
        future_to_promise(async move {
            let response = annotator.select_candidate(&candidate_id).await?;
            serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    /// Save keyword text; resolves with `{keywords}`
    #[wasm_bindgen(js_name = saveKeywords)]
    pub fn save_keywords(&self, text: String) -> js_sys::Promise {
        let annotator = self.annotator.clone();
        future_to_promise(async move {
            let response = annotator.save_keywords(&text).await?;
            serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    /// Dispatch a key as if pressed; returns whether it was consumed
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        self.annotator.handle_key(key).suppresses_default()
    }

    /// Current annotation record `{accepted, rejected, keywords}`
    #[wasm_bindgen]
    pub fn record(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.annotator.record())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Re-render every view from the record
    #[wasm_bindgen]
    pub fn render(&self) {
        self.annotator.render_all();
    }

    #[wasm_bindgen(js_name = allCandidatesLabeled)]
    pub fn all_candidates_labeled(&self) -> bool {
        self.annotator.all_candidates_labeled()
    }

    #[wasm_bindgen(js_name = busyCount)]
    pub fn busy_count(&self) -> u32 {
        self.annotator.busy_count()
    }

    #[wasm_bindgen(js_name = keywordInputFocused)]
    pub fn keyword_input_focused(&self) -> bool {
        self.annotator.keyword_input_focused()
    }

    #[wasm_bindgen(js_name = hasPendingSave)]
    pub fn has_pending_save(&self) -> bool {
        self.annotator.has_pending_save()
    }
}
