//! DomPage: the live document behind the `Page` trait

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use crate::config::DomSelectors;
use crate::console;
use crate::record::CandidateLabel;
use crate::view::{NavLink, Page};

pub struct DomPage {
    window: Window,
    document: Document,
    selectors: DomSelectors,
}

impl DomPage {
    pub fn new(window: Window, document: Document, selectors: DomSelectors) -> Self {
        Self {
            window,
            document,
            selectors,
        }
    }

    /// Live candidate elements, in document order
    pub fn candidate_elements(&self) -> Vec<Element> {
        let collection = self
            .document
            .get_elements_by_class_name(&self.selectors.candidate_class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    pub fn candidate_id(&self, element: &Element) -> String {
        self.selectors.candidate_id(&element.id()).to_string()
    }

    pub fn keyword_input(&self) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(&self.selectors.keyword_input_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    /// True if the keyword input is the document's active element
    pub fn keyword_input_has_focus(&self) -> bool {
        match (self.document.active_element(), self.keyword_input()) {
            (Some(active), Some(input)) => {
                AsRef::<wasm_bindgen::JsValue>::as_ref(&active)
                    == AsRef::<wasm_bindgen::JsValue>::as_ref(&input)
            }
            _ => false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn link_id(&self, link: NavLink) -> &str {
        match link {
            NavLink::Next => &self.selectors.next_link_id,
            NavLink::Previous => &self.selectors.prev_link_id,
        }
    }
}

impl Page for DomPage {
    fn origin(&self) -> String {
        self.window.location().origin().unwrap_or_default()
    }

    fn candidate_ids(&self) -> Vec<String> {
        self.candidate_elements()
            .iter()
            .map(|el| self.candidate_id(el))
            .collect()
    }

    fn set_candidate_label(&self, candidate_id: &str, label: CandidateLabel) {
        for element in self.candidate_elements() {
            if self.candidate_id(&element) != candidate_id {
                continue;
            }
            let classes = element.class_list();
            for other in CandidateLabel::ALL.iter().filter(|l| **l != label) {
                let _ = classes.remove_1(other.class_name());
            }
            if let Err(e) = classes.add_1(label.class_name()) {
                console::error(&format!(
                    "[DomPage] Failed to label candidate {}: {}",
                    candidate_id,
                    super::describe_js(&e)
                ));
            }
        }
    }

    fn set_keyword_markup(&self, markup: &str) {
        if let Some(row) = self.document.get_element_by_id(&self.selectors.keywords_row_id) {
            row.set_inner_html(markup);
        }
    }

    fn set_busy_visible(&self, visible: bool) {
        if let Some(spinner) = self.html_element(&self.selectors.spinner_id) {
            let display = if visible { "inline" } else { "none" };
            let _ = spinner.style().set_property("display", display);
        }
    }

    fn keyword_input_value(&self) -> String {
        self.keyword_input().map(|input| input.value()).unwrap_or_default()
    }

    fn blur_keyword_input(&self) {
        if let Some(input) = self.keyword_input() {
            let _ = input.blur();
        }
    }

    fn has_link(&self, link: NavLink) -> bool {
        self.document.get_element_by_id(self.link_id(link)).is_some()
    }

    fn follow_link(&self, link: NavLink) -> bool {
        match self.html_element(self.link_id(link)) {
            Some(anchor) => {
                anchor.click();
                true
            }
            None => false,
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}
