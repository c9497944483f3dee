//! View Sync: reflect the annotation record onto the page
//!
//! Rendering is a pure function of the page's candidate set and the record.
//! The `Page` trait is the DOM seam; `web::DomPage` is the browser side.

use std::rc::Rc;

use crate::console;
use crate::keywords::{keyword_markup, keyword_set};
use crate::record::{AnnotationRecord, BusyCounter, CandidateLabel};

/// Optional document navigation links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavLink {
    Next,
    Previous,
}

/// The document as seen by the controller
pub trait Page {
    /// Origin used to resolve relative endpoint addresses
    fn origin(&self) -> String;

    /// Identifiers of every candidate element, in document order
    fn candidate_ids(&self) -> Vec<String>;

    /// Make `label` the only label class on the candidate's element
    fn set_candidate_label(&self, candidate_id: &str, label: CandidateLabel);

    /// Replace the keyword region's content; no-op if the region is absent
    fn set_keyword_markup(&self, markup: &str);

    /// Show or hide the busy indicator; no-op if it is absent
    fn set_busy_visible(&self, visible: bool);

    /// Current text of the keyword input
    fn keyword_input_value(&self) -> String;

    /// Remove focus from the keyword input
    fn blur_keyword_input(&self);

    fn has_link(&self, link: NavLink) -> bool;

    /// Activate a navigation link. Returns false if the link is absent.
    fn follow_link(&self, link: NavLink) -> bool;

    /// Ask the user a yes/no question (blocking)
    fn confirm(&self, message: &str) -> bool;
}

impl<P: Page + ?Sized> Page for Rc<P> {
    fn origin(&self) -> String {
        (**self).origin()
    }

    fn candidate_ids(&self) -> Vec<String> {
        (**self).candidate_ids()
    }

    fn set_candidate_label(&self, candidate_id: &str, label: CandidateLabel) {
        (**self).set_candidate_label(candidate_id, label)
    }

    fn set_keyword_markup(&self, markup: &str) {
        (**self).set_keyword_markup(markup)
    }

    fn set_busy_visible(&self, visible: bool) {
        (**self).set_busy_visible(visible)
    }

    fn keyword_input_value(&self) -> String {
        (**self).keyword_input_value()
    }

    fn blur_keyword_input(&self) {
        (**self).blur_keyword_input()
    }

    fn has_link(&self, link: NavLink) -> bool {
        (**self).has_link(link)
    }

    fn follow_link(&self, link: NavLink) -> bool {
        (**self).follow_link(link)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Relabel every candidate from the record.
///
/// Returns whether all candidates are accepted or rejected (vacuously true
/// for a page without candidates).
pub fn render_candidate_labels<P: Page + ?Sized>(page: &P, record: &AnnotationRecord) -> bool {
    let mut all_labeled = true;
    for candidate_id in page.candidate_ids() {
        let label = record.label_for(&candidate_id);
        all_labeled &= label.is_labeled();
        page.set_candidate_label(&candidate_id, label);
    }
    all_labeled
}

/// Replace the keyword chips with the record's keyword set.
///
/// Returns false, leaving the region untouched, when the record carries no
/// keyword string.
pub fn render_keywords<P: Page + ?Sized>(page: &P, record: &AnnotationRecord) -> bool {
    let Some(raw) = record.keywords.as_deref() else {
        console::warn("[Annotator] No keyword source; keyword display not updated");
        return false;
    };
    page.set_keyword_markup(&keyword_markup(&keyword_set(raw)));
    true
}

pub fn render_busy<P: Page + ?Sized>(page: &P, busy: &BusyCounter) {
    page.set_busy_visible(busy.is_busy());
}
