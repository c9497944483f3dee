//! Annotator: one page session
//!
//! Owns the annotation record and the transient UI state (busy counter,
//! focus flag, pending keyword save). Shared between event callbacks through
//! `Rc`; no `RefCell` borrow is held across an `.await` or a page call that
//! can dispatch DOM events back into the controller.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::config::{AnnotatorConfig, ConfigError, PickOrdering};
use crate::console;
use crate::event_loop::{EventLoop, TimerHandle};
use crate::record::{AnnotationRecord, BusyCounter};
use crate::remote::Transport;
use crate::view::{render_busy, render_candidate_labels, render_keywords, Page};

// =============================================================================
// Session State
// =============================================================================

#[derive(Debug, Default)]
pub(crate) struct Session {
    pub(crate) record: AnnotationRecord,
    pub(crate) busy: BusyCounter,
    /// Every candidate accepted or rejected, as of the last label render
    pub(crate) all_labeled: bool,
    pub(crate) keyword_focused: bool,
    pub(crate) pending_save: Option<TimerHandle>,
    /// Sequence number of the most recently issued pick
    issued_picks: u64,
    /// Sequence number of the most recently applied pick response
    applied_pick: u64,
}

impl Session {
    fn new(record: AnnotationRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub(crate) fn issue_pick(&mut self) -> u64 {
        self.issued_picks += 1;
        self.issued_picks
    }

    /// Whether the response to pick `ticket` should be applied
    pub(crate) fn accept_pick(&mut self, ticket: u64, ordering: PickOrdering) -> bool {
        match ordering {
            PickOrdering::LastResponseWins => {
                self.applied_pick = self.applied_pick.max(ticket);
                true
            }
            PickOrdering::LastRequestWins => {
                if ticket <= self.applied_pick {
                    return false;
                }
                self.applied_pick = ticket;
                true
            }
        }
    }
}

struct Shared<P, T, E> {
    page: P,
    transport: T,
    event_loop: E,
    config: AnnotatorConfig,
    session: RefCell<Session>,
}

// =============================================================================
// Annotator
// =============================================================================

/// Candidate pick + keyword annotation controller
///
/// # Example
/// ```ignore
/// let annotator = Annotator::load(page, transport, event_loop, config)?;
/// annotator.handle_key("1");             // mapped hotkey -> pick
/// annotator.keywords_changed();          // debounced save
/// let picks = annotator.select_candidate("positive").await?;
/// ```
pub struct Annotator<P, T, E> {
    shared: Rc<Shared<P, T, E>>,
}

impl<P, T, E> Clone for Annotator<P, T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: Page, T: Transport, E: EventLoop> Annotator<P, T, E> {
    /// Start a session and render the host-supplied record
    pub fn load(
        page: P,
        transport: T,
        event_loop: E,
        config: AnnotatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let session = Session::new(config.metadata.clone());
        let annotator = Self {
            shared: Rc::new(Shared {
                page,
                transport,
                event_loop,
                config,
                session: RefCell::new(session),
            }),
        };
        annotator.render_all();

        console::log(&format!(
            "[Annotator] Loaded ({} candidates, {} hotkeys)",
            annotator.page().candidate_ids().len(),
            annotator.config().hotkeys.len()
        ));

        Ok(annotator)
    }

    /// Re-render labels, keywords and the busy indicator from the record
    pub fn render_all(&self) {
        let (record, busy) = {
            let session = self.session();
            (session.record.clone(), session.busy)
        };

        let all_labeled = render_candidate_labels(self.page(), &record);
        render_keywords(self.page(), &record);
        render_busy(self.page(), &busy);

        self.session_mut().all_labeled = all_labeled;
    }
}

impl<P, T, E> Annotator<P, T, E> {
    /// Snapshot of the current annotation record
    pub fn record(&self) -> AnnotationRecord {
        self.session().record.clone()
    }

    pub fn all_candidates_labeled(&self) -> bool {
        self.session().all_labeled
    }

    /// Number of in-flight remote operations
    pub fn busy_count(&self) -> u32 {
        self.session().busy.count()
    }

    pub fn keyword_input_focused(&self) -> bool {
        self.session().keyword_focused
    }

    /// A debounced keyword save is scheduled but has not fired
    pub fn has_pending_save(&self) -> bool {
        self.session().pending_save.is_some()
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.shared.config
    }

    pub fn page(&self) -> &P {
        &self.shared.page
    }

    pub(crate) fn transport(&self) -> &T {
        &self.shared.transport
    }

    pub(crate) fn event_loop(&self) -> &E {
        &self.shared.event_loop
    }

    pub(crate) fn session(&self) -> Ref<'_, Session> {
        self.shared.session.borrow()
    }

    pub(crate) fn session_mut(&self) -> RefMut<'_, Session> {
        self.shared.session.borrow_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_response_wins_accepts_everything() {
        let mut session = Session::default();
        let first = session.issue_pick();
        let second = session.issue_pick();

        assert!(session.accept_pick(second, PickOrdering::LastResponseWins));
        assert!(session.accept_pick(first, PickOrdering::LastResponseWins));
    }

    #[test]
    fn test_last_request_wins_drops_stale() {
        let mut session = Session::default();
        let first = session.issue_pick();
        let second = session.issue_pick();

        assert!(session.accept_pick(second, PickOrdering::LastRequestWins));
        assert!(!session.accept_pick(first, PickOrdering::LastRequestWins));
    }

    #[test]
    fn test_last_request_wins_in_order() {
        let mut session = Session::default();
        let first = session.issue_pick();
        let second = session.issue_pick();

        assert!(session.accept_pick(first, PickOrdering::LastRequestWins));
        assert!(session.accept_pick(second, PickOrdering::LastRequestWins));
    }
}
