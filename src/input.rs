//! Input Controller: clicks, hotkeys and keyword edits
//!
//! Handlers are synchronous; remote work is spawned onto the event loop.
//! Errors from spawned mutations are already logged by the mutator and are
//! dropped here.

use crate::console;
use crate::controller::Annotator;
use crate::event_loop::EventLoop;
use crate::remote::Transport;
use crate::view::{NavLink, Page};

pub const KEY_ENTER: &str = "Enter";
pub const KEY_ARROW_RIGHT: &str = "ArrowRight";
pub const KEY_ARROW_LEFT: &str = "ArrowLeft";

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a bound key (or typed into the keyword field)
    Ignored,
    /// Enter while typing: the keyword field lost focus
    BlurredInput,
    /// Hotkey dispatched a pick for this candidate
    Picked(String),
    Navigated(NavLink),
    /// Unlabeled candidates remain and the user declined to leave
    NavigationDeclined,
    /// Navigation key pressed but the page has no such link
    NoLink(NavLink),
}

impl KeyOutcome {
    /// Whether the browser's default handling and propagation must be
    /// suppressed
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored | KeyOutcome::BlurredInput)
    }
}

impl<P, T, E> Annotator<P, T, E>
where
    P: Page + 'static,
    T: Transport + 'static,
    E: EventLoop + 'static,
{
    /// Dispatch a key-down (`KeyboardEvent.key`)
    pub fn handle_key(&self, key: &str) -> KeyOutcome {
        let (focused, hotkey, all_labeled) = {
            let session = self.session();
            (
                session.keyword_focused,
                self.config().hotkeys.get(key).cloned(),
                session.all_labeled,
            )
        };

        if focused {
            if key == KEY_ENTER {
                self.page().blur_keyword_input();
                return KeyOutcome::BlurredInput;
            }
            return KeyOutcome::Ignored;
        }

        if let Some(candidate_id) = hotkey {
            self.spawn_pick(candidate_id.clone());
            return KeyOutcome::Picked(candidate_id);
        }

        match key {
            KEY_ENTER | KEY_ARROW_RIGHT => self.navigate_next(all_labeled),
            KEY_ARROW_LEFT => self.navigate(NavLink::Previous),
            _ => KeyOutcome::Ignored,
        }
    }

    /// A candidate element was clicked
    pub fn candidate_clicked(&self, candidate_id: &str) {
        self.spawn_pick(candidate_id.to_string());
    }

    /// The keyword field gained or lost focus
    pub fn keyword_focus_changed(&self, focused: bool) {
        self.session_mut().keyword_focused = focused;
    }

    /// The keyword field was edited: (re)schedule the save.
    ///
    /// Only the last edit within `debounce_ms` reaches the server, carrying
    /// the field's value when the timer fires.
    pub fn keywords_changed(&self) {
        let previous = self.session_mut().pending_save.take();
        if let Some(previous) = previous {
            self.event_loop().clear_timeout(previous);
        }

        let this = self.clone();
        let handle = self.event_loop().set_timeout(
            self.config().debounce_ms,
            Box::new(move || this.flush_keywords()),
        );
        self.session_mut().pending_save = Some(handle);
    }

    fn flush_keywords(&self) {
        self.session_mut().pending_save = None;
        let text = self.page().keyword_input_value();

        let this = self.clone();
        self.event_loop().spawn_local(Box::pin(async move {
            let _ = this.save_keywords(&text).await;
        }));
    }

    fn spawn_pick(&self, candidate_id: String) {
        let this = self.clone();
        self.event_loop().spawn_local(Box::pin(async move {
            let _ = this.select_candidate(&candidate_id).await;
        }));
    }

    fn navigate_next(&self, all_labeled: bool) -> KeyOutcome {
        if !self.page().has_link(NavLink::Next) {
            return KeyOutcome::NoLink(NavLink::Next);
        }
        if !all_labeled && !self.page().confirm(&self.config().confirm_message) {
            console::log("[Annotator] Navigation cancelled with unlabeled candidates");
            return KeyOutcome::NavigationDeclined;
        }
        self.navigate(NavLink::Next)
    }

    fn navigate(&self, link: NavLink) -> KeyOutcome {
        if self.page().follow_link(link) {
            KeyOutcome::Navigated(link)
        } else {
            KeyOutcome::NoLink(link)
        }
    }
}
