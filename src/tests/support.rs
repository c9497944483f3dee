//! In-memory fakes of the Page / Transport / EventLoop seams

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;
use url::Url;

use crate::config::AnnotatorConfig;
use crate::controller::Annotator;
use crate::event_loop::{EventLoop, TimerHandle};
use crate::keywords::KEYWORD_CLASS;
use crate::record::CandidateLabel;
use crate::remote::{RemoteError, Transport};
use crate::view::{NavLink, Page};

pub const ORIGIN: &str = "http://annotator.test";
pub const PICK_URL: &str = "/sentanno/demo/doc-1/pick";
pub const KEYWORDS_URL: &str = "/sentanno/demo/doc-1/keywords";

/// Judgment options offered by the demo server
pub const OPTIONS: [&str; 4] = ["positive", "neutral", "negative", "unclear"];
pub const CLEAR: &str = "clear";

/// Config with the demo endpoints and number-row hotkeys
pub fn test_config() -> AnnotatorConfig {
    AnnotatorConfig::new(PICK_URL, KEYWORDS_URL)
        .with_hotkey("1", "positive")
        .with_hotkey("2", "neutral")
        .with_hotkey("3", "negative")
        .with_hotkey("4", "unclear")
        .with_hotkey("z", CLEAR)
}

// =============================================================================
// FakePage
// =============================================================================

pub struct FakePage {
    candidates: Vec<String>,
    labels: RefCell<HashMap<String, CandidateLabel>>,
    keyword_markup: RefCell<Option<String>>,
    busy_visible: Cell<bool>,
    busy_history: RefCell<Vec<bool>>,
    input_value: RefCell<String>,
    blur_count: Cell<usize>,
    links: HashSet<NavLink>,
    followed: RefCell<Vec<NavLink>>,
    confirm_answer: Cell<bool>,
    prompts: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn with_candidates(ids: &[&str]) -> Self {
        Self {
            candidates: ids.iter().map(|s| s.to_string()).collect(),
            labels: RefCell::new(HashMap::new()),
            keyword_markup: RefCell::new(None),
            busy_visible: Cell::new(false),
            busy_history: RefCell::new(Vec::new()),
            input_value: RefCell::new(String::new()),
            blur_count: Cell::new(0),
            links: HashSet::new(),
            followed: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(false),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Page with one candidate per judgment option and both nav links
    pub fn demo() -> Self {
        Self::with_candidates(&OPTIONS).with_links(&[NavLink::Next, NavLink::Previous])
    }

    pub fn with_links(mut self, links: &[NavLink]) -> Self {
        self.links = links.iter().copied().collect();
        self
    }

    pub fn label(&self, candidate_id: &str) -> Option<CandidateLabel> {
        self.labels.borrow().get(candidate_id).copied()
    }

    /// Decoded-but-still-escaped text of each rendered keyword chip
    pub fn keyword_chips(&self) -> Vec<String> {
        let open = format!("<span class=\"{}\">", KEYWORD_CLASS);
        self.keyword_markup
            .borrow()
            .as_deref()
            .unwrap_or("")
            .split("</span>")
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.strip_prefix(open.as_str()).unwrap_or(chunk).to_string())
            .collect()
    }

    pub fn keyword_markup(&self) -> Option<String> {
        self.keyword_markup.borrow().clone()
    }

    pub fn busy_visible(&self) -> bool {
        self.busy_visible.get()
    }

    pub fn busy_history(&self) -> Vec<bool> {
        self.busy_history.borrow().clone()
    }

    pub fn type_keywords(&self, text: &str) {
        *self.input_value.borrow_mut() = text.to_string();
    }

    pub fn blur_count(&self) -> usize {
        self.blur_count.get()
    }

    pub fn followed(&self) -> Vec<NavLink> {
        self.followed.borrow().clone()
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Page for FakePage {
    fn origin(&self) -> String {
        ORIGIN.to_string()
    }

    fn candidate_ids(&self) -> Vec<String> {
        self.candidates.clone()
    }

    fn set_candidate_label(&self, candidate_id: &str, label: CandidateLabel) {
        self.labels.borrow_mut().insert(candidate_id.to_string(), label);
    }

    fn set_keyword_markup(&self, markup: &str) {
        *self.keyword_markup.borrow_mut() = Some(markup.to_string());
    }

    fn set_busy_visible(&self, visible: bool) {
        self.busy_visible.set(visible);
        self.busy_history.borrow_mut().push(visible);
    }

    fn keyword_input_value(&self) -> String {
        self.input_value.borrow().clone()
    }

    fn blur_keyword_input(&self) {
        self.blur_count.set(self.blur_count.get() + 1);
    }

    fn has_link(&self, link: NavLink) -> bool {
        self.links.contains(&link)
    }

    fn follow_link(&self, link: NavLink) -> bool {
        if !self.links.contains(&link) {
            return false;
        }
        self.followed.borrow_mut().push(link);
        true
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }
}

// =============================================================================
// FakeTransport
// =============================================================================

type Responder = Box<dyn Fn(&Url) -> Result<Value, RemoteError>>;
type Reply = Result<Value, RemoteError>;

/// Records every request. Answers immediately through a responder, or holds
/// each request open until the test resolves it.
pub struct FakeTransport {
    requests: RefCell<Vec<Url>>,
    responder: Option<Responder>,
    held: RefCell<Vec<Option<oneshot::Sender<Reply>>>>,
}

impl FakeTransport {
    pub fn responding(responder: impl Fn(&Url) -> Reply + 'static) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            responder: Some(Box::new(responder)),
            held: RefCell::new(Vec::new()),
        }
    }

    pub fn holding() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            responder: None,
            held: RefCell::new(Vec::new()),
        }
    }

    /// Behaves like the annotation server's pick/keyword endpoints
    pub fn demo_server() -> Self {
        Self::responding(demo_server_reply)
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Resolve the `index`-th held request
    pub fn reply(&self, index: usize, reply: Reply) {
        let sender = self.held.borrow_mut()[index].take().expect("request already answered");
        let _ = sender.send(reply);
    }

    /// Resolve the held request whose query has `name=value`
    pub fn reply_where(&self, name: &str, value: &str, reply: Reply) {
        let index = self
            .requests
            .borrow()
            .iter()
            .position(|url| query_param(url, name).as_deref() == Some(value))
            .expect("no matching request");
        self.reply(index, reply);
    }
}

impl Transport for FakeTransport {
    fn get_json(&self, url: Url) -> LocalBoxFuture<'static, Result<Value, RemoteError>> {
        self.requests.borrow_mut().push(url.clone());

        if let Some(responder) = &self.responder {
            let reply = responder(&url);
            return Box::pin(async move { reply });
        }

        let (tx, rx) = oneshot::channel();
        self.held.borrow_mut().push(Some(tx));
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(RemoteError::Network("request abandoned".to_string())))
        })
    }
}

/// First value of query parameter `name`
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn demo_server_reply(url: &Url) -> Reply {
    if let Some(choice) = query_param(url, "choice") {
        return Ok(pick_reply(&choice));
    }
    if let Some(keywords) = query_param(url, "keywords") {
        return Ok(json!({ "keywords": keywords }));
    }
    Err(RemoteError::Status(400))
}

/// Picking an option accepts it and rejects the rest; anything else clears
pub fn pick_reply(choice: &str) -> Value {
    if OPTIONS.contains(&choice) {
        let rejected: Vec<&str> = OPTIONS.iter().copied().filter(|o| *o != choice).collect();
        json!({ "accepted": [choice], "rejected": rejected })
    } else {
        json!({ "accepted": [], "rejected": [] })
    }
}

// =============================================================================
// FakeEventLoop
// =============================================================================

struct Timer {
    handle: TimerHandle,
    due: u64,
    callback: Box<dyn FnOnce()>,
}

/// Manual clock + single-threaded executor
pub struct FakeEventLoop {
    now: Cell<u64>,
    next_handle: Cell<u32>,
    timers: RefCell<Vec<Timer>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

impl FakeEventLoop {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            now: Cell::new(0),
            next_handle: Cell::new(1),
            timers: RefCell::new(Vec::new()),
            pool: RefCell::new(pool),
            spawner,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Poll spawned tasks until none can make progress
    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let earliest = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                earliest.map(|i| timers.remove(i))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            (timer.callback)();
            self.run_until_stalled();
        }
        self.now.set(target);
        self.run_until_stalled();
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.pool.borrow_mut().run_until(future)
    }
}

impl EventLoop for FakeEventLoop {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.timers.borrow_mut().push(Timer {
            handle,
            due: self.now.get() + delay_ms as u64,
            callback,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.timers.borrow_mut().retain(|t| t.handle != handle);
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("executor shut down");
    }
}

// =============================================================================
// Harness
// =============================================================================

pub type TestAnnotator = Annotator<Rc<FakePage>, Rc<FakeTransport>, Rc<FakeEventLoop>>;

pub struct Harness {
    pub page: Rc<FakePage>,
    pub transport: Rc<FakeTransport>,
    pub event_loop: Rc<FakeEventLoop>,
    pub annotator: TestAnnotator,
}

impl Harness {
    pub fn new(page: FakePage, transport: FakeTransport, config: AnnotatorConfig) -> Self {
        let page = Rc::new(page);
        let transport = Rc::new(transport);
        let event_loop = Rc::new(FakeEventLoop::new());
        let annotator = Annotator::load(
            Rc::clone(&page),
            Rc::clone(&transport),
            Rc::clone(&event_loop),
            config,
        )
        .expect("valid test config");

        Self {
            page,
            transport,
            event_loop,
            annotator,
        }
    }

    /// Demo page + demo server + default test config
    pub fn demo() -> Self {
        Self::new(FakePage::demo(), FakeTransport::demo_server(), test_config())
    }
}
