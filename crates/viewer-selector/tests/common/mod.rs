//! Recording doubles for the dialog surface and the peer transport

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use viewer_selector::{
    DialogSurface, HostRequest, Origin, PeerTransport, SelectorResult, ViewerSelector,
};

pub const PEER_ORIGIN: &str = "https://embed.whatcardboard.com";

/// Everything the fake page observed
#[derive(Default)]
pub struct PageLog {
    pub delivered: RefCell<Vec<(HostRequest, Origin)>>,
    pub parent: RefCell<Option<String>>,
    pub displayed: Cell<bool>,
    pub reparents: Cell<usize>,
    pub removed: Cell<bool>,
}

impl PageLog {
    pub fn delivered_requests(&self) -> Vec<HostRequest> {
        self.delivered.borrow().iter().map(|(r, _)| *r).collect()
    }
}

pub struct MockDialog(pub Rc<PageLog>);

impl DialogSurface for MockDialog {
    type Container = str;

    fn reparent(&self, container: &str) -> SelectorResult<()> {
        self.0.parent.replace(Some(container.to_string()));
        self.0.reparents.set(self.0.reparents.get() + 1);
        Ok(())
    }

    fn set_visible(&self, visible: bool) {
        self.0.displayed.set(visible);
    }

    fn remove(&self) {
        self.0.parent.replace(None);
        self.0.removed.set(true);
    }
}

pub struct MockTransport(pub Rc<PageLog>);

impl PeerTransport for MockTransport {
    fn post(&self, request: &HostRequest, target_origin: &Origin) -> SelectorResult<()> {
        self.0
            .delivered
            .borrow_mut()
            .push((*request, target_origin.clone()));
        Ok(())
    }
}

pub type TestSelector = ViewerSelector<MockDialog, MockTransport>;

/// Route `tracing` output to the test harness; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn selector() -> (TestSelector, Rc<PageLog>) {
    init_tracing();
    let log = Rc::new(PageLog::default());
    let selector = ViewerSelector::new(
        MockDialog(Rc::clone(&log)),
        MockTransport(Rc::clone(&log)),
        Origin::parse(PEER_ORIGIN).expect("valid origin"),
    );
    (selector, log)
}

pub fn peer() -> Origin {
    Origin::from(PEER_ORIGIN)
}
