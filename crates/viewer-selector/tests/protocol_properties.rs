//! Property tests for queueing, origin authentication and visibility

mod common;

use common::{peer, selector, PEER_ORIGIN};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::rc::Rc;
use viewer_selector::{DeviceProfile, HostRequest, Origin, SelectorEvent};

/// Public operations a host or peer can drive
#[derive(Debug, Clone)]
enum Op {
    Show,
    Hide,
    Query,
    Load,
    Ready(bool),
}

fn request() -> impl Strategy<Value = HostRequest> {
    prop_oneof![Just(HostRequest::Present), Just(HostRequest::Query)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Show),
        Just(Op::Hide),
        Just(Op::Query),
        Just(Op::Load),
        any::<bool>().prop_map(Op::Ready),
    ]
}

fn drive(selector: &common::TestSelector, ops: Vec<Op>) {
    for op in ops {
        match op {
            Op::Show => selector.show("A").unwrap(),
            Op::Hide => selector.hide(),
            Op::Query => selector.query_current_viewer_profile(),
            Op::Load => selector.on_peer_load(),
            Op::Ready(presentable) => selector.handle_message(
                &peer(),
                &json!({"type": "ready", "presentable": presentable}),
            ),
        }
    }
}

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,12}".prop_map(Value::from),
        prop_oneof![Just("ready"), Just("deviceprofile")].prop_map(Value::from),
    ]
}

fn message_shape() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map(
                prop_oneof![
                    Just("type".to_string()),
                    Just("profile".to_string()),
                    Just("presentable".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..4,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn foreign_origin() -> impl Strategy<Value = String> {
    "(https?)://[a-z]{1,10}\\.[a-z]{2,3}(:[0-9]{2,4})?".prop_filter("must differ from the peer", |o| {
        o != PEER_ORIGIN
    })
}

proptest! {
    #[test]
    fn queued_requests_arrive_in_send_order(requests in prop::collection::vec(request(), 0..32)) {
        let (selector, log) = selector();
        let channel = selector.channel();

        for request in &requests {
            channel.send(*request);
        }
        prop_assert!(log.delivered.borrow().is_empty());

        channel.on_load();
        prop_assert_eq!(log.delivered_requests(), requests);
    }

    #[test]
    fn foreign_origins_never_reach_dispatch(origin in foreign_origin(), raw in message_shape()) {
        let (selector, log) = selector();
        let profiles = Rc::new(std::cell::Cell::new(0));
        let counter = Rc::clone(&profiles);
        selector.on(
            SelectorEvent::Profile,
            Rc::new(move |_: &DeviceProfile| counter.set(counter.get() + 1)),
        );

        selector.show("A").unwrap();
        selector.on_peer_load();

        prop_assert_eq!(selector.channel().receive(&Origin::from(origin.as_str()), &raw), None);
        selector.handle_message(&Origin::from(origin.as_str()), &raw);
        selector.handle_message(&Origin::from(origin.as_str()), &json!({"type": "ready", "presentable": true}));

        prop_assert_eq!(profiles.get(), 0);
        prop_assert!(!log.displayed.get());
    }

    #[test]
    fn reset_after_ready_buffers_next_send(loads in 1usize..4, req in request()) {
        let (selector, log) = selector();
        let channel = selector.channel();
        for _ in 0..loads {
            channel.on_load();
        }
        prop_assert!(channel.is_ready());

        channel.reset_queue();
        channel.send(req);

        prop_assert!(log.delivered.borrow().is_empty());
        prop_assert_eq!(channel.pending(), 1);
    }

    #[test]
    fn hide_always_hides(ops in prop::collection::vec(op(), 0..24)) {
        let (selector, log) = selector();
        drive(&selector, ops);

        selector.hide();
        prop_assert!(!log.displayed.get());
        prop_assert!(!selector.is_showing());
    }

    #[test]
    fn presentable_ready_reveals_only_while_showing(ops in prop::collection::vec(op(), 0..24)) {
        let (selector, log) = selector();
        drive(&selector, ops);

        let was_displayed = log.displayed.get();
        let showing = selector.is_showing();
        selector.handle_message(&peer(), &json!({"type": "ready", "presentable": true}));
        prop_assert_eq!(log.displayed.get(), showing || was_displayed);
        prop_assert!(!(log.displayed.get() && !showing));
    }
}
