//! Tests for inbound routing and host -> page calls.

use std::cell::RefCell;
use std::rc::Rc;

use weave_common::WebViewError;

use super::*;

fn bridge() -> JsBridge {
    JsBridge::new(BridgeScript::new("weaveBridge", NativeChannel::MessagePort))
}

fn raw(method: &str, payload: &str, callback: Option<&str>) -> String {
    let mut msg = BridgeMessage::new(method, payload);
    msg.callback_id = callback.map(str::to_string);
    msg.encode().unwrap()
}

/// Pull the encoded message back out of a `dispatch(...)` script.
fn dispatched_message(script: &str) -> BridgeMessage {
    let start = script.find("b.dispatch(").unwrap() + "b.dispatch(".len();
    let end = script.rfind("); }").unwrap();
    let encoded: String = serde_json::from_str(&script[start..end]).unwrap();
    BridgeMessage::decode(&encoded).unwrap()
}

struct Echo;

impl BridgeHandler for Echo {
    fn method_name(&self) -> &str {
        "echo"
    }

    fn handle(&self, message: &BridgeMessage) -> Option<String> {
        Some(message.payload.clone())
    }
}

#[test]
fn malformed_messages_are_dropped() {
    let bridge = bridge();
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    bridge.register_fn("m", move |_| {
        *counter.borrow_mut() += 1;
        None
    });

    for input in ["", "garbage", "{\"methodName\":\"\"}", "[1,2]", "{\"payload\":\"x\"}"] {
        assert_eq!(bridge.receive(input), None);
    }
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn fire_and_forget_call_produces_no_reply() {
    let bridge = bridge();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bridge.register_fn("log", move |msg| {
        sink.borrow_mut().push(msg.payload.clone());
        Some("ignored".into())
    });

    assert_eq!(bridge.receive(&raw("log", "hello", None)), None);
    assert_eq!(*seen.borrow(), vec!["hello".to_string()]);
}

#[test]
fn call_with_callback_is_answered() {
    let bridge = bridge();
    bridge.register(Echo);

    let script = bridge.receive(&raw("echo", "a\"b", Some("p7"))).unwrap();
    assert!(script.contains(r#"b.resolve("p7", "a\"b")"#));
}

#[test]
fn handler_without_result_resolves_empty() {
    let bridge = bridge();
    bridge.register_fn("noop", |_| None);

    let script = bridge.receive(&raw("noop", "", Some("p1"))).unwrap();
    assert!(script.contains(r#"b.resolve("p1", "")"#));
}

#[test]
fn unknown_method_still_resolves_pending_page_call() {
    let bridge = bridge();
    assert_eq!(bridge.receive(&raw("missing", "", None)), None);

    let script = bridge.receive(&raw("missing", "", Some("p2"))).unwrap();
    assert!(script.contains(r#"b.resolve("p2", "")"#));
}

#[test]
fn concurrent_page_calls_get_their_own_answers() {
    let bridge = bridge();
    bridge.register(Echo);

    let first = bridge.receive(&raw("echo", "one", Some("p1"))).unwrap();
    let second = bridge.receive(&raw("echo", "two", Some("p2"))).unwrap();
    assert!(first.contains(r#"("p1", "one")"#));
    assert!(second.contains(r#"("p2", "two")"#));
}

#[test]
fn host_call_resolves_on_reply() {
    let bridge = bridge();
    let answer = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&answer);

    let script = bridge
        .call("getTitle", "", move |payload| {
            *slot.borrow_mut() = Some(payload);
        })
        .unwrap();
    assert_eq!(bridge.pending_calls(), 1);

    let sent = dispatched_message(&script);
    assert_eq!(sent.method_name, "getTitle");
    let id = sent.callback_id.unwrap();

    let reply = BridgeMessage::reply(id.clone(), "Example Domain").encode().unwrap();
    assert_eq!(bridge.receive(&reply), None);
    assert_eq!(answer.borrow().as_deref(), Some("Example Domain"));
    assert_eq!(bridge.pending_calls(), 0);

    // A duplicate reply finds nothing to resolve.
    let again = Rc::clone(&answer);
    *again.borrow_mut() = None;
    bridge.receive(&BridgeMessage::reply(id, "late").encode().unwrap());
    assert_eq!(answer.borrow().as_deref(), None);
}

#[test]
fn out_of_order_replies_reach_the_right_caller() {
    let bridge = bridge();
    let results = Rc::new(RefCell::new(Vec::new()));

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let sink = Rc::clone(&results);
        let script = bridge
            .call(name, "", move |payload| {
                sink.borrow_mut().push(format!("{name}={payload}"));
            })
            .unwrap();
        ids.push(dispatched_message(&script).callback_id.unwrap());
    }

    bridge.receive(&BridgeMessage::reply(ids[2].clone(), "3").encode().unwrap());
    bridge.receive(&BridgeMessage::reply(ids[0].clone(), "1").encode().unwrap());
    bridge.receive(&BridgeMessage::reply(ids[1].clone(), "2").encode().unwrap());

    assert_eq!(
        *results.borrow(),
        vec!["c=3".to_string(), "a=1".to_string(), "b=2".to_string()]
    );
}

#[test]
fn reply_callback_may_issue_a_new_call() {
    let bridge = Rc::new(bridge());
    let follow_up = Rc::new(RefCell::new(None));

    let inner = Rc::clone(&bridge);
    let slot = Rc::clone(&follow_up);
    let script = bridge
        .call("first", "", move |_| {
            *slot.borrow_mut() = inner.call("second", "", |_| {});
        })
        .unwrap();
    let id = dispatched_message(&script).callback_id.unwrap();

    bridge.receive(&BridgeMessage::reply(id, "").encode().unwrap());
    assert!(follow_up.borrow().is_some());
    assert_eq!(bridge.pending_calls(), 1);
}

#[test]
fn handler_may_register_another_handler() {
    let bridge = Rc::new(bridge());
    let inner = Rc::clone(&bridge);
    bridge.register_fn("install", move |_| {
        inner.register_fn("installed", |_| Some("yes".into()));
        None
    });

    bridge.receive(&raw("install", "", None));
    assert!(bridge.has_handler("installed"));
}

#[test]
fn emit_has_no_callback() {
    let bridge = bridge();
    let sent = dispatched_message(&bridge.emit("controls", "{}").unwrap());
    assert_eq!(sent.method_name, "controls");
    assert_eq!(sent.payload, "{}");
    assert_eq!(sent.callback_id, None);
    assert_eq!(bridge.pending_calls(), 0);
}

#[test]
fn cancel_and_reset_abandon_pending_calls() {
    let bridge = bridge();
    let ran = Rc::new(RefCell::new(false));

    let flag = Rc::clone(&ran);
    let script = bridge
        .call("a", "", move |_| *flag.borrow_mut() = true)
        .unwrap();
    let id = dispatched_message(&script).callback_id.unwrap();
    assert!(bridge.cancel(&id));
    bridge.receive(&BridgeMessage::reply(id, "").encode().unwrap());
    assert!(!*ran.borrow());

    bridge.call("b", "", |_| {});
    bridge.call("c", "", |_| {});
    assert_eq!(bridge.reset(), 2);
    assert_eq!(bridge.pending_calls(), 0);
}

#[test]
fn reply_without_callback_id_is_dropped() {
    let bridge = bridge();
    bridge.call("a", "", |_| {});
    let reply = BridgeMessage::new(REPLY_METHOD, "x").encode().unwrap();
    assert_eq!(bridge.receive(&reply), None);
    assert_eq!(bridge.pending_calls(), 1);
}

#[test]
fn unregister_removes_handler() {
    let bridge = bridge();
    bridge.register(Echo);
    assert!(bridge.unregister("echo"));
    assert!(!bridge.unregister("echo"));
    assert!(!bridge.has_handler("echo"));
}

#[test]
fn empty_method_name_is_never_sent() {
    let bridge = bridge();
    assert_eq!(bridge.emit("", "x"), None);
    assert_eq!(bridge.call("", "x", |_| panic!("must not run")), None);
    assert_eq!(bridge.pending_calls(), 0);
}

#[test]
fn pump_keeps_routing_after_a_failed_reply() {
    let bridge = bridge();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second"] {
        let sink = Rc::clone(&seen);
        bridge.register_fn(name, move |_| {
            sink.borrow_mut().push(name);
            Some(name.to_string())
        });
    }

    let mut delivered = Vec::new();
    let result = bridge.pump(
        [
            raw("first", "", Some("p1")),
            raw("second", "", Some("p2")),
        ],
        |reply| {
            delivered.push(reply.to_string());
            Err(WebViewError::Engine("gone".into()))
        },
    );

    assert_eq!(*seen.borrow(), vec!["first", "second"]);
    assert_eq!(delivered.len(), 2);
    assert!(matches!(result, Err(WebViewError::Engine(ref m)) if m == "gone"));
}
