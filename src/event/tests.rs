use std::cell::RefCell;

use assert_call::{call, CallRecorder};
use futures::{executor::block_on, StreamExt};

use super::*;

#[test]
fn emit_without_subscribers() {
    let e = EventSource::<i32>::new();
    e.emit(&1);
    assert_eq!(e.subscriber_count(), 0);
}

#[test]
fn subscribers_see_only_later_events() {
    let mut cr = CallRecorder::new();
    let e = EventSource::<i32>::new();
    e.emit(&1);
    let _s = e.subscribe(|v| call!("{v}"));
    cr.verify(());
    e.emit(&2);
    e.emit(&3);
    cr.verify(["2", "3"]);
}

#[test]
fn delivery_follows_subscription_order() {
    let mut cr = CallRecorder::new();
    let e = EventSource::<i32>::new();
    let s0 = e.subscribe(|v| call!("a {v}"));
    let _s1 = e.subscribe(|v| call!("b {v}"));
    drop(s0);
    // reuses the freed slot, but still subscribed last
    let _s2 = e.subscribe(|v| call!("c {v}"));
    e.emit(&1);
    cr.verify(["b 1", "c 1"]);
}

#[test]
fn drop_subscription_stops_delivery() {
    let mut cr = CallRecorder::new();
    let e = EventSource::<i32>::new();
    let s = e.subscribe(|v| call!("{v}"));
    e.emit(&1);
    drop(s);
    e.emit(&2);
    cr.verify("1");
    assert_eq!(e.subscriber_count(), 0);
}

#[test]
fn subscribe_during_emit_misses_current_event() {
    let mut cr = CallRecorder::new();
    let e = EventSource::<i32>::new();
    let inner = Rc::new(RefCell::new(Vec::new()));
    let e0 = e.clone();
    let inner0 = inner.clone();
    let _s = e.subscribe(move |v| {
        call!("outer {v}");
        inner0
            .borrow_mut()
            .push(e0.subscribe(|v| call!("inner {v}")));
    });
    e.emit(&1);
    cr.verify("outer 1");
    e.emit(&2);
    cr.verify(["outer 2", "inner 2"]);
}

#[test]
fn unsubscribe_during_emit_skips_removed() {
    let mut cr = CallRecorder::new();
    let e = EventSource::<i32>::new();
    let victim = Rc::new(RefCell::new(None::<Subscription>));
    let victim0 = victim.clone();
    let _s0 = e.subscribe(move |v| {
        call!("first {v}");
        victim0.borrow_mut().take();
    });
    *victim.borrow_mut() = Some(e.subscribe(|v| call!("second {v}")));
    e.emit(&1);
    cr.verify("first 1");
}

#[test]
fn to_stream_receives_later_events() {
    let e = EventSource::<i32>::new();
    e.emit(&0);
    let mut stream = e.to_stream();
    e.emit(&1);
    e.emit(&2);
    assert_eq!(block_on(stream.next()), Some(1));
    assert_eq!(block_on(stream.next()), Some(2));
}

#[test]
fn to_stream_ends_when_source_dropped() {
    let e = EventSource::<i32>::new();
    let mut stream = e.to_stream();
    e.emit(&7);
    drop(e);
    assert_eq!(block_on(stream.next()), Some(7));
    assert_eq!(block_on(stream.next()), None);
}
