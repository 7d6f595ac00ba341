use assert_call::{call, CallRecorder};

use super::*;
use crate::Runtime;

fn observe_calls(s: &ListState<i32>) -> Subscription {
    s.observe(Box::new(|value| call!("{:?}", &**value)))
}

#[test]
fn new() {
    let s = ListState::new(vec![1, 2, 3]);
    assert_eq!(&*s.get(), &[1, 2, 3]);
    assert_eq!(s.len(), 3);
    assert!(!s.is_empty());
    assert!(ListState::<i32>::default().is_empty());
}

#[test]
fn set_notifies_on_update() {
    let mut rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![1]);
    let _o = observe_calls(&s);

    s.set(vec![1, 2]);
    assert_eq!(&*s.get(), &[1, 2]);
    cr.verify(());
    rt.update();
    cr.verify("[1, 2]");
}

#[test]
fn set_coalesces_until_update() {
    let mut rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![]);
    let _o = observe_calls(&s);

    s.set(vec![1]);
    s.set(vec![1, 2]);
    s.set(vec![3]);
    rt.update();
    cr.verify("[3]");
    rt.update();
    cr.verify(());
}

#[test]
fn set_dedup() {
    let mut rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![1, 2]);
    let _o = observe_calls(&s);

    s.set_dedup(vec![1, 2]);
    rt.update();
    cr.verify(());

    s.set_dedup(vec![2, 1]);
    rt.update();
    cr.verify("[2, 1]");
}

#[test]
fn borrow_mut_notifies_only_when_mutated() {
    let mut rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![1, 2]);
    let _o = observe_calls(&s);

    {
        let items = s.borrow_mut();
        assert_eq!(items.len(), 2);
    }
    rt.update();
    cr.verify(());

    {
        let mut items = s.borrow_mut();
        items.push(3);
        items.retain(|&v| v != 1);
    }
    assert_eq!(&*s.get(), &[2, 3]);
    rt.update();
    cr.verify("[2, 3]");
}

#[test]
fn snapshots_are_immutable() {
    let _rt = Runtime::new();
    let s = ListState::new(vec![1, 2]);
    let before = s.get();
    s.set(vec![3]);
    assert_eq!(&*before, &[1, 2]);
    assert_eq!(&*s.get(), &[3]);
}

#[test]
fn dropped_observer_is_not_called() {
    let mut rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![1]);
    let o = observe_calls(&s);
    drop(o);
    s.set(vec![2]);
    rt.update();
    cr.verify(());
}

#[test]
fn set_after_runtime_dropped_with_pending_notify() {
    let mut cr = CallRecorder::new();
    let s = ListState::new(vec![1]);
    let _o = observe_calls(&s);

    let rt = Runtime::new();
    s.set(vec![1, 2]);
    drop(rt);
    cr.verify(());

    let mut rt = Runtime::new();
    s.set(vec![1, 2, 3]);
    rt.update();
    cr.verify("[1, 2, 3]");
}

#[test]
fn key_path_resolves_property() {
    struct Model {
        items: ListState<i32>,
    }
    let key_path = KeyPath::<Model, i32>::new("items", |m| &m.items);
    let model = Model {
        items: ListState::new(vec![4, 5]),
    };
    assert_eq!(key_path.name(), "items");
    assert_eq!(&*key_path.resolve(&model).get(), &[4, 5]);
    assert_eq!(format!("{key_path:?}"), r#"KeyPath("items")"#);
}
