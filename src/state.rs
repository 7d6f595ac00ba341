use std::{
    cell::{Cell, RefCell},
    mem::take,
    ops::{Deref, DerefMut},
    rc::Rc,
};

use derive_ex::derive_ex;

use crate::{
    core::{schedule_notify, NotifySink},
    EventSource, Subscription,
};

#[cfg(test)]
mod tests;

/// A list-valued property whose changes can be observed.
///
/// The value is held as an immutable snapshot. Every mutation replaces the snapshot and
/// schedules a notification, which observers receive on the next [`Runtime::update`](crate::Runtime::update).
/// Mutations made before that update are coalesced into one notification carrying the latest value.
#[derive_ex(Clone, bound())]
pub struct ListState<T: 'static>(Rc<ListStateNode<T>>);

impl<T: 'static> ListState<T> {
    pub fn new(value: Vec<T>) -> Self {
        Self(Rc::new(ListStateNode {
            value: RefCell::new(value.into()),
            changed: EventSource::new(),
            is_scheduled: Cell::new(false),
        }))
    }

    /// Returns the current snapshot.
    pub fn get(&self) -> Rc<[T]> {
        self.0.value.borrow().clone()
    }
    pub fn len(&self) -> usize {
        self.0.value.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the value and schedules a notification.
    pub fn set(&self, value: Vec<T>) {
        *self.0.value.borrow_mut() = value.into();
        self.0.schedule_notify();
    }

    /// Replaces the value and schedules a notification only if it differs from the current value.
    pub fn set_dedup(&self, value: Vec<T>)
    where
        T: PartialEq,
    {
        let mut this_value = self.0.value.borrow_mut();
        if this_value[..] != value[..] {
            *this_value = value.into();
            drop(this_value);
            self.0.schedule_notify();
        }
    }

    /// Mutably borrows a copy of the value.
    ///
    /// When the returned guard is dropped after being mutably dereferenced,
    /// the copy becomes the new value and a notification is scheduled.
    pub fn borrow_mut(&self) -> ListStateRefMut<'_, T>
    where
        T: Clone,
    {
        ListStateRefMut {
            value: self.0.value.borrow().to_vec(),
            is_dirty: false,
            node: &self.0,
        }
    }
}
impl<T: 'static> Default for ListState<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
impl<T: 'static> From<Vec<T>> for ListState<T> {
    fn from(value: Vec<T>) -> Self {
        Self::new(value)
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for ListState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&**value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

struct ListStateNode<T: 'static> {
    value: RefCell<Rc<[T]>>,
    changed: EventSource<Rc<[T]>>,
    is_scheduled: Cell<bool>,
}
impl<T: 'static> ListStateNode<T> {
    fn schedule_notify(self: &Rc<Self>) {
        if !self.is_scheduled.replace(true) {
            let node: Rc<dyn NotifySink> = self.clone();
            schedule_notify(Rc::downgrade(&node));
        }
    }
}
impl<T: 'static> NotifySink for ListStateNode<T> {
    fn notify(self: Rc<Self>) {
        self.is_scheduled.set(false);
        let value = self.value.borrow().clone();
        self.changed.emit(&value);
    }
    fn cancel(self: Rc<Self>) {
        self.is_scheduled.set(false);
    }
}

pub struct ListStateRefMut<'a, T: 'static> {
    value: Vec<T>,
    is_dirty: bool,
    node: &'a Rc<ListStateNode<T>>,
}
impl<T> Deref for ListStateRefMut<'_, T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
impl<T> DerefMut for ListStateRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.is_dirty = true;
        &mut self.value
    }
}
impl<T> Drop for ListStateRefMut<'_, T> {
    fn drop(&mut self) {
        if self.is_dirty {
            *self.node.value.borrow_mut() = take(&mut self.value).into();
            self.node.schedule_notify();
        }
    }
}

/// An observable list-valued property.
///
/// This is the typed counterpart of observing a property by name: a getter for the current
/// snapshot plus a hook that is called with each new snapshot.
pub trait ObservableList<T: 'static> {
    fn snapshot(&self) -> Rc<[T]>;
    fn observe(&self, f: Box<dyn Fn(&Rc<[T]>)>) -> Subscription;
}
impl<T: 'static> ObservableList<T> for ListState<T> {
    fn snapshot(&self) -> Rc<[T]> {
        self.get()
    }
    fn observe(&self, f: Box<dyn Fn(&Rc<[T]>)>) -> Subscription {
        self.0.changed.subscribe(move |value| f(value))
    }
}

/// A named accessor from a source object to one of its [`ListState`] properties.
///
/// ```
/// use sigmut_list::{KeyPath, ListState};
///
/// struct Inbox {
///     messages: ListState<u32>,
/// }
/// const MESSAGES: KeyPath<Inbox, u32> = KeyPath::new("messages", |inbox| &inbox.messages);
///
/// let inbox = Inbox { messages: ListState::new(vec![1, 2]) };
/// assert_eq!(MESSAGES.name(), "messages");
/// assert_eq!(MESSAGES.resolve(&inbox).len(), 2);
/// ```
#[derive_ex(Clone, Copy, bound())]
pub struct KeyPath<S: ?Sized, T: 'static> {
    name: &'static str,
    get: fn(&S) -> &ListState<T>,
}
impl<S: ?Sized, T: 'static> KeyPath<S, T> {
    pub const fn new(name: &'static str, get: fn(&S) -> &ListState<T>) -> Self {
        Self { name, get }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn resolve<'a>(&self, source: &'a S) -> &'a ListState<T> {
        (self.get)(source)
    }
}
impl<S: ?Sized, T: 'static> std::fmt::Debug for KeyPath<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("KeyPath").field(&self.name).finish()
    }
}
