use std::{
    cell::RefCell,
    mem::{replace, swap, take},
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;


thread_local! {
    static GLOBALS: RefCell<Globals> = RefCell::new(Globals::new());
}

struct Globals {
    is_runtime_exists: bool,
    notifys: Vec<Weak<dyn NotifySink>>,
}
impl Globals {
    fn new() -> Self {
        Self {
            is_runtime_exists: false,
            notifys: Vec::new(),
        }
    }
    fn with<T>(f: impl FnOnce(&mut Self) -> T) -> T {
        GLOBALS.with(|g| f(&mut g.borrow_mut()))
    }
    fn get_notifys(notifys: &mut Vec<Weak<dyn NotifySink>>) -> bool {
        Self::with(|g| swap(notifys, &mut g.notifys));
        !notifys.is_empty()
    }
}

pub(crate) trait NotifySink: 'static {
    fn notify(self: Rc<Self>);

    /// Called instead of `notify` when the queue is discarded with its `Runtime`.
    fn cancel(self: Rc<Self>) {}
}

/// Queues `sink` to be notified on the next [`Runtime::update`].
pub(crate) fn schedule_notify(sink: Weak<dyn NotifySink>) {
    Globals::with(|g| g.notifys.push(sink));
}

/// Reactive runtime.
///
/// Changes to a [`ListState`](crate::ListState) are not delivered inline with the mutation.
/// They are queued on the current thread and delivered, in the order they were scheduled,
/// when [`update`](Self::update) is called.
#[derive_ex(Default)]
#[default(Self::new())]
pub struct Runtime {
    notifys_buffer: Vec<Weak<dyn NotifySink>>,
}
impl Runtime {
    pub fn new() -> Self {
        if Globals::with(|g| replace(&mut g.is_runtime_exists, true)) {
            panic!("Only one `Runtime` can exist in the same thread at the same time.");
        }
        Self {
            notifys_buffer: Vec::new(),
        }
    }

    /// Delivers all pending notifications, including those scheduled while delivering.
    pub fn update(&mut self) {
        while Globals::get_notifys(&mut self.notifys_buffer) {
            for sink in self.notifys_buffer.drain(..) {
                if let Some(sink) = sink.upgrade() {
                    sink.notify();
                }
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        Globals::with(|g| !g.notifys.is_empty())
    }
}
impl Drop for Runtime {
    fn drop(&mut self) {
        let Ok(notifys) = GLOBALS.try_with(|g| {
            let mut g = g.borrow_mut();
            g.is_runtime_exists = false;
            take(&mut g.notifys)
        }) else {
            return;
        };
        for sink in notifys {
            if let Some(sink) = sink.upgrade() {
                sink.cancel();
            }
        }
    }
}
