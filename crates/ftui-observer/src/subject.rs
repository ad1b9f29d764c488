#![forbid(unsafe_code)]

//! Typed notification source.
//!
//! # Design
//!
//! [`Subject<Args>`] keeps its observer list in reference-counted storage
//! (`Rc<SubjectCore<..>>`) so adapters can hold a `Weak` back-reference for
//! owner-side teardown. Observers themselves are held as `Weak` too: the
//! subject never keeps an observer alive.
//!
//! `Args` is the tuple of values broadcast by [`Subject::notify`]:
//! `Subject<()>`, `Subject<(i32,)>`, `Subject<(i32, char)>`.
//!
//! # Performance
//!
//! | Operation      | Complexity                          |
//! |----------------|-------------------------------------|
//! | `connect()`    | O(1) amortized                      |
//! | `disconnect()` | O(N), scanning from the newest end  |
//! | `notify()`     | O(N) plus one snapshot allocation   |
//!
//! # Failure Modes
//!
//! - **Panicking reaction**: the panic unwinds out of `notify()`. Observers
//!   later in the round are not notified; earlier ones are not rolled back.
//!   No borrow is held while observers run, so the subject stays usable.
//! - **Mutation during notify**: allowed. The round works on a snapshot taken
//!   before the first observer runs. Library adapters disconnected mid-round
//!   are skipped; custom observers removed mid-round may still see the
//!   current round.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::ObserverConfig;
use crate::observer::Observer;

type ObserverWeak<Args> = Weak<dyn Observer<Args>>;
type ObserverRc<Args> = Rc<dyn Observer<Args>>;

/// Shared interior of a [`Subject`].
pub(crate) struct SubjectCore<Args: 'static> {
    /// Registration order is notification order. Dead entries are pruned on notify.
    observers: RefCell<Vec<ObserverWeak<Args>>>,
    /// Zero for plain subjects; see [`BlockableSubject`](crate::BlockableSubject).
    block_count: Cell<usize>,
}

impl<Args: 'static> SubjectCore<Args> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            observers: RefCell::new(Vec::with_capacity(capacity)),
            block_count: Cell::new(0),
        }
    }

    pub(crate) fn connect(&self, observer: ObserverWeak<Args>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Remove the newest registration whose allocation lives at `addr`.
    pub(crate) fn disconnect_addr(&self, addr: *const ()) -> bool {
        let mut observers = self.observers.borrow_mut();
        match observers
            .iter()
            .rposition(|o| std::ptr::addr_eq(o.as_ptr(), addr))
        {
            Some(pos) => {
                observers.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn notify(&self, args: &Args) {
        if self.block_count.get() > 0 {
            return;
        }
        // Snapshot so observers may mutate the list while the round runs.
        let live: Vec<ObserverRc<Args>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in &live {
            observer.notify(args);
        }
    }

    fn live_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    fn take_all(&self) -> Vec<ObserverWeak<Args>> {
        std::mem::take(&mut *self.observers.borrow_mut())
    }

    pub(crate) fn block_count(&self) -> usize {
        self.block_count.get()
    }

    pub(crate) fn set_block_count(&self, count: usize) {
        self.block_count.set(count);
    }
}

/// A typed broadcaster of notifications.
///
/// Subjects are not `Clone`: adapters identify a subject by its shared
/// core, and a copy would silently split the observer list.
///
/// # Invariants
///
/// 1. Observers are notified in registration order.
/// 2. Connecting the same observer twice yields two registrations.
/// 3. On drop, every remaining observer receives
///    [`Observer::disconnect`], newest first, before the list is released.
pub struct Subject<Args: 'static> {
    core: Rc<SubjectCore<Args>>,
}

impl<Args: 'static> Subject<Args> {
    /// Create a subject with no observers.
    ///
    /// The observer list capacity comes from [`ObserverConfig::global`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(ObserverConfig::global().observer_capacity)
    }

    /// Create a subject with room for `capacity` observers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            core: Rc::new(SubjectCore::with_capacity(capacity)),
        }
    }

    /// Register `observer` at the end of the notification order.
    ///
    /// No de-duplication: registering twice means two notifications per
    /// round and two [`disconnect`](Self::disconnect) calls to remove.
    pub fn connect<O>(&self, observer: &Rc<O>)
    where
        O: Observer<Args> + 'static,
    {
        let weak: ObserverWeak<Args> = Rc::downgrade(observer) as Weak<O>;
        self.core.connect(weak);
    }

    /// Remove one registration of `observer`, newest first. No-op if it is
    /// not registered.
    pub fn disconnect<O>(&self, observer: &Rc<O>)
    where
        O: Observer<Args> + 'static,
    {
        self.core.disconnect_addr(Rc::as_ptr(observer).cast::<()>());
    }

    /// Notify every registered observer, in registration order.
    pub fn notify(&self, args: Args) {
        self.core.notify(&args);
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.live_count()
    }

    /// Whether no live observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn core(&self) -> &Rc<SubjectCore<Args>> {
        &self.core
    }
}

impl<Args: 'static> Default for Subject<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> std::fmt::Debug for Subject<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("observer_count", &self.len())
            .field("block_count", &self.core.block_count())
            .finish()
    }
}

impl<Args: 'static> Drop for Subject<Args> {
    fn drop(&mut self) {
        let observers = self.core.take_all();
        if observers.is_empty() {
            return;
        }
        tracing::debug!(observers = observers.len(), "subject teardown");
        for observer in observers.iter().rev() {
            if let Some(observer) = observer.upgrade() {
                observer.disconnect();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
