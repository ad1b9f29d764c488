#![forbid(unsafe_code)]

//! Subjects that can be muted.
//!
//! A [`BlockableSubject`] is a [`Subject`] with a block counter. While the
//! counter is above zero, `notify()` does nothing at all: suppressed
//! notifications are dropped, not queued. [`BlockGuard`] holds one block for
//! the duration of a scope and releases it on every exit path, unwinding
//! included.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use ftui_observer::{connect, BlockGuard, BlockableSubject};
//!
//! let subject = BlockableSubject::<(&'static str,)>::new();
//! let hits = Rc::new(Cell::new(0));
//! let hits_clone = Rc::clone(&hits);
//! let _connection = connect(&subject, move |_: &'static str| hits_clone.set(hits_clone.get() + 1));
//!
//! subject.notify(("Hello World!",));
//! {
//!     let _blocked = BlockGuard::new(&subject);
//!     subject.notify(("Blocked!",));
//! }
//! subject.notify(("Hello World again!",));
//! assert_eq!(hits.get(), 2);
//! ```

use std::ops::Deref;

use crate::subject::Subject;

/// A [`Subject`] gated by a block counter.
///
/// Dereferences to the underlying [`Subject`], so it connects and notifies
/// exactly like one. The counter never goes below zero.
pub struct BlockableSubject<Args: 'static> {
    subject: Subject<Args>,
}

impl<Args: 'static> BlockableSubject<Args> {
    /// Create an unblocked subject with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
        }
    }

    /// Create an unblocked subject with room for `capacity` observers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subject: Subject::with_capacity(capacity),
        }
    }

    /// Increment the block counter.
    pub fn block(&self) {
        let core = self.subject.core();
        core.set_block_count(core.block_count().saturating_add(1));
    }

    /// Decrement the block counter, stopping at zero.
    pub fn unblock(&self) {
        let core = self.subject.core();
        core.set_block_count(core.block_count().saturating_sub(1));
    }

    /// Force the block state and return the previous one.
    ///
    /// Blocking sets the counter to exactly 1, unblocking to exactly 0.
    /// Nothing changes if the subject is already in the requested state.
    pub fn set_block_state(&self, blocked: bool) -> bool {
        let was_blocked = self.is_blocked();
        if was_blocked != blocked {
            self.subject.core().set_block_count(usize::from(blocked));
        }
        was_blocked
    }

    /// Whether notifications are currently suppressed.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.block_count() > 0
    }

    /// Current value of the block counter.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.subject.core().block_count()
    }
}

impl<Args: 'static> Default for BlockableSubject<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Deref for BlockableSubject<Args> {
    type Target = Subject<Args>;

    fn deref(&self) -> &Subject<Args> {
        &self.subject
    }
}

impl<Args: 'static> std::fmt::Debug for BlockableSubject<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockableSubject")
            .field("observer_count", &self.subject.len())
            .field("block_count", &self.block_count())
            .finish()
    }
}

/// Holds one block on a [`BlockableSubject`] until dropped.
#[must_use = "the subject is unblocked as soon as the guard is dropped"]
pub struct BlockGuard<'a, Args: 'static> {
    subject: &'a BlockableSubject<Args>,
}

impl<'a, Args: 'static> BlockGuard<'a, Args> {
    /// Block `subject` until the guard goes out of scope.
    pub fn new(subject: &'a BlockableSubject<Args>) -> Self {
        subject.block();
        Self { subject }
    }
}

impl<Args: 'static> Drop for BlockGuard<'_, Args> {
    fn drop(&mut self) {
        self.subject.unblock();
    }
}

impl<Args: 'static> std::fmt::Debug for BlockGuard<'_, Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockGuard").finish_non_exhaustive()
    }
}
