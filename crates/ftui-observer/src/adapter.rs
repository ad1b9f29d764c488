#![forbid(unsafe_code)]

//! Observer adapters: one per connection.
//!
//! An [`Adapter`] wraps a [`Target`] (closure, bound method, forwarding
//! subject) and is registered with exactly one subject. It is reachable from
//! two sides:
//!
//! - the subject holds it as `Weak<dyn Observer<Args>>` and calls
//!   [`Observer::disconnect`] when the subject is dropped;
//! - its owner (a [`ConnectionOwner`](crate::ConnectionOwner) or a
//!   [`ScopedConnection`](crate::ScopedConnection)) holds the only strong
//!   `Rc<dyn Link>` and calls [`Link::detach`] when it lets go.
//!
//! Whichever side goes first informs the other, and the `attached` flag makes
//! the second call a no-op.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::invoke::{Method, MethodMut, Prefix, Reaction};
use crate::observer::Observer;
use crate::owner::OwnerCore;
use crate::subject::SubjectCore;

/// Owner-side view of an adapter, with the notification types erased.
pub(crate) trait Link {
    /// Unregister from the subject. Idempotent.
    fn detach(&self);

    /// Whether the adapter is still registered with its subject.
    fn is_attached(&self) -> bool;
}

/// What an adapter does when notified.
pub(crate) trait Target<Args> {
    fn fire(&self, args: &Args);
}

/// Back-reference from an owned adapter to its [`ConnectionOwner`](crate::ConnectionOwner).
pub(crate) struct OwnerLink {
    pub(crate) owner: Weak<OwnerCore>,
    pub(crate) id: u64,
}

pub(crate) struct Adapter<Args: 'static, T> {
    subject: Weak<SubjectCore<Args>>,
    /// `None` for scoped connections, which have no owner to inform.
    owner: Option<OwnerLink>,
    attached: Cell<bool>,
    target: T,
}

impl<Args: 'static, T: Target<Args> + 'static> Adapter<Args, T> {
    /// Build an adapter and register it with `subject`.
    ///
    /// The returned `Rc` is the only strong reference; the caller stores it.
    pub(crate) fn attach(
        subject: &Rc<SubjectCore<Args>>,
        owner: Option<OwnerLink>,
        target: T,
    ) -> Rc<Self> {
        let adapter = Rc::new(Self {
            subject: Rc::downgrade(subject),
            owner,
            attached: Cell::new(true),
            target,
        });
        let weak: Weak<dyn Observer<Args>> = Rc::downgrade(&adapter) as Weak<dyn Observer<Args>>;
        subject.connect(weak);
        adapter
    }

    fn addr(&self) -> *const () {
        std::ptr::from_ref(self).cast::<()>()
    }
}

impl<Args: 'static, T: Target<Args>> Observer<Args> for Adapter<Args, T> {
    fn notify(&self, args: &Args) {
        // Detached earlier in the current round.
        if self.attached.get() {
            self.target.fire(args);
        }
    }

    fn disconnect(&self) {
        if !self.attached.replace(false) {
            return;
        }
        if let Some(link) = &self.owner {
            if let Some(owner) = link.owner.upgrade() {
                owner.forget(link.id);
            }
        }
    }
}

impl<Args: 'static, T: Target<Args> + 'static> Link for Adapter<Args, T> {
    fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        if let Some(subject) = self.subject.upgrade() {
            subject.disconnect_addr(self.addr());
        }
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// A stored callable.
pub(crate) struct Callable<F, M> {
    reaction: F,
    _marker: PhantomData<fn() -> M>,
}

impl<F, M> Callable<F, M> {
    pub(crate) fn new(reaction: F) -> Self {
        Self {
            reaction,
            _marker: PhantomData,
        }
    }
}

impl<Args, F: Reaction<Args, M>, M> Target<Args> for Callable<F, M> {
    #[inline]
    fn fire(&self, args: &Args) {
        self.reaction.react(args);
    }
}

/// A method bound to a shared instance.
///
/// The instance is held weakly: once it is gone the connection goes quiet.
pub(crate) struct Bound<I: ?Sized, F, M> {
    instance: Weak<I>,
    method: F,
    _marker: PhantomData<fn() -> M>,
}

impl<I: ?Sized, F, M> Bound<I, F, M> {
    pub(crate) fn new(instance: &Rc<I>, method: F) -> Self {
        Self {
            instance: Rc::downgrade(instance),
            method,
            _marker: PhantomData,
        }
    }
}

impl<Args, I: ?Sized, F: Method<I, Args, M>, M> Target<Args> for Bound<I, F, M> {
    #[inline]
    fn fire(&self, args: &Args) {
        if let Some(instance) = self.instance.upgrade() {
            self.method.apply(&instance, args);
        }
    }
}

/// A method bound to an instance behind `RefCell`, called with `&mut`.
pub(crate) struct BoundMut<I, F, M> {
    instance: Weak<RefCell<I>>,
    method: F,
    _marker: PhantomData<fn() -> M>,
}

impl<I, F, M> BoundMut<I, F, M> {
    pub(crate) fn new(instance: &Rc<RefCell<I>>, method: F) -> Self {
        Self {
            instance: Rc::downgrade(instance),
            method,
            _marker: PhantomData,
        }
    }
}

impl<Args, I, F: MethodMut<I, Args, M>, M> Target<Args> for BoundMut<I, F, M> {
    #[inline]
    fn fire(&self, args: &Args) {
        if let Some(instance) = self.instance.upgrade() {
            self.method.apply_mut(&mut instance.borrow_mut(), args);
        }
    }
}

/// Re-broadcast into another subject whose values are a prefix of ours.
pub(crate) struct Forward<To: 'static> {
    target: Weak<SubjectCore<To>>,
}

impl<To: 'static> Forward<To> {
    pub(crate) fn new(target: &Rc<SubjectCore<To>>) -> Self {
        Self {
            target: Rc::downgrade(target),
        }
    }
}

impl<Args, To: Prefix<Args> + 'static> Target<Args> for Forward<To> {
    #[inline]
    fn fire(&self, args: &Args) {
        if let Some(target) = self.target.upgrade() {
            target.notify(&To::take_prefix(args));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Count(Rc<Cell<u32>>);

    impl Target<(u8,)> for Count {
        fn fire(&self, _: &(u8,)) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn core() -> Rc<SubjectCore<(u8,)>> {
        Rc::new(SubjectCore::with_capacity(2))
    }

    #[test]
    fn detach_unregisters_once() {
        let subject = core();
        let hits = Rc::new(Cell::new(0));
        let adapter = Adapter::attach(&subject, None, Count(Rc::clone(&hits)));

        subject.notify(&(1,));
        assert_eq!(hits.get(), 1);

        adapter.detach();
        assert!(!adapter.is_attached());
        subject.notify(&(2,));
        assert_eq!(hits.get(), 1);

        // Second detach must not touch the subject.
        adapter.detach();
    }

    #[test]
    fn subject_disconnect_marks_detached() {
        let subject = core();
        let hits = Rc::new(Cell::new(0));
        let adapter = Adapter::attach(&subject, None, Count(hits));
        Observer::disconnect(&*adapter);
        assert!(!adapter.is_attached());
    }

    #[test]
    fn detached_adapter_ignores_notify() {
        let subject = core();
        let hits = Rc::new(Cell::new(0));
        let adapter = Adapter::attach(&subject, None, Count(Rc::clone(&hits)));
        adapter.attached.set(false);
        Observer::notify(&*adapter, &(3,));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn bound_goes_quiet_after_instance_drop() {
        struct Sink(Cell<u32>);
        let sink = Rc::new(Sink(Cell::new(0)));
        let bound: Bound<Sink, _, (u32,)> = Bound::new(&sink, |s: &Sink, v: u32| s.0.set(v));
        bound.fire(&(4u32,));
        assert_eq!(sink.0.get(), 4);
        drop(sink);
        bound.fire(&(5u32,));
    }

    #[test]
    fn forward_clones_prefix() {
        let target = core();
        let hits = Rc::new(Cell::new(0));
        let _adapter = Adapter::attach(&target, None, Count(Rc::clone(&hits)));
        let forward = Forward::new(&target);
        forward.fire(&(1u8, "dropped"));
        assert_eq!(hits.get(), 1);
    }
}
