#![forbid(unsafe_code)]

//! Single connections that end with their scope.
//!
//! [`connect`] builds one adapter and hands back a [`ScopedConnection`]
//! that owns it directly, without a [`ConnectionOwner`](crate::ConnectionOwner).
//! Dropping the connection (or calling [`ScopedConnection::reset`])
//! unregisters the adapter. If the subject is dropped first, the adapter just
//! marks itself detached and the later drop does nothing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::adapter::{Adapter, Bound, BoundMut, Callable, Forward, Link, Target};
use crate::invoke::{Method, MethodMut, Prefix, Reaction};
use crate::subject::Subject;

/// RAII guard for exactly one connection.
///
/// Move-only. The default value holds no connection.
#[derive(Default)]
#[must_use = "the connection is released as soon as this value is dropped"]
pub struct ScopedConnection {
    link: Option<Rc<dyn Link>>,
}

impl ScopedConnection {
    fn adopt<Args, T>(subject: &Subject<Args>, target: T) -> Self
    where
        Args: 'static,
        T: Target<Args> + 'static,
    {
        let link: Rc<dyn Link> = Adapter::attach(subject.core(), None, target);
        tracing::trace!("scoped connect");
        Self { link: Some(link) }
    }

    /// Whether the connection is still registered with its subject.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(|link| link.is_attached())
    }

    /// Unregister and destroy the adapter now. Idempotent.
    pub fn reset(&mut self) {
        if let Some(link) = self.link.take() {
            if link.is_attached() {
                tracing::trace!("scoped reset");
            }
            link.detach();
        }
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.reset();
    }
}

impl std::fmt::Debug for ScopedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedConnection")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Connect `reaction` to `subject` for as long as the returned guard lives.
pub fn connect<Args, M, F>(subject: &Subject<Args>, reaction: F) -> ScopedConnection
where
    Args: 'static,
    M: 'static,
    F: Reaction<Args, M> + 'static,
{
    ScopedConnection::adopt(subject, Callable::new(reaction))
}

/// Connect a `&self`-style method of `instance` for as long as the returned
/// guard lives. The instance is held weakly.
pub fn connect_method<Args, M, I, F>(
    subject: &Subject<Args>,
    instance: &Rc<I>,
    method: F,
) -> ScopedConnection
where
    Args: 'static,
    M: 'static,
    I: ?Sized + 'static,
    F: Method<I, Args, M> + 'static,
{
    ScopedConnection::adopt(subject, Bound::new(instance, method))
}

/// Connect a `&mut self`-style method of `instance` for as long as the
/// returned guard lives. The instance is held weakly.
pub fn connect_method_mut<Args, M, I, F>(
    subject: &Subject<Args>,
    instance: &Rc<RefCell<I>>,
    method: F,
) -> ScopedConnection
where
    Args: 'static,
    M: 'static,
    I: 'static,
    F: MethodMut<I, Args, M> + 'static,
{
    ScopedConnection::adopt(subject, BoundMut::new(instance, method))
}

/// Forward `source` into `target` for as long as the returned guard lives.
pub fn connect_subject<Args, To>(source: &Subject<Args>, target: &Subject<To>) -> ScopedConnection
where
    Args: 'static,
    To: Prefix<Args> + 'static,
{
    ScopedConnection::adopt(source, Forward::new(target.core()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn drop_releases_reaction() {
        let subject = Subject::<(i32,)>::new();
        let count = Rc::new(Cell::new(0u32));
        {
            let count_clone = Rc::clone(&count);
            let connection = connect(&subject, move |_: i32| count_clone.set(count_clone.get() + 1));
            assert!(connection.is_connected());
            subject.notify((1,));
        }
        assert!(subject.is_empty());
        subject.notify((2,));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let subject = Subject::<()>::new();
        let mut connection = connect(&subject, || {});
        connection.reset();
        assert!(!connection.is_connected());
        assert!(subject.is_empty());
        connection.reset();
    }

    #[test]
    fn subject_drop_first_detaches() {
        let connection = {
            let subject = Subject::<()>::new();
            connect(&subject, || {})
        };
        assert!(!connection.is_connected());
        drop(connection);
    }

    #[test]
    fn move_keeps_connection() {
        let subject = Subject::<()>::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let connection = connect(&subject, move || count_clone.set(count_clone.get() + 1));

        let mut holder = Vec::new();
        holder.push(connection);
        subject.notify(());
        assert_eq!(count.get(), 1);

        holder.clear();
        subject.notify(());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn default_is_disconnected() {
        let mut connection = ScopedConnection::default();
        assert!(!connection.is_connected());
        connection.reset();
    }

    #[test]
    fn reassigning_releases_previous() {
        let subject = Subject::<()>::new();
        let count = Rc::new(Cell::new(0u32));
        let first = Rc::clone(&count);
        let second = Rc::clone(&count);

        let mut slot = connect(&subject, move || first.set(first.get() + 1));
        assert!(slot.is_connected());
        slot = connect(&subject, move || second.set(second.get() + 100));
        subject.notify(());
        assert_eq!(count.get(), 100);
        assert!(slot.is_connected());
        assert_eq!(subject.len(), 1);
    }

    #[test]
    fn scoped_method_connections() {
        struct Gauge {
            last: Cell<i32>,
            bumps: u32,
        }

        impl Gauge {
            fn set(&self, value: i32) {
                self.last.set(value);
            }

            fn bump(&mut self) {
                self.bumps += 1;
            }
        }

        let subject = Subject::<(i32, bool)>::new();
        let shared = Rc::new(Gauge {
            last: Cell::new(0),
            bumps: 0,
        });
        let exclusive = Rc::new(RefCell::new(Gauge {
            last: Cell::new(0),
            bumps: 0,
        }));
        let _a = connect_method(&subject, &shared, Gauge::set);
        let _b = connect_method_mut(&subject, &exclusive, Gauge::bump);

        subject.notify((8, true));
        assert_eq!(shared.last.get(), 8);
        assert_eq!(exclusive.borrow().bumps, 1);
    }

    #[test]
    fn scoped_subject_forwarding() {
        let source = Subject::<(i32, i32)>::new();
        let target = Subject::<(i32,)>::new();
        let total = Rc::new(Cell::new(0));
        let total_clone = Rc::clone(&total);
        let _sink = connect(&target, move |v: i32| total_clone.set(total_clone.get() + v));

        let forward = connect_subject(&source, &target);
        source.notify((4, 99));
        drop(forward);
        source.notify((5, 99));
        assert_eq!(total.get(), 4);
    }
}
