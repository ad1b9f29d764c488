#![forbid(unsafe_code)]

//! Lifetime scope for a group of connections.
//!
//! A [`ConnectionOwner`] creates adapters and is the only thing that keeps
//! them alive. Dropping the owner unregisters every adapter from its subject,
//! newest first. Dropping a subject first removes its adapters from their
//! owners instead. Either order is safe.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use ftui_observer::{ConnectionOwner, Subject};
//!
//! let subject = Subject::<(i32,)>::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let owner = ConnectionOwner::new();
//! let seen_clone = Rc::clone(&seen);
//! let handle = owner.connect(&subject, move |v: i32| seen_clone.set(v));
//!
//! subject.notify((42,));
//! assert_eq!(seen.get(), 42);
//!
//! owner.disconnect(handle);
//! subject.notify((7,));
//! assert_eq!(seen.get(), 42);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::adapter::{Adapter, Bound, BoundMut, Callable, Forward, Link, OwnerLink, Target};
use crate::config::ObserverConfig;
use crate::invoke::{Method, MethodMut, Prefix, Reaction};
use crate::subject::Subject;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared interior of a [`ConnectionOwner`].
pub(crate) struct OwnerCore {
    id: u64,
    /// Connection order. Owns every adapter it lists.
    connections: RefCell<Vec<(u64, Rc<dyn Link>)>>,
}

impl OwnerCore {
    fn take(&self, id: u64) -> Option<Rc<dyn Link>> {
        let mut connections = self.connections.borrow_mut();
        let pos = connections.iter().rposition(|(cid, _)| *cid == id)?;
        Some(connections.remove(pos).1)
    }

    /// Drop the adapter behind `id` without touching its subject.
    ///
    /// Called by an adapter whose subject is being torn down.
    pub(crate) fn forget(&self, id: u64) {
        // Released outside the borrow: dropping a reaction may run user code.
        let released = self.take(id);
        drop(released);
    }
}

/// Opaque handle to one connection made by a [`ConnectionOwner`].
///
/// Handles are `Copy` and may outlive their connection: disconnecting a
/// stale handle, or a handle from another owner, is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    owner: u64,
    id: u64,
}

/// Why [`ConnectionOwner::try_disconnect`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectError {
    /// The handle was issued by a different owner.
    ForeignOwner,
    /// The connection was already released, explicitly or by its subject.
    NotConnected,
}

impl std::fmt::Display for DisconnectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForeignOwner => write!(f, "connection belongs to another owner"),
            Self::NotConnected => write!(f, "connection is no longer active"),
        }
    }
}

impl std::error::Error for DisconnectError {}

/// Creates and owns observer adapters.
///
/// Embed one in any type whose reactions should stop when the type is
/// dropped.
///
/// # Invariants
///
/// 1. Every adapter belongs to exactly one owner.
/// 2. On drop, adapters are unregistered and destroyed newest first.
/// 3. A handle only affects the owner that issued it.
pub struct ConnectionOwner {
    core: Rc<OwnerCore>,
}

impl ConnectionOwner {
    /// Create an owner with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Rc::new(OwnerCore {
                id: next_id(),
                connections: RefCell::new(Vec::new()),
            }),
        }
    }

    fn adopt<Args, T>(&self, subject: &Subject<Args>, target: T) -> Connection
    where
        Args: 'static,
        T: Target<Args> + 'static,
    {
        let id = next_id();
        let link = OwnerLink {
            owner: Rc::downgrade(&self.core),
            id,
        };
        let adapter: Rc<dyn Link> = Adapter::attach(subject.core(), Some(link), target);
        self.core.connections.borrow_mut().push((id, adapter));
        tracing::trace!(owner = self.core.id, connection = id, "connect");
        Connection {
            owner: self.core.id,
            id,
        }
    }

    /// Connect `reaction` to `subject`.
    ///
    /// The reaction may declare any prefix of the subject's values.
    pub fn connect<Args, M, F>(&self, subject: &Subject<Args>, reaction: F) -> Connection
    where
        Args: 'static,
        M: 'static,
        F: Reaction<Args, M> + 'static,
    {
        self.adopt(subject, Callable::new(reaction))
    }

    /// Connect a `&self`-style method of `instance` to `subject`.
    ///
    /// The instance is held weakly; after it is dropped the connection
    /// stays registered but does nothing.
    pub fn connect_method<Args, M, I, F>(
        &self,
        subject: &Subject<Args>,
        instance: &Rc<I>,
        method: F,
    ) -> Connection
    where
        Args: 'static,
        M: 'static,
        I: ?Sized + 'static,
        F: Method<I, Args, M> + 'static,
    {
        self.adopt(subject, Bound::new(instance, method))
    }

    /// Connect a `&mut self`-style method of `instance` to `subject`.
    ///
    /// # Panics
    ///
    /// Notifying re-entrantly into the same instance panics (`RefCell`
    /// borrow rules).
    pub fn connect_method_mut<Args, M, I, F>(
        &self,
        subject: &Subject<Args>,
        instance: &Rc<RefCell<I>>,
        method: F,
    ) -> Connection
    where
        Args: 'static,
        M: 'static,
        I: 'static,
        F: MethodMut<I, Args, M> + 'static,
    {
        self.adopt(subject, BoundMut::new(instance, method))
    }

    /// Forward every notification of `source` into `target`.
    ///
    /// `target` receives the leading values of each notification and
    /// honors its own block state.
    pub fn connect_subject<Args, To>(&self, source: &Subject<Args>, target: &Subject<To>) -> Connection
    where
        Args: 'static,
        To: Prefix<Args> + 'static,
    {
        self.adopt(source, Forward::new(target.core()))
    }

    /// Disconnect and destroy the connection behind `connection`.
    ///
    /// # Errors
    ///
    /// [`DisconnectError::ForeignOwner`] if another owner issued the handle;
    /// [`DisconnectError::NotConnected`] if it was already released. Neither
    /// changes any state.
    pub fn try_disconnect(&self, connection: Connection) -> Result<(), DisconnectError> {
        if connection.owner != self.core.id {
            return Err(DisconnectError::ForeignOwner);
        }
        let link = self
            .core
            .take(connection.id)
            .ok_or(DisconnectError::NotConnected)?;
        link.detach();
        tracing::trace!(owner = self.core.id, connection = connection.id, "disconnect");
        Ok(())
    }

    /// Disconnect and destroy the connection behind `connection`.
    ///
    /// Stale and foreign handles are ignored.
    pub fn disconnect(&self, connection: Connection) {
        if let Err(err) = self.try_disconnect(connection) {
            if ObserverConfig::global().warn_stale_handles {
                tracing::warn!(owner = self.core.id, connection = connection.id, reason = %err, "stale connection handle");
            } else {
                tracing::debug!(owner = self.core.id, connection = connection.id, reason = %err, "stale connection handle");
            }
        }
    }

    /// Whether `connection` was issued by this owner and is still active.
    #[must_use]
    pub fn is_connected(&self, connection: Connection) -> bool {
        connection.owner == self.core.id
            && self
                .core
                .connections
                .borrow()
                .iter()
                .any(|(id, _)| *id == connection.id)
    }

    /// Number of active connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.connections.borrow().len()
    }

    /// Whether the owner holds no connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disconnect everything, newest first. The owner stays usable.
    pub fn disconnect_all(&self) {
        let connections = std::mem::take(&mut *self.core.connections.borrow_mut());
        if connections.is_empty() {
            return;
        }
        tracing::debug!(
            owner = self.core.id,
            connections = connections.len(),
            "owner teardown"
        );
        for (_, link) in connections.into_iter().rev() {
            link.detach();
        }
    }
}

impl Default for ConnectionOwner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOwner")
            .field("id", &self.core.id)
            .field("connections", &self.len())
            .finish()
    }
}

impl Drop for ConnectionOwner {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
