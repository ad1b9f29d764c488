#![forbid(unsafe_code)]

//! Typed subjects and observer lifetimes for FrankenTUI.
//!
//! # Role in FrankenTUI
//! `ftui-observer` is the synchronous publish/notify layer: a component
//! raises an event on a [`Subject`], and every connected reaction runs
//! immediately, in connection order, on the caller's thread.
//!
//! # Primary responsibilities
//! - **Subject**: ordered, non-owning list of observers; teardown informs
//!   every observer before the list is released.
//! - **Arity adaptation**: a reaction may declare any prefix of the
//!   subject's values (see [`invoke`]). Mismatches fail to compile.
//! - **ConnectionOwner**: owns many connections and releases them, newest
//!   first, when dropped.
//! - **ScopedConnection / BlockGuard**: RAII for one connection and for one
//!   block on a [`BlockableSubject`].
//!
//! # Lifetimes
//! A subject and an owner may be dropped in either order. Each side holds
//! only weak references to the other, and whichever goes first tells the
//! other to forget the shared connection.
//!
//! # Threading
//! Everything here is `!Send` and `!Sync` (`Rc`/`RefCell` internally).
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use ftui_observer::{ConnectionOwner, Subject};
//!
//! let subject = Subject::<(i32,)>::new();
//! let recorded = Rc::new(Cell::new(0));
//! let calls = Rc::new(Cell::new(0));
//!
//! let owner = ConnectionOwner::new();
//! let r = Rc::clone(&recorded);
//! owner.connect(&subject, move |i: i32| r.set(i));
//! let c = Rc::clone(&calls);
//! owner.connect(&subject, move || c.set(c.get() + 1));
//!
//! subject.notify((42,));
//! assert_eq!(recorded.get(), 42);
//! assert_eq!(calls.get(), 1);
//! ```

mod adapter;
pub mod blockable;
pub mod config;
pub mod invoke;
pub mod observer;
pub mod owner;
pub mod scoped;
pub mod subject;

pub use blockable::{BlockGuard, BlockableSubject};
pub use config::ObserverConfig;
pub use invoke::{Method, MethodMut, Prefix, Reaction};
pub use observer::Observer;
pub use owner::{Connection, ConnectionOwner, DisconnectError};
pub use scoped::{ScopedConnection, connect, connect_method, connect_method_mut, connect_subject};
pub use subject::Subject;
