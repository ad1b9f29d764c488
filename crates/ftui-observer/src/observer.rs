#![forbid(unsafe_code)]

//! The observer capability registered with a [`Subject`](crate::Subject).

/// Something a subject can notify and tear down.
///
/// Every connection made through [`ConnectionOwner`](crate::ConnectionOwner)
/// or [`connect`](crate::connect) is backed by an adapter implementing this
/// trait. Custom observers can implement it directly and register themselves
/// with [`Subject::connect`](crate::Subject::connect).
///
/// Subjects never own observers: they hold weak references, so an observer
/// that is dropped without disconnecting is skipped from then on.
pub trait Observer<Args> {
    /// Deliver one notification.
    fn notify(&self, args: &Args);

    /// The subject is being dropped. Whoever owns this observer should
    /// forget it; the subject will not call it again.
    fn disconnect(&self);
}
