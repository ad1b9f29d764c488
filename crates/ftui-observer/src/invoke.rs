#![forbid(unsafe_code)]

//! Arity-adaptive invocation.
//!
//! A subject broadcasting `(T1, T2, .., Tn)` accepts any reaction whose
//! parameter list is a *prefix* of that tuple: `Fn()`, `Fn(T1)`,
//! `Fn(T1, T2)`, and so on. The number of forwarded values is selected at
//! compile time through the `Marker` type parameter, which is the prefix
//! tuple the reaction declares. There is no runtime branching on arity.
//!
//! # Supported shapes
//!
//! | Trait        | Callable shape                         | Typical source                 |
//! |--------------|----------------------------------------|--------------------------------|
//! | [`Reaction`] | `Fn(T1, .., Tk) -> R`                  | fn items, closures, `Box<dyn Fn>` |
//! | [`Reaction`] | `Fn(&T1, .., &Tk) -> R`                | reactions that only read the values |
//! | [`Method`]   | `Fn(&I, T1, .., Tk) -> R` or `Fn(&I, &T1, .., &Tk) -> R` | `&self` methods (`I::method`)  |
//! | [`MethodMut`]| `Fn(&mut I, T1, .., Tk) -> R` or `Fn(&mut I, &T1, .., &Tk) -> R` | `&mut self` methods |
//! | [`Prefix`]   | tuple `(T1, .., Tk)` cut from `(T1, .., Tn)` | subject-to-subject forwarding |
//!
//! Return values are discarded. A reaction taking its values by value gets
//! clones of them (`Tk: Clone`). A reaction taking every value by reference
//! borrows them straight out of the notification tuple: nothing is cloned
//! and the values need not be `Clone`. The two styles do not mix within one
//! reaction. Values past the prefix are never touched.
//!
//! A reaction that declares more parameters than the subject provides, or
//! parameters of other types, does not implement the trait for that subject
//! and is rejected where the connection is built.
//!
//! Notification tuples are supported up to six values.
//!
//! ```
//! use ftui_observer::invoke::invoke;
//!
//! fn takes_one(value: i32) {
//!     assert_eq!(value, 7);
//! }
//!
//! invoke(&takes_one, &(7, 'x', "ignored"));
//! invoke(&|| {}, &(7, 'x', "ignored"));
//! invoke(&|text: &String| assert_eq!(text, "borrowed"), &("borrowed".to_string(),));
//! ```

use std::marker::PhantomData;

/// A callable that can react to a notification carrying `Args`.
///
/// `Marker` is the prefix of `Args` the callable declares; it is inferred
/// at the connect site and never named by callers.
pub trait Reaction<Args, Marker> {
    /// Call the reaction with the leading values of `args`.
    fn react(&self, args: &Args);
}

/// A method-style callable invoked on a shared instance.
pub trait Method<Inst: ?Sized, Args, Marker> {
    /// Call the method on `instance` with the leading values of `args`.
    fn apply(&self, instance: &Inst, args: &Args);
}

/// A method-style callable invoked on an exclusively borrowed instance.
pub trait MethodMut<Inst: ?Sized, Args, Marker> {
    /// Call the method on `instance` with the leading values of `args`.
    fn apply_mut(&self, instance: &mut Inst, args: &Args);
}

/// A tuple type that is a prefix of `Args`.
pub trait Prefix<Args> {
    /// Clone the leading values of `args` into `Self`.
    fn take_prefix(args: &Args) -> Self;
}

/// Marker for reactions that borrow the prefix `P` instead of cloning it.
///
/// Never constructed; it only keeps the by-reference impls apart from the
/// by-value ones.
pub struct ByRef<P>(PhantomData<fn() -> P>);

/// Invoke `reaction` with as many leading values of `args` as it declares.
#[inline]
pub fn invoke<Args, Marker, F>(reaction: &F, args: &Args)
where
    F: Reaction<Args, Marker> + ?Sized,
{
    reaction.react(args);
}

macro_rules! impl_prefix {
    ([$($all:ident),*] []) => {
        impl_prefix!(@cloned [$($all),*] []);
    };
    ([$($all:ident),*] [$($idx:tt : $pre:ident),+]) => {
        impl_prefix!(@cloned [$($all),*] [$($idx : $pre),+]);
        impl_prefix!(@borrowed [$($all),*] [$($idx : $pre),+]);
    };
    (@cloned [$($all:ident),*] [$($idx:tt : $pre:ident),*]) => {
        impl<Func, Ret, $($all),*> Reaction<($($all,)*), ($($pre,)*)> for Func
        where
            Func: Fn($($pre),*) -> Ret,
            $($pre: Clone,)*
        {
            #[inline]
            #[allow(unused_variables)]
            fn react(&self, args: &($($all,)*)) {
                let _ = (self)($(args.$idx.clone()),*);
            }
        }

        impl<Func, Ret, Inst: ?Sized, $($all),*> Method<Inst, ($($all,)*), ($($pre,)*)> for Func
        where
            Func: Fn(&Inst $(, $pre)*) -> Ret,
            $($pre: Clone,)*
        {
            #[inline]
            #[allow(unused_variables)]
            fn apply(&self, instance: &Inst, args: &($($all,)*)) {
                let _ = (self)(instance $(, args.$idx.clone())*);
            }
        }

        impl<Func, Ret, Inst: ?Sized, $($all),*> MethodMut<Inst, ($($all,)*), ($($pre,)*)> for Func
        where
            Func: Fn(&mut Inst $(, $pre)*) -> Ret,
            $($pre: Clone,)*
        {
            #[inline]
            #[allow(unused_variables)]
            fn apply_mut(&self, instance: &mut Inst, args: &($($all,)*)) {
                let _ = (self)(instance $(, args.$idx.clone())*);
            }
        }

        impl<$($all),*> Prefix<($($all,)*)> for ($($pre,)*)
        where
            $($pre: Clone,)*
        {
            #[inline]
            #[allow(unused_variables)]
            fn take_prefix(args: &($($all,)*)) -> Self {
                ($(args.$idx.clone(),)*)
            }
        }
    };
    (@borrowed [$($all:ident),*] [$($idx:tt : $pre:ident),+]) => {
        impl<Func, Ret, $($all),*> Reaction<($($all,)*), ByRef<($($pre,)+)>> for Func
        where
            Func: Fn($(&$pre),+) -> Ret,
        {
            #[inline]
            fn react(&self, args: &($($all,)*)) {
                let _ = (self)($(&args.$idx),+);
            }
        }

        impl<Func, Ret, Inst: ?Sized, $($all),*> Method<Inst, ($($all,)*), ByRef<($($pre,)+)>> for Func
        where
            Func: Fn(&Inst, $(&$pre),+) -> Ret,
        {
            #[inline]
            fn apply(&self, instance: &Inst, args: &($($all,)*)) {
                let _ = (self)(instance, $(&args.$idx),+);
            }
        }

        impl<Func, Ret, Inst: ?Sized, $($all),*> MethodMut<Inst, ($($all,)*), ByRef<($($pre,)+)>> for Func
        where
            Func: Fn(&mut Inst, $(&$pre),+) -> Ret,
        {
            #[inline]
            fn apply_mut(&self, instance: &mut Inst, args: &($($all,)*)) {
                let _ = (self)(instance, $(&args.$idx),+);
            }
        }
    };
}

impl_prefix!([] []);

impl_prefix!([T1] []);
impl_prefix!([T1] [0: T1]);

impl_prefix!([T1, T2] []);
impl_prefix!([T1, T2] [0: T1]);
impl_prefix!([T1, T2] [0: T1, 1: T2]);

impl_prefix!([T1, T2, T3] []);
impl_prefix!([T1, T2, T3] [0: T1]);
impl_prefix!([T1, T2, T3] [0: T1, 1: T2]);
impl_prefix!([T1, T2, T3] [0: T1, 1: T2, 2: T3]);

impl_prefix!([T1, T2, T3, T4] []);
impl_prefix!([T1, T2, T3, T4] [0: T1]);
impl_prefix!([T1, T2, T3, T4] [0: T1, 1: T2]);
impl_prefix!([T1, T2, T3, T4] [0: T1, 1: T2, 2: T3]);
impl_prefix!([T1, T2, T3, T4] [0: T1, 1: T2, 2: T3, 3: T4]);

impl_prefix!([T1, T2, T3, T4, T5] []);
impl_prefix!([T1, T2, T3, T4, T5] [0: T1]);
impl_prefix!([T1, T2, T3, T4, T5] [0: T1, 1: T2]);
impl_prefix!([T1, T2, T3, T4, T5] [0: T1, 1: T2, 2: T3]);
impl_prefix!([T1, T2, T3, T4, T5] [0: T1, 1: T2, 2: T3, 3: T4]);
impl_prefix!([T1, T2, T3, T4, T5] [0: T1, 1: T2, 2: T3, 3: T4, 4: T5]);

impl_prefix!([T1, T2, T3, T4, T5, T6] []);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1]);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1, 1: T2]);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1, 1: T2, 2: T3]);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1, 1: T2, 2: T3, 3: T4]);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1, 1: T2, 2: T3, 3: T4, 4: T5]);
impl_prefix!([T1, T2, T3, T4, T5, T6] [0: T1, 1: T2, 2: T3, 3: T4, 4: T5, 5: T6]);
