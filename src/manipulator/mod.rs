//! Strategies that encode emptiness
//!
//! A [`FlagManipulator`] knows how to tell, from the bytes of a payload
//! slot alone, whether that slot holds a payload or is marked empty. It
//! also knows how to put that mark into uninitialized storage and how to
//! take it out again before a real payload is constructed.
//!
//! Manipulators are zero-sized marker types. They never hold state and
//! they are never instantiated.

mod bits;
mod enumeration;
mod field;
mod sentinel;
mod separate;

use crate::diagnostics;

pub use bits::{BoolByte, CharBits, NanBits, NonZeroBits, NullPointer, ZeroBits};
pub use enumeration::{BoundedEnum, EnumSentinel};
pub use field::{AtField, FieldOf};
pub use sentinel::{BoolSentinel, EmptyValue, EmptyVia, Sentinel, SentinelTarget};
pub use separate::SeparateFlag;

/// Strategy for encoding "empty" inside a slot of type `T`
///
/// The slot passed to these functions is in one of two states: it either
/// holds a live `T`, or [`mark_empty`](FlagManipulator::mark_empty) has been
/// applied to it. Manipulators only ever touch the bytes they use as the
/// flag.
///
/// # Safety
///
/// Implementations must uphold the following:
///  - `is_empty` returns `true` after `mark_empty` and until
///    `clear_empty_mark` is called, unless evaluating `VALID` fails for `T`.
///  - `is_empty` returns `false` for every payload value that the container
///    is allowed to hold. Values for which it returns `true` are the
///    reserved sentinels and must not be stored.
///  - None of the functions read or write outside of the slot.
///  - None of the functions panic.
pub unsafe trait FlagManipulator<T> {
    /// Build-time validation of the manipulator for `T`
    ///
    /// Evaluating this constant fails compilation if the manipulator cannot
    /// be used for `T`. It is evaluated whenever an empty slot is created.
    const VALID: () = ();

    /// Whether the slot is marked empty
    ///
    /// # Safety
    ///
    /// The slot must either hold a live `T` or be marked empty by this
    /// manipulator.
    unsafe fn is_empty(slot: *const T) -> bool;

    /// Mark the slot as empty
    ///
    /// # Safety
    ///
    /// The slot must be valid for writes and must not hold a live `T`; any
    /// value in it is overwritten without being dropped.
    unsafe fn mark_empty(slot: *mut T);

    /// Remove the empty mark, leaving the slot uninitialized
    ///
    /// # Safety
    ///
    /// The slot must be marked empty by this manipulator.
    unsafe fn clear_empty_mark(slot: *mut T);
}

/// The manipulator of payloads that have no in-place encoding
///
/// It never reports empty and never writes anything, so it only names the
/// manipulator of payloads that use the [`Separate`](crate::Separate)
/// representation, which keeps its own flag. Its `VALID` never evaluates,
/// so any in-place use fails to compile:
///
/// ```compile_fail
/// use tinyopt::{Custom, Optional, Selected, Unregistered};
///
/// const _: Selected = Optional::<u64, Custom<Unregistered>>::SELECTED;
/// ```
pub struct Unregistered;

unsafe impl<T> FlagManipulator<T> for Unregistered {
    const VALID: () = panic!("{}", diagnostics::NO_IN_PLACE_ENCODING);

    unsafe fn is_empty(_slot: *const T) -> bool {
        false
    }

    unsafe fn mark_empty(_slot: *mut T) {}

    unsafe fn clear_empty_mark(_slot: *mut T) {}
}

#[cfg(test)]
mod tests;
