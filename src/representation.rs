//! How an [`Optional`](crate::Optional) lays out its memory
//!
//! There are exactly two layouts. [`InPlace`] is just the payload slot and
//! delegates emptiness to a [`FlagManipulator`]; it has the size of the
//! payload. [`Separate`] pairs the slot with a `bool`.

use std::marker::PhantomData;

use crate::{cell::Slot, manipulator::SeparateFlag, FlagManipulator};

/// Storage of a payload slot together with its emptiness flag
///
/// A representation is always in one of two states: marked empty, or
/// holding a live payload. It does not drop the payload by itself.
///
/// # Safety
///
/// `has_value` must report exactly whether a payload is live, given that
/// the container only moves between states with the functions below.
pub unsafe trait Representation<T>: Sized {
    /// Whether the flag lives inside the payload bytes
    const IN_PLACE: bool;

    /// Fails to evaluate if the flag cannot be encoded for `T`
    const VALID: () = ();

    /// A representation that is marked empty
    fn empty() -> Self;

    fn has_value(&self) -> bool;

    fn payload(&self) -> &Slot<T>;

    fn payload_mut(&mut self) -> &mut Slot<T>;

    /// Remove the empty mark, leaving the slot uninitialized
    ///
    /// # Safety
    ///
    /// Must be marked empty. A payload has to be written right after.
    unsafe fn clear_empty_mark(&mut self);

    /// Mark the representation empty
    ///
    /// # Safety
    ///
    /// The slot must not hold a live payload.
    unsafe fn mark_empty(&mut self);
}

/// Emptiness encoded in the payload bytes by `M`
#[repr(transparent)]
pub struct InPlace<T, M> {
    slot: Slot<T>,
    manipulator: PhantomData<fn() -> M>,
}

unsafe impl<T, M: FlagManipulator<T>> Representation<T> for InPlace<T, M> {
    const IN_PLACE: bool = true;
    const VALID: () = M::VALID;

    fn empty() -> Self {
        let () = Self::VALID;
        let mut repr = Self {
            slot: Slot::uninit(),
            manipulator: PhantomData,
        };
        unsafe { M::mark_empty(repr.slot.as_mut_ptr()) };
        repr
    }

    fn has_value(&self) -> bool {
        unsafe { !M::is_empty(self.slot.as_ptr()) }
    }

    fn payload(&self) -> &Slot<T> {
        &self.slot
    }

    fn payload_mut(&mut self) -> &mut Slot<T> {
        &mut self.slot
    }

    unsafe fn clear_empty_mark(&mut self) {
        unsafe { M::clear_empty_mark(self.slot.as_mut_ptr()) }
    }

    unsafe fn mark_empty(&mut self) {
        unsafe { M::mark_empty(self.slot.as_mut_ptr()) }
    }
}

/// Payload slot with a `bool` beside it
pub struct Separate<T> {
    slot: Slot<T>,
    is_empty: bool,
}

unsafe impl<T> Representation<T> for Separate<T> {
    const IN_PLACE: bool = false;

    fn empty() -> Self {
        let mut repr = Self {
            slot: Slot::uninit(),
            is_empty: false,
        };
        unsafe { repr.mark_empty() };
        repr
    }

    fn has_value(&self) -> bool {
        let flag = &self.is_empty;
        unsafe { !<SeparateFlag as FlagManipulator<bool>>::is_empty(flag) }
    }

    fn payload(&self) -> &Slot<T> {
        &self.slot
    }

    fn payload_mut(&mut self) -> &mut Slot<T> {
        &mut self.slot
    }

    unsafe fn clear_empty_mark(&mut self) {
        unsafe {
            <SeparateFlag as FlagManipulator<bool>>::clear_empty_mark(
                &mut self.is_empty,
            )
        }
    }

    unsafe fn mark_empty(&mut self) {
        unsafe {
            <SeparateFlag as FlagManipulator<bool>>::mark_empty(
                &mut self.is_empty,
            )
        }
    }
}
