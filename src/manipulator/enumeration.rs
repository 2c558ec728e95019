use crate::diagnostics;

use super::FlagManipulator;

/// A field-less enum with a primitive `repr` and an unused discriminant
///
/// `#[derive(Payload)]` implements this for such enums, picking the
/// discriminant after the largest one (or before the smallest one if the
/// largest is the maximum of the `repr`), unless one is given with
/// `#[tinyopt(sentinel = ...)]`.
///
/// The derive checks the sentinel against every variant, also against
/// discriminants that are not literals:
///
/// ```compile_fail
/// #[derive(tinyopt::Payload)]
/// #[repr(u8)]
/// #[tinyopt(sentinel = 2)]
/// enum Clash {
///     A = 1 + 1,
///     B = 5,
/// }
/// ```
///
/// # Safety
///
/// `Repr` must be the `repr` of the enum and `SENTINEL` must not be the
/// discriminant of any variant.
pub unsafe trait BoundedEnum: Sized {
    type Repr: Copy + PartialEq;

    const SENTINEL: Self::Repr;
}

/// The spare discriminant of a [`BoundedEnum`]
pub struct EnumSentinel;

unsafe impl<T: BoundedEnum> FlagManipulator<T> for EnumSentinel {
    const VALID: () = assert!(
        size_of::<T>() == size_of::<T::Repr>(),
        "{}",
        diagnostics::ENUM_REPR_MISMATCH
    );

    unsafe fn is_empty(slot: *const T) -> bool {
        unsafe { slot.cast::<T::Repr>().read() == T::SENTINEL }
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { slot.cast::<T::Repr>().write(T::SENTINEL) }
    }

    unsafe fn clear_empty_mark(_slot: *mut T) {}
}
