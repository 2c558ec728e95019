use std::{marker::PhantomData, ptr};

use crate::diagnostics;

use super::FlagManipulator;

/// Types that can hold an integer sentinel given as a const parameter
///
/// The range is expressed in `i128`, so `u128` sentinels above `i128::MAX`
/// cannot be expressed.
pub trait SentinelTarget: Copy + PartialEq {
    /// Whether the type is `bool`; booleans only take [`BoolSentinel`]
    const IS_BOOL: bool = false;

    /// Smallest representable value
    const MIN: i128;

    /// Largest representable value
    const MAX: i128;

    /// Convert a value that lies within `MIN..=MAX`
    fn from_i128(value: i128) -> Self;

    fn from_bool(value: bool) -> Self {
        Self::from_i128(value as i128)
    }
}

macro_rules! integer_target {
    ($($t:ty),* $(,)?) => {
        $(
            impl SentinelTarget for $t {
                const MIN: i128 = <$t>::MIN as i128;
                const MAX: i128 = <$t>::MAX as i128;

                fn from_i128(value: i128) -> Self {
                    value as $t
                }
            }
        )*
    };
}

integer_target!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl SentinelTarget for u128 {
    const MIN: i128 = 0;
    const MAX: i128 = i128::MAX;

    fn from_i128(value: i128) -> Self {
        value as u128
    }
}

impl SentinelTarget for bool {
    const IS_BOOL: bool = true;
    const MIN: i128 = 0;
    const MAX: i128 = 1;

    fn from_i128(value: i128) -> Self {
        value != 0
    }

    fn from_bool(value: bool) -> Self {
        value
    }
}

impl<T> SentinelTarget for *const T {
    const MIN: i128 = 0;
    const MAX: i128 = usize::MAX as i128;

    fn from_i128(value: i128) -> Self {
        ptr::without_provenance(value as usize)
    }
}

impl<T> SentinelTarget for *mut T {
    const MIN: i128 = 0;
    const MAX: i128 = usize::MAX as i128;

    fn from_i128(value: i128) -> Self {
        ptr::without_provenance_mut(value as usize)
    }
}

/// A reserved integer (or address) that marks the slot as empty
///
/// Compilation fails if `V` does not fit the flag type or if the flag type
/// is `bool`.
pub struct Sentinel<const V: i128>;

unsafe impl<T: SentinelTarget, const V: i128> FlagManipulator<T>
    for Sentinel<V>
{
    const VALID: () = {
        assert!(!T::IS_BOOL, "{}", diagnostics::BOOL_MISMATCH);
        assert!(
            T::MIN <= V && V <= T::MAX,
            "{}",
            diagnostics::SENTINEL_OUT_OF_RANGE
        );
    };

    unsafe fn is_empty(slot: *const T) -> bool {
        unsafe { slot.read() == T::from_i128(V) }
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { slot.write(T::from_i128(V)) }
    }

    unsafe fn clear_empty_mark(_slot: *mut T) {}
}

/// A reserved boolean that marks the slot as empty
///
/// The flag type must be `bool`.
pub struct BoolSentinel<const B: bool>;

unsafe impl<T: SentinelTarget, const B: bool> FlagManipulator<T>
    for BoolSentinel<B>
{
    const VALID: () = assert!(T::IS_BOOL, "{}", diagnostics::BOOL_MISMATCH);

    unsafe fn is_empty(slot: *const T) -> bool {
        unsafe { slot.read() == T::from_bool(B) }
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { slot.write(T::from_bool(B)) }
    }

    unsafe fn clear_empty_mark(_slot: *mut T) {}
}

/// Supplies the reserved value of a `T` through a type
pub trait EmptyValue<T> {
    const VALUE: T;
}

/// A reserved value supplied by `E` that marks the slot as empty
///
/// This takes any type with a `const` value, like floats, `char`s or
/// structs. The value is compared with `==`, so it must be equal to itself:
/// a NaN does not work here, use [`NanBits`](super::NanBits) for that.
///
/// The empty value is a real `T` that is constructed on `mark_empty` and
/// dropped on `clear_empty_mark`. Its `PartialEq` and `Drop` impls must not
/// panic.
pub struct EmptyVia<E>(PhantomData<fn() -> E>);

unsafe impl<T: PartialEq, E: EmptyValue<T>> FlagManipulator<T>
    for EmptyVia<E>
{
    unsafe fn is_empty(slot: *const T) -> bool {
        unsafe { *slot == E::VALUE }
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { slot.write(E::VALUE) }
    }

    unsafe fn clear_empty_mark(slot: *mut T) {
        unsafe { ptr::drop_in_place(slot) }
    }
}
