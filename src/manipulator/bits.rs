//! Manipulators exploiting bit patterns a type never produces
//!
//! These assume IEEE-754 floating point and the usual representation of
//! pointers, which holds for every target Rust supports.

use std::{
    num::{
        NonZeroI128, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8,
        NonZeroIsize, NonZeroU128, NonZeroU16, NonZeroU32, NonZeroU64,
        NonZeroU8, NonZeroUsize,
    },
    ptr::{self, NonNull},
    rc::Rc,
    sync::Arc,
};

use super::FlagManipulator;

/// A quiet NaN with a payload that no arithmetic operation produces
///
/// Genuine NaNs, including the canonical ones, can still be stored. Only
/// the exact bit pattern below is reserved.
pub struct NanBits;

impl NanBits {
    pub const F64: u64 = 0x7ff8_fedc_ba98_7654;
    pub const F32: u32 = 0x7fed_cba9;
}

unsafe impl FlagManipulator<f64> for NanBits {
    unsafe fn is_empty(slot: *const f64) -> bool {
        unsafe { slot.cast::<u64>().read() == Self::F64 }
    }

    unsafe fn mark_empty(slot: *mut f64) {
        unsafe { slot.cast::<u64>().write(Self::F64) }
    }

    unsafe fn clear_empty_mark(_slot: *mut f64) {}
}

unsafe impl FlagManipulator<f32> for NanBits {
    unsafe fn is_empty(slot: *const f32) -> bool {
        unsafe { slot.cast::<u32>().read() == Self::F32 }
    }

    unsafe fn mark_empty(slot: *mut f32) {
        unsafe { slot.cast::<u32>().write(Self::F32) }
    }

    unsafe fn clear_empty_mark(_slot: *mut f32) {}
}

/// A `bool` byte that is neither 0 nor 1
pub struct BoolByte;

impl BoolByte {
    pub const BYTE: u8 = 0xfe;
}

unsafe impl FlagManipulator<bool> for BoolByte {
    unsafe fn is_empty(slot: *const bool) -> bool {
        unsafe { slot.cast::<u8>().read() == Self::BYTE }
    }

    unsafe fn mark_empty(slot: *mut bool) {
        unsafe { slot.cast::<u8>().write(Self::BYTE) }
    }

    unsafe fn clear_empty_mark(_slot: *mut bool) {}
}

/// A `char` code above the Unicode range
pub struct CharBits;

impl CharBits {
    pub const CODE: u32 = 0xffff_fffe;
}

unsafe impl FlagManipulator<char> for CharBits {
    unsafe fn is_empty(slot: *const char) -> bool {
        unsafe { slot.cast::<u32>().read() == Self::CODE }
    }

    unsafe fn mark_empty(slot: *mut char) {
        unsafe { slot.cast::<u32>().write(Self::CODE) }
    }

    unsafe fn clear_empty_mark(_slot: *mut char) {}
}

/// The null pointer as the empty value of a raw pointer
///
/// Use [`Sentinel`](super::Sentinel) with an address to reserve a non-null
/// pointer instead, so that null can be stored.
pub struct NullPointer;

unsafe impl<T> FlagManipulator<*const T> for NullPointer {
    unsafe fn is_empty(slot: *const *const T) -> bool {
        unsafe { slot.read().is_null() }
    }

    unsafe fn mark_empty(slot: *mut *const T) {
        unsafe { slot.write(ptr::null()) }
    }

    unsafe fn clear_empty_mark(_slot: *mut *const T) {}
}

unsafe impl<T> FlagManipulator<*mut T> for NullPointer {
    unsafe fn is_empty(slot: *const *mut T) -> bool {
        unsafe { slot.read().is_null() }
    }

    unsafe fn mark_empty(slot: *mut *mut T) {
        unsafe { slot.write(ptr::null_mut()) }
    }

    unsafe fn clear_empty_mark(_slot: *mut *mut T) {}
}

/// Types for which a value made of only zero bytes is invalid
///
/// # Safety
///
/// No valid value of the type may consist of only zero bytes, and the type
/// must not contain padding.
pub unsafe trait NonZeroBits {}

unsafe impl<T: ?Sized> NonZeroBits for &T {}
unsafe impl<T: ?Sized> NonZeroBits for &mut T {}
unsafe impl<T: ?Sized> NonZeroBits for NonNull<T> {}
unsafe impl<T: ?Sized> NonZeroBits for Box<T> {}
unsafe impl<T: ?Sized> NonZeroBits for Rc<T> {}
unsafe impl<T: ?Sized> NonZeroBits for Arc<T> {}

macro_rules! non_zero_bits {
    ($($t:ty),* $(,)?) => {
        $(unsafe impl NonZeroBits for $t {})*
    };
}

non_zero_bits!(
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroU128,
    NonZeroUsize,
    NonZeroI8,
    NonZeroI16,
    NonZeroI32,
    NonZeroI64,
    NonZeroI128,
    NonZeroIsize,
);

/// The all-zero bit pattern of a [`NonZeroBits`] type
pub struct ZeroBits;

unsafe impl<T: NonZeroBits> FlagManipulator<T> for ZeroBits {
    unsafe fn is_empty(slot: *const T) -> bool {
        let bytes = slot.cast::<u8>();
        (0..size_of::<T>()).all(|i| unsafe { bytes.add(i).read() } == 0)
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { slot.write_bytes(0, 1) }
    }

    unsafe fn clear_empty_mark(_slot: *mut T) {}
}
