use std::{mem::MaybeUninit, num::NonZeroU16, ptr::NonNull};

use super::*;

/// Mark a fresh slot empty and return it
fn marked<T, M: FlagManipulator<T>>() -> MaybeUninit<T> {
    let mut slot = MaybeUninit::uninit();
    unsafe { M::mark_empty(slot.as_mut_ptr()) };
    slot
}

fn is_empty<T, M: FlagManipulator<T>>(value: T) -> bool {
    unsafe { M::is_empty(&value) }
}

#[test]
fn nan_bits() {
    let slot = marked::<f64, NanBits>();
    assert!(unsafe { NanBits::is_empty(slot.as_ptr()) });
    assert!(unsafe { slot.assume_init() }.is_nan());

    assert!(!is_empty::<f64, NanBits>(f64::NAN));
    assert!(!is_empty::<f64, NanBits>(-f64::NAN));
    assert!(!is_empty::<f64, NanBits>(0.0));
    assert!(!is_empty::<f64, NanBits>(f64::INFINITY));
    assert!(is_empty::<f64, NanBits>(f64::from_bits(NanBits::F64)));

    let slot = marked::<f32, NanBits>();
    assert!(unsafe { NanBits::is_empty(slot.as_ptr()) });
    assert!(!is_empty::<f32, NanBits>(f32::NAN));
    assert!(!is_empty::<f32, NanBits>(-0.0));
}

#[test]
fn bool_byte() {
    let slot = marked::<bool, BoolByte>();
    assert!(unsafe { BoolByte::is_empty(slot.as_ptr()) });
    assert_eq!(unsafe { slot.as_ptr().cast::<u8>().read() }, 0xfe);
    assert!(!is_empty::<bool, BoolByte>(true));
    assert!(!is_empty::<bool, BoolByte>(false));
}

#[test]
fn char_bits() {
    let slot = marked::<char, CharBits>();
    assert!(unsafe { CharBits::is_empty(slot.as_ptr()) });
    assert!(!is_empty::<char, CharBits>(char::MAX));
    assert!(!is_empty::<char, CharBits>('\0'));
}

#[test]
fn null_pointer() {
    let slot = marked::<*const u32, NullPointer>();
    assert!(unsafe { slot.assume_init() }.is_null());

    let x = 5u32;
    assert!(!is_empty::<*const u32, NullPointer>(&x));
    assert!(is_empty::<*mut u32, NullPointer>(std::ptr::null_mut()));
}

#[test]
fn zero_bits() {
    let slot = marked::<NonNull<u8>, ZeroBits>();
    assert!(unsafe { ZeroBits::is_empty(slot.as_ptr()) });

    let x = 1u8;
    assert!(!is_empty::<&u8, ZeroBits>(&x));
    assert!(!is_empty::<&str, ZeroBits>(""));
    assert!(!is_empty::<NonZeroU16, ZeroBits>(NonZeroU16::MIN));
    assert!(!is_empty::<Box<[u8]>, ZeroBits>(Box::new([])));
}

#[test]
fn sentinel_boundaries() {
    assert!(is_empty::<i8, Sentinel<-128>>(i8::MIN));
    assert!(!is_empty::<i8, Sentinel<-128>>(-127));
    assert!(is_empty::<i8, Sentinel<127>>(i8::MAX));
    assert!(is_empty::<u64, Sentinel<{ u64::MAX as i128 }>>(u64::MAX));
    assert!(is_empty::<u128, Sentinel<{ i128::MAX }>>(i128::MAX as u128));
    assert!(is_empty::<i128, Sentinel<{ i128::MIN }>>(i128::MIN));

    let slot = marked::<u16, Sentinel<0>>();
    assert_eq!(unsafe { slot.assume_init() }, 0);
}

#[test]
fn pointer_sentinel() {
    let slot = marked::<*const u8, Sentinel<1>>();
    assert_eq!(unsafe { slot.assume_init() }.addr(), 1);
    assert!(!is_empty::<*const u8, Sentinel<1>>(std::ptr::null()));
}

#[test]
fn bool_sentinel() {
    assert!(is_empty::<bool, BoolSentinel<true>>(true));
    assert!(!is_empty::<bool, BoolSentinel<true>>(false));
}

struct EmptyName;

impl EmptyValue<String> for EmptyName {
    const VALUE: String = String::new();
}

#[test]
fn empty_via_type() {
    let mut slot = marked::<String, EmptyVia<EmptyName>>();
    assert!(unsafe { EmptyVia::<EmptyName>::is_empty(slot.as_ptr()) });
    assert!(!is_empty::<String, EmptyVia<EmptyName>>("x".into()));
    unsafe { EmptyVia::<EmptyName>::clear_empty_mark(slot.as_mut_ptr()) };
}

#[repr(C)]
struct Pair {
    key: u32,
    weight: f32,
}

struct PairWeight;

unsafe impl FieldOf<Pair> for PairWeight {
    type Type = f32;
    const OFFSET: usize = std::mem::offset_of!(Pair, weight);
    const NAME: &'static str = "weight";
}

#[test]
fn at_field() {
    let slot = marked::<Pair, AtField<PairWeight, NanBits>>();
    let weight = unsafe { slot.as_ptr().cast::<u8>().add(4).cast::<u32>().read() };
    assert_eq!(weight, NanBits::F32);

    let pair = Pair {
        key: 1,
        weight: 0.5,
    };
    assert!(!is_empty::<Pair, AtField<PairWeight, NanBits>>(pair));

    let pair = Pair {
        key: 1,
        weight: f32::from_bits(NanBits::F32),
    };
    assert_eq!(pair.key, 1);
    assert!(is_empty::<Pair, AtField<PairWeight, NanBits>>(pair));
}

#[test]
fn unregistered_never_empty() {
    assert!(!is_empty::<u8, Unregistered>(0));
    assert!(!is_empty::<String, Unregistered>(String::new()));

    // Only ever named by separate representations, which keep their own flag
    let x = crate::Optional::<u64>::new();
    assert_eq!(crate::Optional::<u64>::SELECTED, crate::Selected::Separate);
    assert!(x.is_empty());
}

#[test]
fn separate_flag() {
    let slot = marked::<bool, SeparateFlag>();
    assert!(unsafe { slot.assume_init() });
    assert!(!is_empty::<bool, SeparateFlag>(false));
}
