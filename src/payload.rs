//! Registration of default encodings per payload type
//!
//! Every type that is used with [`Auto`](crate::Auto) or
//! [`Compact`](crate::Compact) implements [`Payload`]. The implementation
//! either names an in-place [`FlagManipulator`] for the type or declares
//! that the type has none, in which case the container falls back to a
//! separate flag.
//!
//! Register your own types with [`#[derive(Payload)]`](crate::Payload) or
//! with the [`payload!`](crate::payload!) macro.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    num::{
        NonZeroI128, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8,
        NonZeroIsize, NonZeroU128, NonZeroU16, NonZeroU32, NonZeroU64,
        NonZeroU8, NonZeroUsize,
    },
    ptr::NonNull,
    rc::Rc,
    sync::Arc,
};

use crate::{
    manipulator::{
        BoolByte, CharBits, NanBits, NullPointer, Unregistered, ZeroBits,
    },
    FlagManipulator, InPlace, Representation, Separate,
};

/// The default emptiness encoding of a type
///
/// `Representation` is either `InPlace<Self, Self::Manipulator>` or
/// `Separate<Self>` with [`Unregistered`](crate::Unregistered) as the
/// manipulator. No other combinations are meaningful.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no registered emptiness encoding",
    note = "derive `Payload` for `{Self}` or register it with \
            `tinyopt::payload!`; use `separate` to opt into a separate flag"
)]
pub trait Payload: Sized {
    type Manipulator: FlagManipulator<Self>;
    type Representation: Representation<Self>;
}

/// Implement [`Payload`] for non-generic types
///
/// ```
/// struct Meters(f64);
/// struct Label(String);
///
/// # struct MetersFlag;
/// # unsafe impl tinyopt::FlagManipulator<Meters> for MetersFlag {
/// #     unsafe fn is_empty(slot: *const Meters) -> bool {
/// #         unsafe { (*slot).0 < 0.0 }
/// #     }
/// #     unsafe fn mark_empty(slot: *mut Meters) {
/// #         unsafe { slot.write(Meters(-1.0)) }
/// #     }
/// #     unsafe fn clear_empty_mark(_slot: *mut Meters) {}
/// # }
/// tinyopt::payload!(Meters => MetersFlag);
/// tinyopt::payload!(separate: Label);
///
/// assert!(tinyopt::Optional::<Meters>::IN_PLACE);
/// assert!(!tinyopt::Optional::<Label>::IN_PLACE);
/// ```
#[macro_export]
macro_rules! payload {
    (separate: $($t:ty),* $(,)?) => {
        $(
            impl $crate::Payload for $t {
                type Manipulator = $crate::Unregistered;
                type Representation = $crate::Separate<$t>;
            }
        )*
    };
    ($($t:ty => $m:ty),* $(,)?) => {
        $(
            impl $crate::Payload for $t {
                type Manipulator = $m;
                type Representation = $crate::InPlace<$t, $m>;
            }
        )*
    };
}

payload!(
    f32 => NanBits,
    f64 => NanBits,
    bool => BoolByte,
    char => CharBits,
    NonZeroU8 => ZeroBits,
    NonZeroU16 => ZeroBits,
    NonZeroU32 => ZeroBits,
    NonZeroU64 => ZeroBits,
    NonZeroU128 => ZeroBits,
    NonZeroUsize => ZeroBits,
    NonZeroI8 => ZeroBits,
    NonZeroI16 => ZeroBits,
    NonZeroI32 => ZeroBits,
    NonZeroI64 => ZeroBits,
    NonZeroI128 => ZeroBits,
    NonZeroIsize => ZeroBits,
);

// Every bit pattern of these is a valid value.
payload!(
    separate: (),
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
);

impl<T> Payload for *const T {
    type Manipulator = NullPointer;
    type Representation = InPlace<Self, NullPointer>;
}

impl<T> Payload for *mut T {
    type Manipulator = NullPointer;
    type Representation = InPlace<Self, NullPointer>;
}

macro_rules! zero_bits_pointer {
    ($($t:ty),* $(,)?) => {
        $(
            impl<T: ?Sized> Payload for $t {
                type Manipulator = ZeroBits;
                type Representation = InPlace<Self, ZeroBits>;
            }
        )*
    };
}

zero_bits_pointer!(NonNull<T>, Box<T>, Rc<T>, Arc<T>);

impl<T: ?Sized> Payload for &T {
    type Manipulator = ZeroBits;
    type Representation = InPlace<Self, ZeroBits>;
}

impl<T: ?Sized> Payload for &mut T {
    type Manipulator = ZeroBits;
    type Representation = InPlace<Self, ZeroBits>;
}

macro_rules! separate_generic {
    ($($t:ident<$($p:ident),*>),* $(,)?) => {
        $(
            impl<$($p),*> Payload for $t<$($p),*> {
                type Manipulator = Unregistered;
                type Representation = Separate<Self>;
            }
        )*
    };
}

separate_generic!(
    Vec<T>,
    VecDeque<T>,
    Option<T>,
    HashMap<K, V>,
    BTreeMap<K, V>,
);
