//! Build-time diagnostics
//!
//! Invalid configurations of an [`Optional`](crate::Optional) fail
//! compilation. Most of them are detected while evaluating a constant after
//! monomorphization, so they show up with `cargo build` but not
//! necessarily with `cargo check`. The compiler adds a note naming the
//! instantiated `Optional` type, which points at the offending input.
//!
//! A designator of a field that does not belong to the payload is a plain
//! trait error instead (see [`FieldOf`](crate::FieldOf)).
//!
//! The message texts are collected here so they are easy to grep for.

/// Rules 3 and 5: sentinel does not fit the flag type
///
/// Both ends of the flag type are valid sentinels:
///
/// ```
/// use tinyopt::{Optional, Selected, Sentinel};
///
/// const _: Selected = Optional::<u8, Sentinel<255>>::SELECTED;
/// const _: Selected = Optional::<i8, Sentinel<-128>>::SELECTED;
/// let x = Optional::<u8, Sentinel<255>>::new();
/// assert!(x.is_empty());
/// ```
///
/// One past them is not:
///
/// ```compile_fail
/// use tinyopt::{Optional, Selected, Sentinel};
///
/// const _: Selected = Optional::<u8, Sentinel<256>>::SELECTED;
/// ```
///
/// ```compile_fail
/// use tinyopt::{Optional, Selected, Sentinel};
///
/// const _: Selected = Optional::<i8, Sentinel<-129>>::SELECTED;
/// ```
pub const SENTINEL_OUT_OF_RANGE: &str =
    "sentinel value is outside the representable range of the flag type; \
     pick a sentinel that is a valid value of the flag type";

/// Rules 3 and 5: `bool` sentinel for a non-`bool` flag or vice versa
///
/// ```compile_fail
/// use tinyopt::{Optional, Selected, Sentinel};
///
/// const _: Selected = Optional::<bool, Sentinel<1>>::SELECTED;
/// ```
///
/// ```compile_fail
/// use tinyopt::{BoolSentinel, Optional, Selected};
///
/// const _: Selected = Optional::<u8, BoolSentinel<true>>::SELECTED;
/// ```
pub const BOOL_MISMATCH: &str =
    "boolean and non-boolean mismatch between sentinel and flag type; use \
     `BoolSentinel` for `bool` flags and `Sentinel` for all other flag types";

/// Rules 4 and 5: designated field is not a field of the payload
///
/// This one is reported by the trait system, in a message that contains
/// this text.
///
/// ```compile_fail
/// use tinyopt::{Field, Fields, Optional, Sentinel};
///
/// #[derive(Fields)]
/// struct Port {
///     number: u16,
/// }
///
/// struct Host {
///     number: u16,
/// }
///
/// let x = Optional::<Host, Field<port_fields::number, Sentinel<0>>>::new();
/// ```
pub const FIELD_NOT_OF_PAYLOAD: &str = "does not belong to payload type";

/// Rule 4: bare field without a strategy of its own
///
/// ```compile_fail
/// use tinyopt::{Field, Fields, Optional, Selected};
///
/// #[derive(Fields)]
/// struct Port {
///     number: u16,
/// }
///
/// const _: Selected = Optional::<Port, Field<port_fields::number>>::SELECTED;
/// ```
pub const FIELD_WITHOUT_STRATEGY: &str =
    "field type has no registered flag manipulator; supply a sentinel for \
     the field, as in `Field<F, Sentinel<V>>`";

/// In-place storage demanded with `Compact`, but nothing resolves
///
/// Also raised for any in-place use of [`Unregistered`](crate::Unregistered).
///
/// ```compile_fail
/// use tinyopt::{Compact, Optional, Selected};
///
/// const _: Selected = Optional::<i32, Compact>::SELECTED;
/// ```
pub const NO_IN_PLACE_ENCODING: &str =
    "no safe in-place encoding is registered for the payload type; register \
     a manipulator, supply a sentinel or a custom manipulator, or use `Auto` \
     to accept a separate flag";

/// A `BoundedEnum` whose `Repr` is not its representation
pub const ENUM_REPR_MISMATCH: &str =
    "the `Repr` of a `BoundedEnum` must have the size of the enum";

/// An explicit enum sentinel equal to the discriminant of a variant
pub const ENUM_SENTINEL_TAKEN: &str =
    "enum sentinel is the discriminant of a variant; pick an unused value";

/// Run-time assertion in debug builds after a payload was stored
pub const SENTINEL_ASSIGNED: &str =
    "optional is empty right after storing a payload; maybe the value \
     reserved to mark emptiness was stored, use reset() instead";

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn messages_are_distinct() {
        let messages = [
            SENTINEL_OUT_OF_RANGE,
            BOOL_MISMATCH,
            FIELD_NOT_OF_PAYLOAD,
            FIELD_WITHOUT_STRATEGY,
            NO_IN_PLACE_ENCODING,
            ENUM_REPR_MISMATCH,
            ENUM_SENTINEL_TAKEN,
            SENTINEL_ASSIGNED,
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn out_of_range_message() {
        assert_snapshot!(
            SENTINEL_OUT_OF_RANGE,
            @"sentinel value is outside the representable range of the flag type; pick a sentinel that is a valid value of the flag type"
        );
    }
}
