//! Compile-time selection of the emptiness encoding
//!
//! The second type parameter of [`Optional`](crate::Optional) is a
//! configuration type. Each configuration type stands for one rule, so the
//! rules cannot overlap:
//!
//! | Configuration                | Rule                                 |
//! |------------------------------|--------------------------------------|
//! | [`Custom<M>`]                | 1. custom manipulator `M`            |
//! | [`Auto`], registered payload | 2. registered manipulator            |
//! | [`Sentinel<V>`], [`BoolSentinel<B>`], [`EmptyVia<E>`] | 3. whole-value sentinel |
//! | [`Field<F>`]                 | 4. registered manipulator of a field |
//! | [`Field<F, S>`]              | 5. sentinel `S` in a field           |
//! | [`Auto`], other payloads     | 6. separate flag                     |
//!
//! [`Compact`] behaves like [`Auto`] but refuses to fall back to rule 6.
//!
//! Invalid configurations never degrade to a separate flag. They fail to
//! compile with one of the messages in [`diagnostics`](crate::diagnostics).

use std::{fmt, marker::PhantomData};

use crate::{
    diagnostics,
    manipulator::{
        AtField, BoolSentinel, EmptyValue, EmptyVia, FieldOf, Sentinel,
        SentinelTarget,
    },
    FlagManipulator, InPlace, Payload, Representation,
};

/// The rule that resolved a configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selected {
    /// A custom manipulator was given
    Custom,

    /// The payload type has a registered in-place manipulator
    Registered,

    /// A sentinel of the payload type was given
    Sentinel,

    /// A field whose type has a registered in-place manipulator was given
    Field,

    /// A field and a sentinel for it were given
    FieldSentinel,

    /// Nothing resolved, the payload is paired with a `bool`
    Separate,
}

impl Selected {
    /// All rules in the order in which they are tried
    pub const ALL: [Selected; 6] = [
        Selected::Custom,
        Selected::Registered,
        Selected::Sentinel,
        Selected::Field,
        Selected::FieldSentinel,
        Selected::Separate,
    ];

    pub const fn rule(self) -> u8 {
        match self {
            Selected::Custom => 1,
            Selected::Registered => 2,
            Selected::Sentinel => 3,
            Selected::Field => 4,
            Selected::FieldSentinel => 5,
            Selected::Separate => 6,
        }
    }

    /// Whether the container has the size of the payload
    pub const fn is_in_place(self) -> bool {
        !matches!(self, Selected::Separate)
    }

    pub fn summary(self) -> &'static str {
        match self {
            Selected::Custom => "custom manipulator, used verbatim",
            Selected::Registered => "manipulator registered for the payload",
            Selected::Sentinel => "sentinel value of the payload",
            Selected::Field => "manipulator registered for a payload field",
            Selected::FieldSentinel => "sentinel value of a payload field",
            Selected::Separate => "separate bool beside the payload",
        }
    }

    /// The build-time diagnostics a configuration of this rule can raise
    pub fn diagnostics(self) -> &'static [&'static str] {
        match self {
            Selected::Custom | Selected::Separate => &[],
            Selected::Registered => &[diagnostics::NO_IN_PLACE_ENCODING],
            Selected::Sentinel => &[
                diagnostics::SENTINEL_OUT_OF_RANGE,
                diagnostics::BOOL_MISMATCH,
            ],
            Selected::Field => &[
                diagnostics::FIELD_NOT_OF_PAYLOAD,
                diagnostics::FIELD_WITHOUT_STRATEGY,
            ],
            Selected::FieldSentinel => &[
                diagnostics::FIELD_NOT_OF_PAYLOAD,
                diagnostics::SENTINEL_OUT_OF_RANGE,
                diagnostics::BOOL_MISMATCH,
            ],
        }
    }
}

impl fmt::Display for Selected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selected::Custom => "custom",
            Selected::Registered => "registered",
            Selected::Sentinel => "sentinel",
            Selected::Field => "field",
            Selected::FieldSentinel => "field sentinel",
            Selected::Separate => "separate",
        };
        write!(f, "rule {} ({name})", self.rule())
    }
}

/// A configuration that resolves the encoding for payload `T`
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot select an emptiness encoding for `{T}`",
    note = "with `Auto` or `Compact`, `{T}` must implement `Payload`; \
            otherwise pass a `Sentinel`, `Field` or `Custom` configuration"
)]
pub trait Select<T> {
    type Representation: Representation<T>;

    /// The rule this configuration resolved to for `T`
    ///
    /// Evaluating this constant fails compilation for invalid
    /// configurations.
    const SELECTED: Selected;
}

/// The registered encoding of the payload, or a separate flag
pub struct Auto;

impl<T: Payload> Select<T> for Auto {
    type Representation = T::Representation;

    const SELECTED: Selected = {
        let () = <T::Representation as Representation<T>>::VALID;
        if <T::Representation as Representation<T>>::IN_PLACE {
            Selected::Registered
        } else {
            Selected::Separate
        }
    };
}

/// The registered in-place encoding of the payload, or a compile error
pub struct Compact;

impl<T: Payload> Select<T> for Compact {
    type Representation = InPlace<T, T::Manipulator>;

    const SELECTED: Selected = {
        assert!(
            <T::Representation as Representation<T>>::IN_PLACE,
            "{}",
            diagnostics::NO_IN_PLACE_ENCODING
        );
        let () = <T::Manipulator as FlagManipulator<T>>::VALID;
        Selected::Registered
    };
}

/// Use the manipulator `M`, whatever the payload
pub struct Custom<M>(PhantomData<fn() -> M>);

impl<T, M: FlagManipulator<T>> Select<T> for Custom<M> {
    type Representation = InPlace<T, M>;

    const SELECTED: Selected = {
        let () = M::VALID;
        Selected::Custom
    };
}

impl<T: SentinelTarget, const V: i128> Select<T> for Sentinel<V> {
    type Representation = InPlace<T, Self>;

    const SELECTED: Selected = {
        let () = <Self as FlagManipulator<T>>::VALID;
        Selected::Sentinel
    };
}

impl<T: SentinelTarget, const B: bool> Select<T> for BoolSentinel<B> {
    type Representation = InPlace<T, Self>;

    const SELECTED: Selected = {
        let () = <Self as FlagManipulator<T>>::VALID;
        Selected::Sentinel
    };
}

impl<T: PartialEq, E: EmptyValue<T>> Select<T> for EmptyVia<E> {
    type Representation = InPlace<T, Self>;

    const SELECTED: Selected = {
        let () = <Self as FlagManipulator<T>>::VALID;
        Selected::Sentinel
    };
}

/// How the designated field of a [`Field`] configuration is encoded
///
/// [`Auto`] uses the registered manipulator of the field type, the sentinel
/// configurations put a sentinel into the field.
#[diagnostic::on_unimplemented(
    message = "field type `{U}` has no registered flag manipulator",
    note = "supply a sentinel for the field, as in `Field<F, Sentinel<V>>`"
)]
pub trait FieldStrategy<U> {
    type Manipulator: FlagManipulator<U>;

    const SELECTED: Selected;
}

impl<U: Payload> FieldStrategy<U> for Auto {
    type Manipulator = U::Manipulator;

    const SELECTED: Selected = {
        assert!(
            <U::Representation as Representation<U>>::IN_PLACE,
            "{}",
            diagnostics::FIELD_WITHOUT_STRATEGY
        );
        Selected::Field
    };
}

impl<U: SentinelTarget, const V: i128> FieldStrategy<U> for Sentinel<V> {
    type Manipulator = Self;

    const SELECTED: Selected = Selected::FieldSentinel;
}

impl<U: SentinelTarget, const B: bool> FieldStrategy<U> for BoolSentinel<B> {
    type Manipulator = Self;

    const SELECTED: Selected = Selected::FieldSentinel;
}

impl<U: PartialEq, E: EmptyValue<U>> FieldStrategy<U> for EmptyVia<E> {
    type Manipulator = Self;

    const SELECTED: Selected = Selected::FieldSentinel;
}

/// Encode emptiness in the field designated by `F`, using `S`
///
/// Designators come from [`#[derive(Fields)]`](crate::Fields). Without `S`,
/// the field type must have an in-place registration.
pub struct Field<F, S = Auto>(PhantomData<fn() -> (F, S)>);

impl<T, F, S> Select<T> for Field<F, S>
where
    F: FieldOf<T>,
    S: FieldStrategy<F::Type>,
{
    type Representation = InPlace<T, AtField<F, S::Manipulator>>;

    const SELECTED: Selected = {
        let selected = S::SELECTED;
        let () = <AtField<F, S::Manipulator> as FlagManipulator<T>>::VALID;
        selected
    };
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::Selected;

    #[test]
    fn rules_are_ordered() {
        let rules: Vec<u8> = Selected::ALL.iter().map(|s| s.rule()).collect();
        assert_eq!(rules, [1, 2, 3, 4, 5, 6]);
        assert!(!Selected::Separate.is_in_place());
        assert!(Selected::ALL[..5].iter().all(|s| s.is_in_place()));
    }

    #[test]
    fn display() {
        assert_snapshot!(
            Selected::FieldSentinel.to_string(),
            @"rule 5 (field sentinel)"
        );
        assert_snapshot!(Selected::Separate.to_string(), @"rule 6 (separate)");
    }
}
