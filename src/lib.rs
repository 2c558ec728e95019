//! Optional values that hide their emptiness flag inside the payload
//!
//! An [`Option<T>`] is as large as `T` only when the compiler finds a niche
//! in `T`. [`Optional<T, C>`] lets you tell it where the niche is: an
//! unused bit pattern, a reserved sentinel value, a designated field or a
//! custom strategy. When nothing is known about `T`, it falls back to a
//! separate `bool`, just like `Option`.
//!
//! ```
//! use tinyopt::{Field, Fields, Optional, Sentinel};
//!
//! #[derive(Fields)]
//! struct Reading {
//!     sensor: u16,
//!     celsius: f32,
//! }
//!
//! // The empty state lives in `sensor`, which is never 0xffff
//! type MaybeReading =
//!     Optional<Reading, Field<reading_fields::sensor, Sentinel<0xffff>>>;
//!
//! let mut x = MaybeReading::new();
//! assert_eq!(size_of_val(&x), size_of::<Reading>());
//! x.emplace(Reading { sensor: 3, celsius: 21.5 });
//! assert_eq!(x.value().map(|r| r.celsius), Ok(21.5));
//! ```

// Needed for the derive macros
extern crate self as tinyopt;

mod cell;
pub mod diagnostics;
mod error;
mod layout;
mod manipulator;
mod optional;
mod payload;
mod representation;
pub mod select;

#[cfg(feature = "cli")]
pub mod cli;

pub use cell::Slot;
pub use error::{EmptyAccess, RegistrationError};
pub use layout::{LayoutInfo, LayoutRegistry};
pub use manipulator::{
    AtField, BoolByte, BoolSentinel, BoundedEnum, CharBits, EmptyValue,
    EmptyVia, EnumSentinel, FieldOf, FlagManipulator, NanBits, NonZeroBits,
    NullPointer, Sentinel, SentinelTarget, SeparateFlag, Unregistered,
    ZeroBits,
};
pub use optional::Optional;
pub use payload::Payload;
pub use representation::{InPlace, Representation, Separate};
pub use select::{Auto, Compact, Custom, Field, FieldStrategy, Select, Selected};
pub use tinyopt_macros::{Fields, Payload};
