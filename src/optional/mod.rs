//! The optional container
//!
//! [`Optional<T, C>`] holds at most one `T`. The configuration `C` decides
//! at compile time where the "empty" state lives (see
//! [`select`](crate::select)). With an in-place encoding the container has
//! the size of `T`.
//!
//! The container keeps its storage in exactly one of two states: a live
//! payload, or the empty mark. Every operation that changes the state
//! leaves one of them behind, also when a destructor or a constructor
//! closure panics.

use std::{fmt, marker::PhantomData, mem};

use crate::{
    diagnostics, layout::LayoutInfo, select::Auto, EmptyAccess,
    Representation, Select, Selected,
};

/// A possibly empty `T` that can hide its flag inside the payload
///
/// ```
/// use tinyopt::{Optional, Sentinel};
///
/// // `f64` has a registered encoding in an unused NaN pattern
/// let mut x = Optional::<f64>::new();
/// assert_eq!(size_of_val(&x), size_of::<f64>());
/// assert!(!x.has_value());
/// x.emplace(1.5);
/// assert_eq!(x.value(), Ok(&1.5));
///
/// // `i32` uses every bit pattern, so a sentinel has to be reserved
/// let y = Optional::<i32, Sentinel<-1>>::some(3);
/// assert_eq!(size_of_val(&y), size_of::<i32>());
/// ```
#[repr(transparent)]
pub struct Optional<T, C: Select<T> = Auto> {
    repr: C::Representation,
    config: PhantomData<fn() -> C>,
}

impl<T, C: Select<T>> Optional<T, C> {
    /// The rule that resolved the encoding
    pub const SELECTED: Selected = C::SELECTED;

    /// Whether the flag is stored inside the payload
    pub const IN_PLACE: bool = {
        let _rule = C::SELECTED;
        <C::Representation as Representation<T>>::IN_PLACE
    };

    /// An empty container
    pub fn new() -> Self {
        let _rule = Self::SELECTED;
        Self {
            repr: C::Representation::empty(),
            config: PhantomData,
        }
    }

    /// A container holding `value`
    pub fn some(value: T) -> Self {
        let mut this = Self::new();
        unsafe { this.construct(value) };
        this
    }

    /// Write a payload into the empty storage
    ///
    /// # Safety
    ///
    /// The container must be empty.
    unsafe fn construct(&mut self, value: T) -> &mut T {
        unsafe {
            self.repr.clear_empty_mark();
            self.repr.payload_mut().write(value);
        }
        debug_assert!(
            self.repr.has_value(),
            "{}",
            diagnostics::SENTINEL_ASSIGNED
        );
        unsafe { self.repr.payload_mut().assume_init_mut() }
    }

    pub fn has_value(&self) -> bool {
        self.repr.has_value()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_value()
    }

    pub fn get(&self) -> Option<&T> {
        if self.has_value() {
            Some(unsafe { self.repr.payload().assume_init_ref() })
        } else {
            None
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.has_value() {
            Some(unsafe { self.repr.payload_mut().assume_init_mut() })
        } else {
            None
        }
    }

    /// The payload, or [`EmptyAccess`] if there is none
    pub fn value(&self) -> Result<&T, EmptyAccess> {
        self.get().ok_or(EmptyAccess)
    }

    pub fn value_mut(&mut self) -> Result<&mut T, EmptyAccess> {
        self.get_mut().ok_or(EmptyAccess)
    }

    pub fn into_value(self) -> Result<T, EmptyAccess> {
        self.into_option().ok_or(EmptyAccess)
    }

    /// The payload, without checking that there is one
    ///
    /// # Safety
    ///
    /// The container must hold a payload.
    pub unsafe fn value_unchecked(&self) -> &T {
        debug_assert!(self.has_value());
        unsafe { self.repr.payload().assume_init_ref() }
    }

    /// # Safety
    ///
    /// The container must hold a payload.
    pub unsafe fn value_unchecked_mut(&mut self) -> &mut T {
        debug_assert!(self.has_value());
        unsafe { self.repr.payload_mut().assume_init_mut() }
    }

    /// A copy of the payload, or `default` if there is none
    pub fn value_or(&self, default: T) -> T
    where
        T: Clone,
    {
        match self.get() {
            Some(value) => value.clone(),
            None => default,
        }
    }

    pub fn into_value_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Replace the contents with `value`
    ///
    /// The old payload, if any, is destroyed first. Unlike [`set`], this
    /// never uses the assignment of the payload.
    ///
    /// [`set`]: Optional::set
    pub fn emplace(&mut self, value: T) -> &mut T {
        self.reset();
        unsafe { self.construct(value) }
    }

    /// Replace the contents with the result of `f`
    ///
    /// The old payload is destroyed before `f` runs. If `f` panics, the
    /// container is left empty.
    pub fn emplace_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.reset();
        let value = f();
        unsafe { self.construct(value) }
    }

    /// Destroy the payload, if any
    pub fn reset(&mut self) {
        if !self.has_value() {
            return;
        }

        // Re-marks the storage even if the destructor of the payload
        // panics, so that it is never dropped twice.
        struct MarkEmpty<'a, T, R: Representation<T>> {
            repr: &'a mut R,
            payload: PhantomData<fn() -> T>,
        }

        impl<T, R: Representation<T>> Drop for MarkEmpty<'_, T, R> {
            fn drop(&mut self) {
                unsafe { self.repr.mark_empty() }
            }
        }

        let mut guard = MarkEmpty::<T, C::Representation> {
            repr: &mut self.repr,
            payload: PhantomData,
        };
        unsafe { guard.repr.payload_mut().drop_in_place() };
        drop(guard);
    }

    /// Store `value`, assigning to the current payload if there is one
    pub fn set(&mut self, value: T) {
        match self.get_mut() {
            Some(payload) => {
                *payload = value;
                debug_assert!(
                    self.has_value(),
                    "{}",
                    diagnostics::SENTINEL_ASSIGNED
                );
            }
            None => {
                unsafe { self.construct(value) };
            }
        }
    }

    /// Take over the state of `other`
    ///
    /// Payloads are moved with [`set`](Optional::set), so a held payload
    /// is assigned to rather than replaced.
    pub fn assign(&mut self, other: Self) {
        match other.into_option() {
            Some(value) => self.set(value),
            None => self.reset(),
        }
    }

    /// Move the payload out, leaving the container empty
    pub fn take(&mut self) -> Option<T> {
        if !self.has_value() {
            return None;
        }
        let value = unsafe { self.repr.payload().read() };
        unsafe { self.repr.mark_empty() };
        Some(value)
    }

    /// Store `value`, returning the previous payload
    pub fn replace(&mut self, value: T) -> Option<T> {
        let old = self.take();
        unsafe { self.construct(value) };
        old
    }

    pub fn get_or_insert_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        if !self.has_value() {
            let value = f();
            unsafe { self.construct(value) };
        }
        unsafe { self.repr.payload_mut().assume_init_mut() }
    }

    pub fn into_option(mut self) -> Option<T> {
        self.take()
    }

    /// Exchange the contents of two containers
    ///
    /// If only one of them holds a payload, it is moved over and the source
    /// is left empty.
    pub fn swap(&mut self, other: &mut Self) {
        match (self.has_value(), other.has_value()) {
            (true, true) => unsafe {
                mem::swap(self.value_unchecked_mut(), other.value_unchecked_mut())
            },
            (true, false) => {
                if let Some(value) = self.take() {
                    unsafe { other.construct(value) };
                }
            }
            (false, true) => other.swap(self),
            (false, false) => {}
        }
    }

    /// Description of the memory layout of this container type
    pub fn layout(name: impl Into<String>) -> LayoutInfo
    where
        T: 'static,
        C: 'static,
    {
        LayoutInfo::of::<T, C>(name)
    }
}

impl<T, C: Select<T>> Drop for Optional<T, C> {
    fn drop(&mut self) {
        if self.repr.has_value() {
            unsafe { self.repr.payload_mut().drop_in_place() }
        } else {
            unsafe { self.repr.clear_empty_mark() }
        }
    }
}

impl<T, C: Select<T>> Default for Optional<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Select<T>> Clone for Optional<T, C> {
    fn clone(&self) -> Self {
        match self.get() {
            Some(value) => Self::some(value.clone()),
            None => Self::new(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let Some(value) = source.get() else {
            self.reset();
            return;
        };

        match self.get_mut() {
            Some(payload) => payload.clone_from(value),
            None => {
                let value = value.clone();
                unsafe { self.construct(value) };
            }
        }
        debug_assert!(self.has_value(), "{}", diagnostics::SENTINEL_ASSIGNED);
    }
}

impl<T, C: Select<T>> From<T> for Optional<T, C> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T, C: Select<T>> From<Option<T>> for Optional<T, C> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::some(value),
            None => Self::new(),
        }
    }
}

impl<T, C: Select<T>> From<Optional<T, C>> for Option<T> {
    fn from(value: Optional<T, C>) -> Self {
        value.into_option()
    }
}

impl<T: PartialEq, C: Select<T>> PartialEq for Optional<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Eq, C: Select<T>> Eq for Optional<T, C> {}

impl<T: fmt::Debug, C: Select<T>> fmt::Debug for Optional<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Some").field(value).finish(),
            None => f.write_str("Empty"),
        }
    }
}
