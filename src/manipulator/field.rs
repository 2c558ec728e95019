use std::marker::PhantomData;

use super::FlagManipulator;

/// Designates a field of `T`
///
/// Designators are zero-sized types generated by
/// [`#[derive(Fields)]`](crate::Fields), one per field, in a module named
/// after the struct (`my_struct_fields::my_field`).
///
/// # Safety
///
/// `OFFSET` must be the offset of a field of type `Type` within `T`, and
/// that field must be properly aligned. Only derive this trait.
#[diagnostic::on_unimplemented(
    message = "field designator `{Self}` does not belong to payload type `{T}`",
    label = "not a field of `{T}`",
    note = "use a designator generated by `#[derive(Fields)]` on `{T}` itself"
)]
pub unsafe trait FieldOf<T> {
    /// The type of the field
    type Type;

    /// Byte offset of the field in `T`
    const OFFSET: usize;

    /// Name of the field, for diagnostics
    const NAME: &'static str;
}

/// Applies the manipulator `M` to the field `F` of the payload
///
/// Marking the slot empty only constructs the field; the rest of the
/// payload stays uninitialized until a real payload is written.
pub struct AtField<F, M>(PhantomData<fn() -> (F, M)>);

impl<F, M> AtField<F, M> {
    fn field<T>(slot: *const T) -> *const F::Type
    where
        F: FieldOf<T>,
    {
        slot.cast::<u8>().wrapping_add(F::OFFSET).cast()
    }

    fn field_mut<T>(slot: *mut T) -> *mut F::Type
    where
        F: FieldOf<T>,
    {
        slot.cast::<u8>().wrapping_add(F::OFFSET).cast()
    }
}

unsafe impl<T, F, M> FlagManipulator<T> for AtField<F, M>
where
    F: FieldOf<T>,
    M: FlagManipulator<F::Type>,
{
    const VALID: () = M::VALID;

    unsafe fn is_empty(slot: *const T) -> bool {
        unsafe { M::is_empty(Self::field(slot)) }
    }

    unsafe fn mark_empty(slot: *mut T) {
        unsafe { M::mark_empty(Self::field_mut(slot)) }
    }

    unsafe fn clear_empty_mark(slot: *mut T) {
        unsafe { M::clear_empty_mark(Self::field_mut(slot)) }
    }
}
