use super::FlagManipulator;

/// The paired `bool` of the [`Separate`](crate::Separate) representation
///
/// `true` means empty. The payload slot next to the flag is never touched.
pub struct SeparateFlag;

unsafe impl FlagManipulator<bool> for SeparateFlag {
    unsafe fn is_empty(flag: *const bool) -> bool {
        unsafe { flag.read() }
    }

    unsafe fn mark_empty(flag: *mut bool) {
        unsafe { flag.write(true) }
    }

    unsafe fn clear_empty_mark(flag: *mut bool) {
        unsafe { flag.write(false) }
    }
}
