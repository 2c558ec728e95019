use std::fmt;

/// A value was requested from an empty [`Optional`](crate::Optional)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyAccess;

impl fmt::Display for EmptyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value accessed on an empty optional")
    }
}

impl std::error::Error for EmptyAccess {}

/// Failure to add a layout to a [`LayoutRegistry`](crate::LayoutRegistry)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    /// The name is already used for another container type
    DuplicateName {
        name: String,
        existing: &'static str,
        new: &'static str,
    },

    /// The container type is already registered under another name
    AlreadyRegistered {
        rust_name: &'static str,
        existing: String,
        new: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateName {
                name,
                existing,
                new,
            } => write!(
                f,
                "name `{name}` is used for both `{existing}` and `{new}`"
            ),
            RegistrationError::AlreadyRegistered {
                rust_name,
                existing,
                new,
            } => write!(
                f,
                "`{rust_name}` is already registered as `{existing}`, \
                 cannot register it as `{new}`"
            ),
        }
    }
}

impl std::error::Error for RegistrationError {}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn messages() {
        assert_snapshot!(
            EmptyAccess.to_string(),
            @"value accessed on an empty optional"
        );

        let err = RegistrationError::DuplicateName {
            name: "float".into(),
            existing: "f32",
            new: "f64",
        };
        assert_snapshot!(
            err.to_string(),
            @"name `float` is used for both `f32` and `f64`"
        );
    }
}
