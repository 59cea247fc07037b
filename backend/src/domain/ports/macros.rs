//! Error enum generator shared by the repository ports.

/// Declare a port error enum with `thiserror` messages and one snake_case
/// constructor per variant.
///
/// Struct-like variants get a constructor taking `impl Into<T>` for each
/// field, so adapters can write `SearchRepositoryError::query(err.to_string())`
/// or pass a `&str` directly.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };
    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        /// Errors used only to exercise the generator.
        pub enum SampleError {
            Unavailable => "sample unavailable",
            Rejected { code: i32, reason: String } => "sample rejected ({code}): {reason}",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleError::unavailable(), SampleError::Unavailable);
        assert_eq!(SampleError::unavailable().to_string(), "sample unavailable");
    }

    #[rstest]
    fn struct_variants_convert_each_field() {
        let err = SampleError::rejected(23_i16, "duplicate name");
        assert_eq!(
            err,
            SampleError::Rejected {
                code: 23,
                reason: "duplicate name".to_owned(),
            }
        );
        assert_eq!(err.to_string(), "sample rejected (23): duplicate name");
    }
}
