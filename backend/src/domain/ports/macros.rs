//! `define_port_error!`: typed adapter failures for driven ports.
//!
//! Each variant maps to a `thiserror` message and gets a snake_case
//! constructor whose fields accept `impl Into<T>`. A variant written
//! `=> transient "..."` marks a failure worth retrying later (lost
//! connection, pool timeout); `is_transient` lets services answer those
//! with `service_unavailable` instead of `internal_error`.

macro_rules! define_port_error {
    (@transient) => { false };
    (@transient transient) => { true };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
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
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $($class:ident)? $message:literal
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

            /// Whether the failure is expected to clear up on its own.
            pub fn is_transient(&self) -> bool {
                match self {
                    $( Self::$variant { .. } => define_port_error!(@transient $($class)?), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
