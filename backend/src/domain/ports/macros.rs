//! Declarative helper for port error enums.
//!
//! Port failures either carry a diagnostic `message` or nothing at all. Each
//! variant gets a snake_case constructor; message constructors accept any
//! `Into<String>` so adapters can pass driver errors straight through.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident message) => {
        ::paste::paste! {
            pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                Self::$variant {
                    message: message.into(),
                }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $field:ident : String } )? => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $( { $field: String } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $($field)?);
            )*
        }
    };
}

pub(crate) use define_port_error;
