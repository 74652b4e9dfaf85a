//! Error enums for the repository ports.
//!
//! Every blog port (users, posts, comments, sessions) reports failures as a
//! small `thiserror` enum such as `UserPersistenceError`. `define_port_error!`
//! writes that enum plus one snake_case constructor per variant, so adapters
//! can say `PostPersistenceError::unique_violation("title")` instead of
//! spelling out struct literals. Constructor parameters take
//! `impl Into<FieldType>`.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant [] [] $( $($field : $ty,)* )?);
            )*
        }
    };

    // Fields exhausted: a unit variant when nothing was collected.
    (@constructor $variant:ident [] []) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident [$($params:tt)+] [$($inits:tt)+]) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($params)+) -> Self {
                Self::$variant { $($inits)+ }
            }
        }
    };

    (@constructor $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @constructor $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };
}

pub(crate) use define_port_error;
