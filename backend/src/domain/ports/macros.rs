//! `define_port_error!`: declare a port error enum together with its
//! `thiserror` messages and snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
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
    //! Regression coverage for this module.
    define_port_error! {
        pub enum LedgerPortError {
            Offline => "ledger offline",
            Rejected { reason: String } => "rejected: {reason}",
            Overdrawn { balance: i64 } => "overdrawn by {balance}",
            Partial { reason: String, written: usize } => "{reason} after {written} rows",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerPortError::offline().to_string(), "ledger offline");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = LedgerPortError::rejected("duplicate seller");
        assert_eq!(err.to_string(), "rejected: duplicate seller");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = LedgerPortError::overdrawn(-250_i64);
        assert_eq!(err.to_string(), "overdrawn by -250");
    }

    #[test]
    fn mixed_fields_are_positional() {
        let err = LedgerPortError::partial("insert aborted", 3_usize);
        assert_eq!(err.to_string(), "insert aborted after 3 rows");
    }
}
