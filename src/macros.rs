//! Macros for declaring attribute states.

/// Generate a state enum together with its `State` implementation.
///
/// The generated enum also gets a `variants()` constructor returning every
/// variant in declaration order, which is the usual input for a machine's
/// declared state set.
///
/// # Example
///
/// ```
/// use stateful_enum::state_enum;
/// use stateful_enum::core::State;
///
/// state_enum! {
///     pub enum Ticket {
///         Opened,
///         Closed,
///     }
/// }
///
/// assert_eq!(Ticket::Opened.name(), "Opened");
/// assert_eq!(Ticket::variants(), vec![Ticket::Opened, Ticket::Closed]);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub fn variants() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Zero,
            One,
            Two,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Zero.name(), "Zero");
        assert_eq!(TestState::Two.name(), "Two");
    }

    #[test]
    fn variants_follow_declaration_order() {
        assert_eq!(
            TestState::variants(),
            vec![TestState::Zero, TestState::One, TestState::Two]
        );
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::variants().len(), 2);
    }
}
