//! Typed element identifiers.
//!
//! Backends hand out one ID per registered array element, in registration
//! order. The positional LP symbols (`x{n}`, `c{n}`) are derived from the
//! inner value, so IDs double as dense indices into per-element storage.

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }

            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Inner value widened for indexing flat element storage.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id_type!(VariableId);
define_id_type!(ConstraintId);

#[cfg(test)]
mod tests {
    use super::{ConstraintId, VariableId};

    #[test]
    fn variable_id_roundtrip() {
        let id = VariableId::new(3);
        assert_eq!(id.inner(), 3);
        assert_eq!(id.index(), 3);
    }

    #[test]
    fn constraint_id_roundtrip() {
        let id = ConstraintId::new(9);
        assert_eq!(id.inner(), 9);
        assert_eq!(id.index(), 9);
    }

    #[test]
    fn ids_order_by_registration_value() {
        assert!(VariableId::new(0) < VariableId::new(1));
        assert!(ConstraintId::new(4) < ConstraintId::new(7));
    }
}
