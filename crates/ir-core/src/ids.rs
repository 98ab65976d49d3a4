//! Strongly typed, zero-cost identifier wrappers.
//!
//! IDs are dense indices: `ActorId` into the world's actor table, `ActionId`
//! into one actor's catalogue.  There is no "none" sentinel; absence is an
//! `Option`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an actor in the world's actor table.  Never reused within a
    /// run: a removed actor leaves a tombstone behind.
    pub struct ActorId(u32);
}

typed_id! {
    /// Index of an action inside one actor's catalogue.
    ///
    /// Only meaningful together with the owning actor; two actors may both
    /// have an `ActionId(0)` naming unrelated actions.
    pub struct ActionId(u16);
}
