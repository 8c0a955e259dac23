//! Identifiers shared across the engine.
//!
//! - [`Sid`]: 32-bit FNV-1a hash of a content name (abilities, species, items, keys)
//! - [`EntityId`]: opaque handle into the component [`World`](crate::world::World)

use core::fmt;

/// Hashed string identifier.
///
/// Content refers to abilities, items, species and class tags by name; the
/// engine only ever stores the 32-bit FNV-1a hash of that name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sid(pub u32);

impl Sid {
    /// Reserved "no id" value.
    pub const NONE: Sid = Sid(0);

    const OFFSET_BASIS: u32 = 0x811C_9DC5;
    const PRIME: u32 = 0x0100_0193;

    /// Hashes `name` with 32-bit FNV-1a. Usable in `const` items.
    pub const fn new(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(Self::PRIME);
            i += 1;
        }
        Sid(hash)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<&str> for Sid {
    fn from(name: &str) -> Self {
        Sid::new(name)
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Handle of an entity in the component world.
///
/// Handles are allocated monotonically, so ascending id order is spawn order.
/// Every "for each entity" loop in the engine walks entities in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(Sid::new("").raw(), 0x811C_9DC5);
        assert_eq!(Sid::new("a").raw(), 0xE40C_292C);
        assert_eq!(Sid::new("foobar").raw(), 0xBF9C_F968);
    }

    #[test]
    fn const_and_runtime_hash_agree() {
        const SHIVER: Sid = Sid::new("ShiverStrike");
        let name = String::from("ShiverStrike");
        assert_eq!(SHIVER, Sid::from(name.as_str()));
        assert_ne!(SHIVER, Sid::new("shiverstrike"));
    }
}
