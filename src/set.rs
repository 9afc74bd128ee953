//! Bitmask-backed capability sets

use std::fmt;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::caps::Capability;

/// A set of capabilities stored as one mask, one bit per capability
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u64);

impl CapabilitySet {
    pub const fn new() -> Self {
        CapabilitySet(0)
    }

    #[inline]
    pub const fn mask(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    #[inline]
    pub fn remove(&mut self, cap: Capability) {
        self.0 &= !cap.bit();
    }

    #[inline]
    pub const fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    #[inline]
    pub const fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | other.0)
    }

    /// True if the two sets share at least one capability
    #[inline]
    pub const fn intersects(self, other: CapabilitySet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::all().filter(move |c| self.contains(*c))
    }

    pub fn names(self) -> Vec<&'static str> {
        self.iter().map(Capability::name).collect()
    }

    /// Build a set from wire names, skipping anything unrecognised
    pub fn from_names_lossy<S: AsRef<str>>(names: &[S]) -> Self {
        Capability::parse_lossy(names).into_iter().collect()
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Capability::name)).finish()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::new();
        set.extend(iter);
        set
    }
}

impl<'a> FromIterator<&'a Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = &'a Capability>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<I: IntoIterator<Item = Capability>>(&mut self, iter: I) {
        for cap in iter {
            self.insert(cap);
        }
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for cap in self.iter() {
            seq.serialize_element(cap.name())?;
        }
        seq.end()
    }
}

// Unknown names are dropped, never rejected; they grant nothing.
impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = CapabilitySet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of capability names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = CapabilitySet::new();
                while let Some(name) = seq.next_element::<String>()? {
                    match name.parse::<Capability>() {
                        Ok(cap) => set.insert(cap),
                        Err(_) => tracing::warn!(name = %name, "ignoring unknown capability in snapshot"),
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}
