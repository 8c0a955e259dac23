//! Components the engine reads and writes besides the stat model.

use bitflags::bitflags;

use crate::ids::Sid;

/// Team alignment (0 = player side by convention).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team(pub u8);

/// Board coordinate. Index 0 is the front of the lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardPos {
    pub lane: i32,
    pub index: i32,
}

impl BoardPos {
    pub const fn new(lane: i32, index: i32) -> Self {
        Self { lane, index }
    }
}

bitflags! {
    /// Crowd-control flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        const CHILLED = 1 << 0;
        const FROZEN = 1 << 1;
        const STUNNED = 1 << 2;
    }
}

const STATUS_SLOTS: usize = 3;

/// Active crowd-control flags with their remaining durations.
///
/// A remaining duration of zero means the flag stays until removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusState {
    flags: StatusFlags,
    remaining: [f32; STATUS_SLOTS],
}

impl StatusState {
    fn slot(flag: StatusFlags) -> usize {
        flag.bits().trailing_zeros() as usize
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    pub fn has(&self, flag: StatusFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Sets `flags`. A longer duration overrides a shorter remaining one.
    pub fn apply(&mut self, flags: StatusFlags, duration_sec: f32) {
        for flag in flags.iter() {
            let slot = Self::slot(flag);
            if !self.flags.contains(flag) || duration_sec <= 0.0 {
                self.remaining[slot] = duration_sec.max(0.0);
            } else if self.remaining[slot] > 0.0 {
                self.remaining[slot] = self.remaining[slot].max(duration_sec);
            }
            self.flags.insert(flag);
        }
    }

    pub fn remove(&mut self, flags: StatusFlags) {
        for flag in flags.iter() {
            self.remaining[Self::slot(flag)] = 0.0;
        }
        self.flags.remove(flags);
    }

    pub fn remaining(&self, flag: StatusFlags) -> f32 {
        self.remaining[Self::slot(flag)]
    }

    /// Counts timed flags down and returns the ones that lapsed.
    pub fn tick(&mut self, dt: f32) -> StatusFlags {
        let mut expired = StatusFlags::empty();
        for flag in self.flags.iter() {
            let slot = Self::slot(flag);
            if self.remaining[slot] <= 0.0 {
                continue;
            }
            self.remaining[slot] -= dt;
            if self.remaining[slot] <= 0.0 {
                self.remaining[slot] = 0.0;
                expired.insert(flag);
            }
        }
        self.flags.remove(expired);
        expired
    }
}

/// The single item a unit holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldItem(pub Sid);

/// Class tags ("Insect", "Undead", ...) a unit carries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTags(pub Vec<Sid>);

impl ClassTags {
    /// Adds `tag` once. Returns false if it was already present.
    pub fn add(&mut self, tag: Sid) -> bool {
        if self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: Sid) -> bool {
        self.0.contains(&tag)
    }
}

/// One-shot damage reduction consumed by the next hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NextHitMitigation {
    /// Fraction removed from every damage type, in `[0, 1]`.
    pub pct: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experience(pub i64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level(pub i32);

/// Runtime state of one ability known by an entity.
///
/// The definition itself is immutable and lives in the
/// [`AbilityDatabase`](crate::ability::AbilityDatabase).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnownAbility {
    pub id: Sid,
    pub cooldown_left: f32,
    pub internal_cooldown_left: f32,
    /// Granted for this battle only (e.g. copied from another unit).
    pub temporary: bool,
}

impl KnownAbility {
    pub fn new(id: Sid) -> Self {
        Self {
            id,
            cooldown_left: 0.0,
            internal_cooldown_left: 0.0,
            temporary: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_left <= 0.0 && self.internal_cooldown_left <= 0.0
    }
}

/// Ordered list of abilities an entity can trigger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnownAbilities(pub Vec<KnownAbility>);

impl KnownAbilities {
    pub fn from_ids(ids: impl IntoIterator<Item = Sid>) -> Self {
        Self(ids.into_iter().map(KnownAbility::new).collect())
    }

    pub fn push(&mut self, id: Sid) {
        self.0.push(KnownAbility::new(id));
    }

    pub fn push_temporary(&mut self, id: Sid) {
        self.0.push(KnownAbility {
            temporary: true,
            ..KnownAbility::new(id)
        });
    }

    pub fn contains(&self, id: Sid) -> bool {
        self.0.iter().any(|known| known.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
