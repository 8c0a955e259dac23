//! Capabilities the engine calls out to but does not own.
//!
//! Spawning units, the shop and board limits belong to the surrounding game.
//! Effect ops reach them through [`EngineServices`]; every method defaults to
//! a no-op so a game only implements what its content uses.

use crate::context::PlayerMeta;
use crate::ids::{EntityId, Sid};
use crate::world::{BoardPos, Team, World};

/// Shop shelf targeted by a discount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShopSection {
    Units,
    Items,
}

/// Discount applied to a shop shelf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopDiscount {
    pub amount: i64,
    /// `amount` is a percentage of the price instead of flat gold.
    pub percent: bool,
}

pub trait EngineServices {
    /// Creates a unit of `species`. `None` when the game refuses (board full, unknown species).
    fn spawn_unit(
        &mut self,
        _world: &mut World,
        _species: Sid,
        _team: Team,
        _pos: BoardPos,
    ) -> Option<EntityId> {
        None
    }

    fn refill_shop(&mut self, _meta: &mut PlayerMeta) {}

    /// Inclusive `(min, max)` index range of a lane, if the board is bounded.
    fn board_bounds(&self, _lane: i32) -> Option<(i32, i32)> {
        None
    }

    fn add_shop_item(&mut self, _meta: &mut PlayerMeta, _item: Sid, _count: u32) {}

    fn discount_shop(&mut self, _meta: &mut PlayerMeta, _section: ShopSection, _discount: ShopDiscount) {}

    fn replace_shop_items(&mut self, _meta: &mut PlayerMeta, _from: Sid, _to: Sid, _all: bool) {}
}

/// Services for battles that never leave the board: every hook is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoServices;

impl EngineServices for NoServices {}
