use tracing::{debug, trace};

use crate::context::Context;
use crate::effect::OpCode;
use crate::effect::params::{ModifyPlayerResource, ResourceOp, ShopAddItem, ShopReplaceItems, ShopRoll};
use crate::event::{Event, EventType};
use crate::services::{ShopDiscount, ShopSection};

/// Add/Sub/Mul/Div on the player's gold, clamped at zero.
pub(crate) fn modify_player_resource(params: &ModifyPlayerResource, ctx: &mut Context<'_>) {
    let gold = ctx.battle.meta.gold;
    let updated = match params.op {
        ResourceOp::Add => gold.saturating_add(params.value),
        ResourceOp::Sub => gold.saturating_sub(params.value),
        ResourceOp::Mul => gold.saturating_mul(params.value),
        ResourceOp::Div => {
            if params.value == 0 {
                trace!(target: "mechanics::effects", "gold division by zero ignored");
                return;
            }
            gold / params.value
        }
    };
    ctx.battle.meta.gold = updated.max(0);
    debug!(target: "mechanics::effects", op = %params.op, before = gold, after = ctx.battle.meta.gold, "gold changed");
}

pub(crate) fn shop_add_item(params: &ShopAddItem, ctx: &mut Context<'_>) {
    ctx.services.add_shop_item(&mut ctx.battle.meta, params.item, params.count);
}

pub(crate) fn shop_discount(code: OpCode, discount: &ShopDiscount, ctx: &mut Context<'_>) {
    let section = match code {
        OpCode::ShopDiscountItem => ShopSection::Items,
        _ => ShopSection::Units,
    };
    ctx.services.discount_shop(&mut ctx.battle.meta, section, *discount);
}

/// Refills the shop `times` times, publishing `RollShop` after each refill.
pub(crate) fn shop_roll(params: &ShopRoll, ctx: &mut Context<'_>) {
    for _ in 0..params.times {
        ctx.services.refill_shop(&mut ctx.battle.meta);
        ctx.publish(Event::new(EventType::RollShop));
    }
}

pub(crate) fn shop_replace(params: &ShopReplaceItems, ctx: &mut Context<'_>) {
    let all = params.all || params.from.is_none();
    ctx.services
        .replace_shop_items(&mut ctx.battle.meta, params.from, params.to, all);
}
