/// Operation tag of a compiled effect op.
///
/// `Seq`, `Repeat` and `LimitPerTurn` are control ops that run a child range;
/// every other opcode is atomic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum OpCode {
    NoOp,
    // control
    Seq,
    Repeat,
    LimitPerTurn,
    // stats / combat
    ModifyStats,
    DealDamage,
    ApplyStatus,
    ApplyRr,
    StatSwapWithin,
    StatSwapBetween,
    StatCopyFrom,
    TakeLessDamageOneShot,
    // items
    GiveItem,
    RemoveItem,
    StealItem,
    CopyItemTo,
    // board / identity
    ClassifyAdd,
    TransformUnit,
    PushUnit,
    ShuffleAllies,
    SummonUnit,
    CopyAbilityFrom,
    // progression / meta
    SetLevel,
    GiveExperience,
    ModifyPlayerResource,
    ShopAddItem,
    ShopDiscountUnit,
    ShopDiscountItem,
    ShopRoll,
    ShopReplaceItems,
}

impl OpCode {
    pub const fn is_control(self) -> bool {
        matches!(self, Self::Seq | Self::Repeat | Self::LimitPerTurn)
    }
}

/// One op of a compiled effect graph.
///
/// `first_child..first_child + child_count` is only meaningful for control ops.
/// `param` indexes the parameter pool of `code`; ops without parameters ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectOp {
    pub code: OpCode,
    pub first_child: u16,
    pub child_count: u16,
    pub param: u32,
}

impl EffectOp {
    pub const fn atomic(code: OpCode, param: u32) -> Self {
        Self {
            code,
            first_child: 0,
            child_count: 0,
            param,
        }
    }

    pub const fn control(code: OpCode, first_child: u16, child_count: u16, param: u32) -> Self {
        Self {
            code,
            first_child,
            child_count,
            param,
        }
    }
}
