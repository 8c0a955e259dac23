//! Runners for atomic opcodes, grouped by what they touch.
//!
//! A runner never fails the whole graph: a target missing a required
//! component is logged and skipped, the remaining targets still run.
pub(super) mod board;
pub(super) mod combat;
pub(super) mod items;
pub(super) mod meta;
pub(super) mod progression;
pub(super) mod stats;

use tracing::warn;

use super::OpCode;
use crate::error::MechanicsError;
use crate::ids::EntityId;

fn skip_target(code: OpCode, target: EntityId, error: &dyn MechanicsError) {
    warn!(
        target: "mechanics::effects",
        op = %code,
        %target,
        code = error.error_code(),
        "{error}; target skipped"
    );
}
