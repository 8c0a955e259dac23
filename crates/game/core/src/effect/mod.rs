//! Compiled effect graphs and the interpreter that runs them.
//!
//! - [`opcode`]: op tags and the flat op record
//! - [`params`]: typed parameters, stored in per-kind pools
//! - [`graph`]: authoring tree and the breadth-first compiler
//! - [`interpreter`]: walks a graph against a [`crate::Context`]
//! - `ops`: one runner per opcode family
mod graph;
mod interpreter;
mod opcode;
mod ops;
pub mod params;

pub use graph::{CompiledEffectGraph, EffectNode, GraphError};
pub use interpreter::{Invocation, MAX_DEPTH, execute};
pub use opcode::{EffectOp, OpCode};

use crate::error::{ErrorSeverity, MechanicsError};

/// Structural failure while executing a graph.
///
/// Validated graphs never produce these; they guard hand-built op lists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("{code} refers to missing parameter {index}")]
    MissingParam { code: OpCode, index: u32 },

    #[error("child range {start}+{count} is outside a graph of {len} ops")]
    ChildRange { start: u16, count: u16, len: usize },

    #[error("effect graph nested deeper than {0}")]
    TooDeep(u32),
}

impl MechanicsError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParam { .. } => "EFFECT_MISSING_PARAM",
            Self::ChildRange { .. } => "EFFECT_CHILD_RANGE",
            Self::TooDeep(_) => "EFFECT_TOO_DEEP",
        }
    }
}
