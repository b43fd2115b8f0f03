//! Branch kind classification.
//!
//! The host pipeline decodes what kind of control-flow instruction it
//! fetched and passes that classification into every `predict` and `update`
//! call; the predictor never infers it. The kind selects which storage unit
//! serves and trains the prediction.

/// Kind of control-flow instruction, as classified by the host pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Direct branch whose outcome depends on a condition.
    Conditional,
    /// Unconditional direct jump.
    Direct,
    /// Direct procedure call.
    DirectCall,
    /// Unconditional indirect jump; the target is computed at runtime.
    Indirect,
    /// Indirect procedure call.
    IndirectCall,
    /// Procedure return.
    Return,
}

impl BranchKind {
    /// Call kinds push their call site onto the return address stack at
    /// fetch, whichever table serves the target.
    pub fn is_call(self) -> bool {
        matches!(self, Self::DirectCall | Self::IndirectCall)
    }

    /// Kinds whose target is served by the indirect target table.
    pub fn is_indirect(self) -> bool {
        matches!(self, Self::Indirect | Self::IndirectCall)
    }
}
