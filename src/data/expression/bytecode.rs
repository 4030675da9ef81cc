use crate::data::address::DataAddress;
use crate::data::filters::FilterId;
use crate::data::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralIdx(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AddressIdx(pub(crate) u32);

/// Stack machine instruction. Jump targets are absolute instruction indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Instruction {
    PushLiteral(LiteralIdx),
    LoadVar(AddressIdx),

    Neg,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Replaces the top of the stack with its truthiness.
    ToBool,

    Jump(u32),
    /// Pops the condition.
    JumpIfFalse(u32),
    /// Jumps without popping when the top is truthy; pops it otherwise.
    JumpIfTrueOrPop(u32),
    /// Jumps without popping when the top is falsy; pops it otherwise.
    JumpIfFalseOrPop(u32),

    CallFilter { id: FilterId, argc: u8 },
    Store(AddressIdx),
    /// Event name is stored in the literal table.
    CallEvent { name: LiteralIdx, argc: u8 },
}

/// Compiled expression: flat instructions plus the literal and address tables they index.
///
/// Holds no references into any data model, so one program can run against many models.
#[derive(Debug, Clone, Default)]
pub(crate) struct Program {
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) literals: Vec<Variant>,
    pub(crate) addresses: Vec<DataAddress>,
}

impl Program {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_literal(&mut self, v: Variant) -> LiteralIdx {
        let idx = LiteralIdx(self.literals.len() as u32);
        self.literals.push(v);
        idx
    }

    /// Identical paths share one address slot.
    pub(crate) fn push_address(&mut self, address: &DataAddress) -> AddressIdx {
        if let Some(i) = self.addresses.iter().position(|a| a == address) {
            return AddressIdx(i as u32);
        }
        let idx = AddressIdx(self.addresses.len() as u32);
        self.addresses.push(address.clone());
        idx
    }

    pub(crate) fn emit(&mut self, i: Instruction) -> usize {
        self.instructions.push(i);
        self.instructions.len() - 1
    }

    pub(crate) fn here(&self) -> u32 {
        self.instructions.len() as u32
    }

    /// Points the jump emitted at `at` to the current end of the program.
    pub(crate) fn patch_jump(&mut self, at: usize) {
        let target = self.here();
        match &mut self.instructions[at] {
            Instruction::Jump(t)
            | Instruction::JumpIfFalse(t)
            | Instruction::JumpIfTrueOrPop(t)
            | Instruction::JumpIfFalseOrPop(t) => *t = target,
            other => tracing::error!(at, ?other, "patch target is not a jump"),
        }
    }
}
