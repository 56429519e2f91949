use super::Address;
use crate::lang::Function;

/// ## Virtual machine instruction set
///
/// Every operation works on the value stack. Loads push a slot, stores
/// copy the top into a slot without popping, unary operations replace the
/// top and binary operations replace the top two with their result.
///
/// For example: `z=z*z+p1` compiles to
/// `[LOAD(z), LOAD(z), MUL, LOAD(p1), ADD, STORE(z)]`

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    // *** Slot access
    /// Push the value of a slot.
    Load(usize),
    /// Copy the top of the stack into a slot.
    Store(usize),

    // *** Statement boundaries
    /// Drop everything below the top of the stack.
    Clear,
    /// Same as `Clear`. Marks the end of the per-pixel prefix.
    EndInit,

    // *** Branch control
    /// Continue at Address if the real part of the top is zero.
    /// Does not pop.
    JumpIfFalse(Address),
    /// Continue at Address.
    Jump(Address),
    /// Landing point of an `endif`. Does nothing.
    EndIf,

    // *** Expression operations
    Neg,
    /// Modulus squared, the `|z|` operator.
    Mod,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,

    // *** Built-in functions
    Call(Function),
}

impl Instruction {
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Instruction::JumpIfFalse(_) | Instruction::Jump(_) | Instruction::EndIf
        )
    }

    /// Change in stack depth when executed.
    pub fn stack_effect(&self) -> isize {
        use Instruction::*;
        match self {
            Load(_) => 1,
            Add | Sub | Mul | Div | Pow | Lt | LtEq | Gt | GtEq | Eq | NotEq | And | Or => -1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Instruction::*;
        match self {
            Load(s) => write!(f, "LOAD({})", s),
            Store(s) => write!(f, "STORE({})", s),

            Clear => write!(f, "CLEAR"),
            EndInit => write!(f, "ENDINIT"),

            JumpIfFalse(a) => write!(f, "JUMPIFFALSE({})", a),
            Jump(a) => write!(f, "JUMP({})", a),
            EndIf => write!(f, "ENDIF"),

            Neg => write!(f, "NEG"),
            Mod => write!(f, "MOD"),
            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            Pow => write!(f, "POW"),
            Lt => write!(f, "LT"),
            LtEq => write!(f, "LTEQ"),
            Gt => write!(f, "GT"),
            GtEq => write!(f, "GTEQ"),
            Eq => write!(f, "EQ"),
            NotEq => write!(f, "NOTEQ"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),

            Call(func) => write!(f, "{}", func),
        }
    }
}
