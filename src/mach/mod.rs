/*!
## Rust Machine Module

This Rust module is a compiler and virtual machine for fractal formulas.
Normalized formula text compiles into a flat instruction vector which an
evaluation context replays once per pixel and once per iteration under
one of three numeric backends.

*/

pub type Address = usize;

mod compile;
mod engine;
mod instruction;
mod link;
pub mod math;
mod precedence;
mod program;
mod random;
mod settings;
mod slot;
mod stack;

pub use compile::{Compiled, PendingOperation};
pub use engine::{EvaluationContext, State, StepResult};
pub use instruction::Instruction;
pub use link::{JumpPoint, JumpRecord};
pub use precedence::order;
pub use program::{compile, Program};
pub use random::Random;
pub use settings::{Backend, Params, Settings, View};
pub use slot::{Slot, SlotKind, SlotTable};
pub use stack::Stack;
