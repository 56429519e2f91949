use super::{Instruction, SlotTable};
use crate::error;
use crate::lang::token::*;
use crate::lang::{lex, Error, Limits};

type Result<T> = std::result::Result<T, Error>;

/// An operation waiting for the precedence pass. `None` is a barrier
/// which is never emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOperation {
    pub op: Option<Instruction>,
    pub precedence: i32,
}

/// Output of the scan: operations in source order, the slots they refer
/// to and every flow-control keyword in the order it will be emitted.
#[derive(Debug)]
pub struct Compiled {
    pub pending: Vec<PendingOperation>,
    pub slots: SlotTable,
    pub flows: Vec<Flow>,
}

const NESTING: i32 = 15;
const BARRIER: i32 = 15;
const FINAL_BARRIER: i32 = 16;
const STATEMENT_END: i32 = -30000;
const NOT_IN_MODULUS: i32 = 999;

/// Scans normalized formula text once, producing pending operations.
///
/// Each operation's precedence is a base value for its kind lowered by
/// `15 * (parenthesis depth + pending assignments)`, so anything nested
/// deeper binds tighter than what surrounds it.
pub fn compile(text: &str, functions: &[Function; 4], limits: &Limits) -> Result<Compiled> {
    let mut c = Compiler {
        pending: vec![],
        slots: SlotTable::new(limits.max_slots),
        flows: vec![],
        paren: 0,
        equals: 0,
        expecting_arg: true,
        mod_flag: NOT_IN_MODULUS,
        mod_stack: vec![],
        after_unary_minus: false,
    };
    for token in lex(text) {
        c.token(&token, functions)?;
        if token.is_end_of_formula() {
            break;
        }
    }
    c.barrier(FINAL_BARRIER);
    Ok(Compiled {
        pending: c.pending,
        slots: c.slots,
        flows: c.flows,
    })
}

struct Compiler {
    pending: Vec<PendingOperation>,
    slots: SlotTable,
    flows: Vec<Flow>,
    paren: i32,
    equals: i32,
    expecting_arg: bool,
    mod_flag: i32,
    mod_stack: Vec<i32>,
    after_unary_minus: bool,
}

impl Compiler {
    fn push(&mut self, op: Instruction, base: i32) {
        self.pending.push(PendingOperation {
            op: Some(op),
            precedence: base - (self.paren + self.equals) * NESTING,
        });
    }

    fn barrier(&mut self, precedence: i32) {
        self.pending.push(PendingOperation {
            op: None,
            precedence,
        });
    }

    fn end_statement(&mut self, op: Instruction) {
        self.barrier(BARRIER);
        self.pending.push(PendingOperation {
            op: Some(op),
            precedence: STATEMENT_END,
        });
        self.paren = 0;
        self.equals = 0;
        self.expecting_arg = true;
        self.mod_flag = NOT_IN_MODULUS;
        self.mod_stack.clear();
    }

    fn token(&mut self, token: &Token, functions: &[Function; 4]) -> Result<()> {
        let unary_minus = std::mem::replace(&mut self.after_unary_minus, false);
        match token.kind {
            Kind::OpenParen => self.paren += 1,
            Kind::CloseParen => self.paren -= 1,
            Kind::RealConstant(_) | Kind::ComplexConstant(_, _) => {
                let (mut re, mut im) = token.constant().unwrap_or((0.0, 0.0));
                let mut name = token.text.clone();
                if unary_minus {
                    if let Some(PendingOperation {
                        op: Some(Instruction::Neg),
                        ..
                    }) = self.pending.last()
                    {
                        self.pending.pop();
                        re = -re;
                        im = -im;
                        name.insert(0, '-');
                    }
                }
                let slot = self.slots.constant(&name, (re, im))?;
                self.push(Instruction::Load(slot), 1);
                self.expecting_arg = false;
            }
            Kind::ParamVariable(_) | Kind::PredefinedVariable(_) | Kind::UserVariable => {
                let slot = self.slots.variable(&token.text)?;
                self.push(Instruction::Load(slot), 1);
                self.expecting_arg = false;
            }
            Kind::Function(function) => self.push(Instruction::Call(function), 1),
            Kind::ParamFunction(n) => {
                let function = functions[(n as usize).saturating_sub(1).min(3)];
                self.push(Instruction::Call(function), 1);
            }
            Kind::Flow(flow) => {
                match flow {
                    Flow::If => self.push(Instruction::JumpIfFalse(0), 1),
                    Flow::ElseIf => {
                        self.push(Instruction::Jump(0), 1);
                        self.barrier(BARRIER);
                        self.pending.push(PendingOperation {
                            op: Some(Instruction::Clear),
                            precedence: STATEMENT_END,
                        });
                        self.push(Instruction::JumpIfFalse(0), 1);
                        self.flows.push(Flow::ElseIf);
                    }
                    Flow::Else => self.push(Instruction::Jump(0), 1),
                    Flow::EndIf => self.push(Instruction::EndIf, 1),
                }
                self.flows.push(flow);
            }
            Kind::Operator(op) => self.operator(op, token)?,
            Kind::EndOfFormula => {}
            Kind::Invalid(_) => {
                return Err(error!(InternalError, ..&token.column; "UNEXPECTED TOKEN"));
            }
        }
        Ok(())
    }

    fn operator(&mut self, op: Operator, token: &Token) -> Result<()> {
        use Instruction::*;
        match op {
            Operator::Comma => self.end_statement(Clear),
            Operator::Colon => self.end_statement(EndInit),
            Operator::Assign => {
                let precedence = 5 - (self.paren + self.equals) * NESTING;
                let slot = match self.pending.last() {
                    Some(PendingOperation {
                        op: Some(Load(slot)),
                        ..
                    }) => *slot,
                    _ => {
                        return Err(error!(InternalError, ..&token.column; "ASSIGNMENT WITHOUT VARIABLE"))
                    }
                };
                self.pending.pop();
                self.pending.push(PendingOperation {
                    op: Some(Store(slot)),
                    precedence,
                });
                self.equals += 1;
                self.expecting_arg = true;
            }
            Operator::Modulus => {
                if self.mod_flag != self.paren - 1 {
                    self.mod_stack.push(self.mod_flag);
                    self.push(Mod, 2);
                    self.mod_flag = self.paren;
                    self.paren += 1;
                } else {
                    self.paren -= 1;
                    self.mod_flag = self.mod_stack.pop().unwrap_or(NOT_IN_MODULUS);
                }
            }
            Operator::Minus => {
                if self.expecting_arg {
                    self.push(Neg, 2);
                    self.after_unary_minus = true;
                } else {
                    self.push(Sub, 4);
                    self.expecting_arg = true;
                }
            }
            _ => {
                let (instruction, base) = match op {
                    Operator::Plus => (Add, 4),
                    Operator::Multiply => (Mul, 3),
                    Operator::Divide => (Div, 3),
                    Operator::Power => (Pow, 2),
                    Operator::Less => (Lt, 6),
                    Operator::LessEqual => (LtEq, 6),
                    Operator::Greater => (Gt, 6),
                    Operator::GreaterEqual => (GtEq, 6),
                    Operator::Equal => (Eq, 6),
                    Operator::NotEqual => (NotEq, 6),
                    Operator::And => (And, 7),
                    Operator::Or => (Or, 7),
                    _ => return Err(error!(InternalError, ..&token.column; "UNKNOWN OPERATOR")),
                };
                self.push(instruction, base);
                self.expecting_arg = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Predefined;

    fn scan(s: &str) -> Compiled {
        compile(s, &Function::PARAM_DEFAULTS, &Limits::default()).unwrap()
    }

    #[test]
    fn test_precedence_values() {
        let c = scan("z=(z+1)*2");
        let p: Vec<i32> = c.pending.iter().map(|p| p.precedence).collect();
        assert_eq!(p, vec![5, -29, -26, -29, -12, -14, FINAL_BARRIER]);
        assert_eq!(
            c.pending[0].op,
            Some(Instruction::Store(Predefined::Z.index()))
        );
    }

    #[test]
    fn test_negative_constant_folds() {
        let c = scan("z=-2");
        let slot = c.slots.find("-2").unwrap();
        assert_eq!(c.slots.get(slot).map(|s| s.value), Some((-2.0, 0.0)));
        assert!(c.pending.iter().all(|p| p.op != Some(Instruction::Neg)));
    }

    #[test]
    fn test_param_functions() {
        let c = scan("fn2(z)");
        assert_eq!(c.pending[0].op, Some(Instruction::Call(Function::Sqr)));
    }

    #[test]
    fn test_elseif_flows() {
        let c = scan("if(1),elseif(2),else,endif");
        assert_eq!(
            c.flows,
            vec![Flow::If, Flow::ElseIf, Flow::ElseIf, Flow::Else, Flow::EndIf]
        );
    }
}
