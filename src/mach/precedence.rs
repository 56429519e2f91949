use super::{Instruction, PendingOperation};

/// Orders pending operations into executable sequence.
///
/// An operation is emitted once something of equal or looser binding
/// follows it, so operands always come out ahead of the operator that
/// consumes them. Barriers hold back everything pushed before them until
/// a looser barrier arrives and are never emitted themselves.
pub fn order(pending: &[PendingOperation]) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(pending.len());
    let mut stack: Vec<&PendingOperation> = Vec::with_capacity(pending.len());
    for op in pending {
        while let Some(top) = stack.last() {
            if top.precedence > op.precedence {
                break;
            }
            if let Some(instruction) = top.op {
                out.push(instruction);
            }
            stack.pop();
        }
        stack.push(op);
    }
    while let Some(top) = stack.pop() {
        if let Some(instruction) = top.op {
            out.push(instruction);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Function, Limits};
    use crate::mach::compile::compile;

    fn listing(s: &str) -> String {
        let c = compile(s, &Function::PARAM_DEFAULTS, &Limits::default()).unwrap();
        order(&c.pending)
            .iter()
            .map(|i| match i {
                Instruction::Load(n) | Instruction::Store(n) => {
                    let name = c.slots.get(*n).map(|s| s.name.clone()).unwrap_or_default();
                    format!("{}", i).replace(&format!("({})", n), &format!("({})", name))
                }
                _ => i.to_string(),
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            listing("a+b*c"),
            "LOAD(a) LOAD(b) LOAD(c) MUL ADD"
        );
        assert_eq!(listing("a-b-c"), "LOAD(a) LOAD(b) SUB LOAD(c) SUB");
        assert_eq!(listing("(a+b)*c"), "LOAD(a) LOAD(b) ADD LOAD(c) MUL");
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            listing("z=z*z+p1"),
            "LOAD(z) LOAD(z) MUL LOAD(p1) ADD STORE(z)"
        );
        assert_eq!(listing("a=b=1"), "LOAD(1) STORE(b) STORE(a)");
    }

    #[test]
    fn test_functions_and_modulus() {
        assert_eq!(listing("sin(z+1)"), "LOAD(z) LOAD(1) ADD SIN");
        assert_eq!(listing("|z|<=4"), "LOAD(z) MOD LOAD(4) LTEQ");
        assert_eq!(listing("-a*b"), "LOAD(a) NEG LOAD(b) MUL");
    }

    #[test]
    fn test_statements() {
        assert_eq!(
            listing("z=pixel:z=z*z,|z|<4"),
            "LOAD(pixel) STORE(z) ENDINIT LOAD(z) LOAD(z) MUL STORE(z) CLEAR LOAD(z) MOD LOAD(4) LT"
        );
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            listing("if(a<1),b=2,else,b=3,endif"),
            "LOAD(a) LOAD(1) LT JUMPIFFALSE(0) CLEAR LOAD(2) STORE(b) CLEAR JUMP(0) CLEAR \
             LOAD(3) STORE(b) CLEAR ENDIF"
        );
    }
}
