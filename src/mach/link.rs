use super::{Address, Instruction};
use crate::error;
use crate::lang::token::Flow;
use crate::lang::Error;
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

/// Position of a flow-control instruction together with how many loads
/// and stores precede it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpPoint {
    pub address: Address,
    pub loads: usize,
    pub stores: usize,
}

/// ## Resolved flow control
///
/// An `elseif` owns two records: the unconditional jump which ends the
/// branch before it, then the conditional jump which tests its argument.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpRecord {
    pub flow: Flow,
    pub at: JumpPoint,
    /// Where control lands. Execution resumes just after this point.
    pub target: Option<JumpPoint>,
    /// Index of the `endif` record closing this group, or of the `if`
    /// record for an `endif`.
    pub counterpart: usize,
}

/// Pairs every flow-control instruction with its record and patches the
/// instruction with its resume address.
pub fn link(instructions: &mut [Instruction], flows: &[Flow]) -> Result<Vec<JumpRecord>> {
    let mut records = locate(instructions, flows)?;
    let mut index = records.len();
    while index > 0 {
        index -= 1;
        if records[index].flow != Flow::EndIf {
            return Err(error!(ErrorInParsingJumps; "UNTERMINATED IF"));
        }
        index = resolve_group(&mut records, index)?;
    }
    for record in &records {
        let resume = match record.target {
            Some(target) => target.address + 1,
            None => continue,
        };
        match instructions.get_mut(record.at.address) {
            Some(Instruction::JumpIfFalse(address)) | Some(Instruction::Jump(address)) => {
                *address = resume
            }
            _ => return Err(error!(ErrorInParsingJumps; "LINK FAILURE")),
        }
    }
    debug!(jumps = records.len(), "linked");
    Ok(records)
}

fn locate(instructions: &[Instruction], flows: &[Flow]) -> Result<Vec<JumpRecord>> {
    let mut records = Vec::with_capacity(flows.len());
    let mut loads = 0;
    let mut stores = 0;
    let mut elseif_tested = true;
    for (address, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::Load(_) => loads += 1,
            Instruction::Store(_) => stores += 1,
            _ => {}
        }
        if !instruction.is_jump() {
            continue;
        }
        let flow = match flows.get(records.len()) {
            Some(flow) => *flow,
            None => return Err(error!(ErrorInParsingJumps; "TOO MANY JUMPS")),
        };
        let expected = match flow {
            Flow::If => matches!(instruction, Instruction::JumpIfFalse(_)),
            Flow::ElseIf => {
                elseif_tested = !elseif_tested;
                if elseif_tested {
                    matches!(instruction, Instruction::JumpIfFalse(_))
                } else {
                    matches!(instruction, Instruction::Jump(_))
                }
            }
            Flow::Else => matches!(instruction, Instruction::Jump(_)),
            Flow::EndIf => matches!(instruction, Instruction::EndIf),
        };
        if !expected {
            return Err(error!(ErrorInParsingJumps; "JUMP MISMATCH"));
        }
        records.push(JumpRecord {
            flow,
            at: JumpPoint {
                address,
                loads,
                stores,
            },
            target: None,
            counterpart: 0,
        });
    }
    if records.len() != flows.len() {
        return Err(error!(ErrorInParsingJumps; "MISSING JUMPS"));
    }
    if let Some(first) = records.first() {
        if first.flow != Flow::If {
            return Err(error!(ErrorInParsingJumps; "FIRST JUMP NOT IF"));
        }
    }
    Ok(records)
}

/// Resolves the group closed by the `endif` at `endif`, innermost groups
/// first. Returns the index of the group's `if`.
fn resolve_group(records: &mut [JumpRecord], endif: usize) -> Result<usize> {
    let mut label = endif;
    let mut index = endif;
    while index > 0 {
        index -= 1;
        match records[index].flow {
            Flow::If => {
                records[index].target = Some(records[label].at);
                records[index].counterpart = endif;
                records[endif].counterpart = index;
                return Ok(index);
            }
            Flow::ElseIf => {
                records[index].target = Some(records[label].at);
                records[index].counterpart = endif;
                if index == 0 {
                    break;
                }
                index -= 1;
                records[index].target = Some(records[endif].at);
                records[index].counterpart = endif;
                label = index;
            }
            Flow::Else => {
                records[index].target = Some(records[endif].at);
                records[index].counterpart = endif;
                label = index;
            }
            Flow::EndIf => index = resolve_group(records, index)?,
        }
    }
    Err(error!(ErrorInParsingJumps; "ENDIF WITHOUT IF"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    #[test]
    fn test_if_else() {
        let mut ins = vec![
            Load(0),
            JumpIfFalse(0),
            Clear,
            Jump(0),
            Clear,
            EndIf,
            Clear,
        ];
        let flows = [Flow::If, Flow::Else, Flow::EndIf];
        let records = link(&mut ins, &flows).unwrap();
        assert_eq!(ins[1], JumpIfFalse(4));
        assert_eq!(ins[3], Jump(6));
        assert_eq!(records[0].counterpart, 2);
        assert_eq!(records[2].counterpart, 0);
        assert_eq!(records[0].at.loads, 1);
    }

    #[test]
    fn test_nested() {
        let mut ins = vec![
            JumpIfFalse(0),
            JumpIfFalse(0),
            EndIf,
            Jump(0),
            Clear,
            JumpIfFalse(0),
            EndIf,
        ];
        let flows = [
            Flow::If,
            Flow::If,
            Flow::EndIf,
            Flow::ElseIf,
            Flow::ElseIf,
            Flow::EndIf,
        ];
        link(&mut ins, &flows).unwrap();
        assert_eq!(ins[0], JumpIfFalse(4));
        assert_eq!(ins[1], JumpIfFalse(3));
        assert_eq!(ins[3], Jump(7));
        assert_eq!(ins[5], JumpIfFalse(7));
    }

    #[test]
    fn test_mismatch() {
        let mut ins = vec![Jump(0), EndIf];
        assert!(link(&mut ins, &[Flow::If, Flow::EndIf]).is_err());
        let mut ins = vec![JumpIfFalse(0)];
        assert!(link(&mut ins, &[Flow::If]).is_err());
    }
}
