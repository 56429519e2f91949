use super::compile::compile as scan;
use super::link::{link, JumpRecord};
use super::precedence::order;
use super::{Instruction, Settings, SlotTable};
use crate::error;
use crate::lang::{Error, ErrorList, Formula, Library, ParamUsage, Predefined, Symmetry};
use tracing::{debug, instrument};

/// ## Compiled program
///
/// Instructions in execution order with every jump resolved. A program
/// holds no numeric state: it runs unchanged under any backend.

#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    symmetry: Symmetry,
    text: String,
    instructions: Vec<Instruction>,
    slots: SlotTable,
    jumps: Vec<JumpRecord>,
    init_len: usize,
    stack_depth: usize,
    checksum: u32,
    uses_rand: bool,
    usage: ParamUsage,
    settings: Settings,
    warning: Option<Error>,
}

/// Compiles the formula `name` out of library text with default settings.
pub fn compile(name: &str, source: &str) -> Result<Program, ErrorList> {
    Program::compile(name, source, &Settings::default())
}

impl Program {
    /// Finds `name` in library text and compiles it. Error positions refer
    /// to `source`.
    #[instrument(skip(source, settings), fields(backend = %settings.backend))]
    pub fn compile(name: &str, source: &str, settings: &Settings) -> Result<Program, ErrorList> {
        let library = Library::parse(source);
        let formula = library.formula(name, &settings.limits)?;
        Program::from_formula(formula, settings)
    }

    /// Compiles a bare formula body such as `z=pixel:z=z*z+p1,|z|<=4`.
    pub fn from_body(body: &str, settings: &Settings) -> Result<Program, ErrorList> {
        let formula = Formula::from_body(body, &settings.limits)?;
        Program::from_formula(formula, settings)
    }

    pub fn from_formula(formula: Formula, settings: &Settings) -> Result<Program, ErrorList> {
        let limits = &settings.limits;
        let compiled = scan(&formula.text, &settings.functions, limits)?;
        let mut instructions = order(&compiled.pending);
        let loads = count(&instructions, |i| matches!(i, Instruction::Load(_)));
        let stores = count(&instructions, |i| matches!(i, Instruction::Store(_)));
        if instructions.len() > limits.max_ops {
            return Err(error!(TableOverflow; "TOO MANY INSTRUCTIONS").into());
        }
        if loads > limits.max_loads {
            return Err(error!(TableOverflow; "TOO MANY LOADS").into());
        }
        if stores > limits.max_stores {
            return Err(error!(TableOverflow; "TOO MANY STORES").into());
        }
        let jumps = link(&mut instructions, &compiled.flows)?;
        let init_len = instructions
            .iter()
            .position(|i| *i == Instruction::EndInit)
            .map_or(0, |p| p + 1);
        let rand = Instruction::Load(Predefined::Rand.index());
        let uses_rand = instructions.contains(&rand);
        let checksum = crc::crc32::checksum_ieee(formula.text.as_bytes());
        debug!(
            formula = %formula.name,
            instructions = instructions.len(),
            loads,
            stores,
            slots = compiled.slots.len(),
            init_len,
            "compiled"
        );
        Ok(Program {
            name: formula.name,
            symmetry: formula.symmetry,
            text: formula.text,
            stack_depth: stack_depth(&instructions),
            instructions,
            slots: compiled.slots,
            jumps,
            init_len,
            checksum,
            uses_rand,
            usage: formula.prescan.usage,
            settings: settings.clone(),
            warning: formula.warning,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Normalized formula text. Compiling it again yields the same program.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn jumps(&self) -> &[JumpRecord] {
        &self.jumps
    }

    /// Number of instructions run once per pixel. Zero without a `:`.
    pub fn init_len(&self) -> usize {
        self.init_len
    }

    /// Deepest the value stack gets.
    pub fn stack_depth(&self) -> usize {
        self.stack_depth
    }

    /// CRC-32 of the normalized text.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn uses_rand(&self) -> bool {
        self.uses_rand
    }

    pub fn usage(&self) -> &ParamUsage {
        &self.usage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Non-fatal header problem, such as an unknown symmetry.
    pub fn warning(&self) -> Option<&Error> {
        self.warning.as_ref()
    }

    pub fn loads(&self) -> usize {
        count(&self.instructions, |i| matches!(i, Instruction::Load(_)))
    }

    pub fn stores(&self) -> usize {
        count(&self.instructions, |i| matches!(i, Instruction::Store(_)))
    }

    /// Instruction text with slot names in place of slot numbers.
    pub fn mnemonic(&self, instruction: &Instruction) -> String {
        let (op, index) = match instruction {
            Instruction::Load(n) => ("LOAD", *n),
            Instruction::Store(n) => ("STORE", *n),
            _ => return instruction.to_string(),
        };
        match self.slots.get(index) {
            Some(slot) => format!("{}({})", op, slot.name),
            None => instruction.to_string(),
        }
    }

    pub fn mnemonics(&self) -> Vec<String> {
        self.instructions.iter().map(|i| self.mnemonic(i)).collect()
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (address, instruction) in self.instructions.iter().enumerate() {
            let mark = if address + 1 == self.init_len { ':' } else { ' ' };
            writeln!(f, "{:>5}{} {}", address, mark, self.mnemonic(instruction))?;
        }
        Ok(())
    }
}

fn count(instructions: &[Instruction], pred: fn(&Instruction) -> bool) -> usize {
    instructions.iter().filter(|i| pred(i)).count()
}

fn stack_depth(instructions: &[Instruction]) -> usize {
    let mut depth: isize = 0;
    let mut deepest: isize = 0;
    for instruction in instructions {
        match instruction {
            Instruction::Clear | Instruction::EndInit => depth = depth.min(1),
            _ => depth += instruction.stack_effect(),
        }
        deepest = deepest.max(depth);
    }
    deepest as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn body(s: &str) -> Program {
        Program::from_body(s, &Settings::default()).unwrap()
    }

    #[test]
    fn test_init_len() {
        assert_eq!(body("z=pixel:z=z*z+p1,|z|<=4").init_len(), 3);
        assert_eq!(body("z=z*z+pixel,|z|<=4").init_len(), 0);
    }

    #[test]
    fn test_counts() {
        let p = body("z=pixel:z=z*z+p1,|z|<=4");
        assert_eq!(p.loads(), 6);
        assert_eq!(p.stores(), 2);
        assert_eq!(p.stack_depth(), 3);
        assert!(!p.uses_rand());
        assert!(p.usage().p1);
        assert!(body("z=rand").uses_rand());
    }

    #[test]
    fn test_library() {
        let src = "Mandel(XAXIS) {\n  z = 0 :\n  z = z*z + pixel\n  |z| <= 4\n}\n";
        let p = compile("mandel", src).unwrap();
        assert_eq!(p.name(), "Mandel");
        assert_eq!(p.symmetry(), Symmetry::XAxis);
        assert_eq!(p.text(), "z=0:z=z*z+pixel,|z|<=4");
        let missing = compile("julia", src).unwrap_err();
        assert_eq!(missing.codes(), vec![ErrorCode::FormulaNotFound]);
    }

    #[test]
    fn test_listing() {
        let p = body("z=pixel:|z|<4");
        assert_eq!(
            p.to_string(),
            "    0  LOAD(pixel)\n    1  STORE(z)\n    2: ENDINIT\n    3  LOAD(z)\n    4  MOD\n    5  LOAD(4)\n    6  LT\n"
        );
    }

    #[test]
    fn test_instruction_limit() {
        let settings = Settings {
            limits: crate::lang::Limits::with_max_ops(4),
            ..Settings::default()
        };
        let err = Program::from_body("z=z*z+pixel", &settings).unwrap_err();
        assert_eq!(err.codes(), vec![ErrorCode::TableOverflow]);
    }
}
