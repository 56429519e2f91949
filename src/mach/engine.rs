use super::math::{Arbitrary, Double, Fixed, Math};
use super::{Backend, Instruction, Params, Program, Random, Settings, SlotKind, SlotTable, Stack};
use crate::error;
use crate::lang::{Error, ErrorList, Function, Predefined};
use std::cmp::Ordering;
use tracing::{trace, warn};

type Result<T> = std::result::Result<T, Error>;

/// Outcome of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Bailout,
    /// A numeric fault. Treat as bailout for this pixel.
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Bound,
    PixelReady,
    IterationReady,
}

/// ## Evaluation context
///
/// Owns one compiled program, its slot values, the value stack and the
/// active numeric backend. Independent contexts share nothing.

pub struct EvaluationContext {
    params: Params,
    backend: Backend,
    bound: Option<Bound>,
    state: State,
}

struct Bound {
    program: Program,
    engine: Engine,
}

enum Engine {
    Double(Machine<Double>),
    Fixed(Machine<Fixed>),
    Arbitrary(Machine<Arbitrary>),
}

macro_rules! dispatch {
    ($engine:expr, $m:ident => $body:expr) => {
        match $engine {
            Engine::Double($m) => $body,
            Engine::Fixed($m) => $body,
            Engine::Arbitrary($m) => $body,
        }
    };
}

impl Engine {
    fn new(backend: Backend, program: &Program, params: &Params) -> Engine {
        match backend {
            Backend::Double => Engine::Double(Machine::new(Double::new(), program, params)),
            Backend::Fixed { bitshift } => {
                Engine::Fixed(Machine::new(Fixed::new(bitshift), program, params))
            }
            Backend::Arbitrary { precision } => {
                Engine::Arbitrary(Machine::new(Arbitrary::new(precision), program, params))
            }
        }
    }
}

impl Default for EvaluationContext {
    fn default() -> EvaluationContext {
        EvaluationContext::new(Params::default())
    }
}

impl EvaluationContext {
    pub fn new(params: Params) -> EvaluationContext {
        EvaluationContext {
            params,
            backend: Backend::default(),
            bound: None,
            state: State::Uninitialized,
        }
    }

    /// Binds `program` under the backend it was compiled for.
    pub fn with_program(program: Program, params: Params) -> EvaluationContext {
        let mut context = EvaluationContext::new(params);
        context.backend = program.settings().backend;
        context.bind(program);
        context
    }

    /// Replaces the bound program. Constants and parameters are loaded
    /// and `rand` is seeded.
    pub fn bind(&mut self, program: Program) {
        let engine = Engine::new(self.backend, &program, &self.params);
        self.bound = Some(Bound { program, engine });
        self.state = State::Bound;
    }

    /// Compiles and binds a library formula. On failure the previous
    /// program stays bound.
    pub fn compile(
        &mut self,
        name: &str,
        source: &str,
        settings: &Settings,
    ) -> std::result::Result<(), ErrorList> {
        let program = Program::compile(name, source, settings)?;
        self.backend = settings.backend;
        self.bind(program);
        Ok(())
    }

    /// Compiles and binds a bare formula body. On failure the previous
    /// program stays bound.
    pub fn compile_body(
        &mut self,
        body: &str,
        settings: &Settings,
    ) -> std::result::Result<(), ErrorList> {
        let program = Program::from_body(body, settings)?;
        self.backend = settings.backend;
        self.bind(program);
        Ok(())
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Switches backend. A bound program is rebound without recompiling.
    pub fn set_backend(&mut self, backend: Backend) {
        self.backend = backend;
        if let Some(bound) = self.bound.take() {
            self.bind(bound.program);
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replaces every parameter and rebinds.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
        if let Some(bound) = self.bound.take() {
            self.bind(bound.program);
        }
    }

    /// `p1` through `p5`.
    pub fn param(&self, n: usize) -> Option<(f64, f64)> {
        self.params.p(n)
    }

    /// Changes `p1` through `p5`. Takes effect at the next instruction
    /// that reads it.
    pub fn set_param(&mut self, n: usize, value: (f64, f64)) -> bool {
        if !self.params.set_p(n, value) {
            return false;
        }
        let slot = [
            Predefined::P1,
            Predefined::P2,
            Predefined::P3,
            Predefined::P4,
            Predefined::P5,
        ][n - 1]
            .index();
        if let Some(bound) = &mut self.bound {
            dispatch!(&mut bound.engine, m => m.set(slot, value));
        }
        true
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn program(&self) -> Option<&Program> {
        self.bound.as_ref().map(|b| &b.program)
    }

    /// Runs the per-pixel prefix for a screen position.
    pub fn init_pixel(&mut self, col: usize, row: usize) -> Result<()> {
        let bound = match &mut self.bound {
            Some(bound) => bound,
            None => return Err(error!(InternalError; "NO PROGRAM BOUND")),
        };
        trace!(col, row, "init pixel");
        let program = &bound.program;
        let params = &self.params;
        let result = dispatch!(&mut bound.engine, m => m.init_pixel(program, params, col, row));
        self.state = match result {
            Ok(()) => State::PixelReady,
            Err(_) => State::Bound,
        };
        result
    }

    /// Runs one iteration.
    pub fn step(&mut self) -> StepResult {
        match self.state {
            State::PixelReady | State::IterationReady => {}
            state => {
                warn!(?state, "step before init_pixel");
                return StepResult::Bailout;
            }
        }
        let bound = match &mut self.bound {
            Some(bound) => bound,
            None => return StepResult::Bailout,
        };
        self.state = State::IterationReady;
        let program = &bound.program;
        dispatch!(&mut bound.engine, m => m.iterate(program))
    }

    /// Current value of `z`.
    pub fn z(&self) -> (f64, f64) {
        self.value(Predefined::Z.name()).unwrap_or_default()
    }

    /// Current value of any slot by name.
    pub fn value(&self, name: &str) -> Option<(f64, f64)> {
        let bound = self.bound.as_ref()?;
        let slot = bound.program.slots().find(&name.to_ascii_lowercase())?;
        dispatch!(&bound.engine, m => m.get(slot))
    }
}

impl std::fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("backend", &self.backend)
            .field("state", &self.state)
            .field("program", &self.program().map(|p| p.name()))
            .finish()
    }
}

/// ## Instruction interpreter for one backend

struct Machine<M: Math> {
    math: M,
    values: Vec<M::Value>,
    stack: Stack<M::Value>,
    random: Random,
}

impl<M: Math> Machine<M> {
    fn new(mut math: M, program: &Program, params: &Params) -> Machine<M> {
        let mut random = match params.seed {
            Some(seed) => Random::new(seed),
            None => Random::from_clock(),
        };
        let mut values = bind_values(&mut math, program.slots(), params);
        if program.uses_rand() {
            random.seed_time();
            let v = random.draw(math.bitshift());
            values[Predefined::Rand.index()] = math.number(v);
        }
        Machine {
            math,
            values,
            stack: Stack::new("STACK OVERFLOW", program.settings().limits.max_ops),
            random,
        }
    }

    fn get(&self, slot: usize) -> Option<(f64, f64)> {
        self.values.get(slot).map(|v| self.math.to_f64(v))
    }

    fn set(&mut self, slot: usize, value: (f64, f64)) {
        let v = self.math.number(value);
        if let Some(target) = self.values.get_mut(slot) {
            *target = v;
        }
    }

    fn init_pixel(&mut self, program: &Program, params: &Params, col: usize, row: usize) -> Result<()> {
        self.math.clear_overflow();
        for (index, slot) in program.slots().iter().enumerate() {
            let value = match slot.kind {
                SlotKind::Variable => (0.0, 0.0),
                SlotKind::Predefined(Predefined::Z) | SlotKind::Predefined(Predefined::LastSqr) => {
                    (0.0, 0.0)
                }
                SlotKind::Predefined(Predefined::Pixel) => params.pixel(col, row),
                SlotKind::Predefined(Predefined::ScrnPix) => (col as f64, row as f64),
                SlotKind::Predefined(Predefined::WhiteSq) => (((row + col) & 1) as f64, 0.0),
                _ => continue,
            };
            self.values[index] = self.math.number(value);
        }
        self.run(program.instructions(), 0, program.init_len())?;
        if self.math.overflow() {
            self.math.clear_overflow();
            return Err(error!(Overflow; "OVERFLOW IN INITIALIZATION"));
        }
        Ok(())
    }

    fn iterate(&mut self, program: &Program) -> StepResult {
        self.math.clear_overflow();
        if program.uses_rand() || self.random.srand_called() {
            let v = self.random.draw(self.math.bitshift());
            self.values[Predefined::Rand.index()] = self.math.number(v);
        }
        if let Err(error) = self.run(program.instructions(), program.init_len(), program.len()) {
            warn!(%error, "iteration fault");
            return StepResult::Overflow;
        }
        if self.math.overflow() {
            return StepResult::Overflow;
        }
        match self.stack.last() {
            Some(v) if !self.math.is_false(v) => StepResult::Continue,
            _ => StepResult::Bailout,
        }
    }

    fn run(&mut self, instructions: &[Instruction], start: usize, end: usize) -> Result<()> {
        use Instruction::*;
        self.stack.clear();
        let mut pc = start;
        while pc < end {
            let instruction = match instructions.get(pc) {
                Some(i) => *i,
                None => return Err(error!(InternalError; "PROGRAM COUNTER OUT OF RANGE")),
            };
            pc += 1;
            match instruction {
                Load(n) => {
                    let v = self.slot(n)?.clone();
                    self.stack.push(v)?;
                }
                Store(n) => {
                    let v = self.stack.top()?.clone();
                    self.values[n] = v;
                }
                Clear | EndInit => self.stack.keep_top(),
                JumpIfFalse(address) => {
                    if self.math.is_false(self.stack.top()?) {
                        pc = address;
                    }
                }
                Jump(address) => pc = address,
                EndIf => {}
                Neg => self.unary(M::neg)?,
                Mod => self.unary(M::modulus)?,
                Add => self.binary(M::add)?,
                Sub => self.binary(M::sub)?,
                Mul => self.binary(M::mul)?,
                Div => self.binary(M::div)?,
                Pow => self.binary(M::pow)?,
                Lt => self.compare(Ordering::is_lt)?,
                LtEq => self.compare(Ordering::is_le)?,
                Gt => self.compare(Ordering::is_gt)?,
                GtEq => self.compare(Ordering::is_ge)?,
                Eq => self.compare(Ordering::is_eq)?,
                NotEq => self.compare(Ordering::is_ne)?,
                And => self.binary(M::and)?,
                Or => self.binary(M::or)?,
                Call(Function::Sqr) => {
                    let a = self.stack.pop()?;
                    self.values[Predefined::LastSqr.index()] = self.math.modulus(&a);
                    let v = self.math.call(Function::Sqr, &a);
                    self.stack.push(v)?;
                }
                Call(Function::Srand) => {
                    let a = self.stack.pop()?;
                    let (x, y) = self.math.to_f64(&a);
                    self.random.srand(x as i64, y as i64);
                    let drawn = self.random.draw(self.math.bitshift());
                    let v = self.math.number(drawn);
                    self.values[Predefined::Rand.index()] = v.clone();
                    self.stack.push(v)?;
                }
                Call(function) => {
                    let a = self.stack.pop()?;
                    let v = self.math.call(function, &a);
                    self.stack.push(v)?;
                }
            }
        }
        Ok(())
    }

    fn slot(&self, n: usize) -> Result<&M::Value> {
        match self.values.get(n) {
            Some(v) => Ok(v),
            None => Err(error!(InternalError; "SLOT OUT OF RANGE")),
        }
    }

    fn unary(&mut self, f: fn(&mut M, &M::Value) -> M::Value) -> Result<()> {
        let a = self.stack.pop()?;
        let v = f(&mut self.math, &a);
        self.stack.push(v)
    }

    fn binary(&mut self, f: fn(&mut M, &M::Value, &M::Value) -> M::Value) -> Result<()> {
        let (a, b) = self.stack.pop_2()?;
        let v = f(&mut self.math, &a, &b);
        self.stack.push(v)
    }

    fn compare(&mut self, pass: fn(Ordering) -> bool) -> Result<()> {
        let (a, b) = self.stack.pop_2()?;
        let v = self.math.compare(&a, &b, pass);
        self.stack.push(v)
    }
}

/// Initial slot values. Per-pixel values start at zero.
fn bind_values<M: Math>(math: &mut M, slots: &SlotTable, params: &Params) -> Vec<M::Value> {
    slots
        .iter()
        .map(|slot| match slot.kind {
            SlotKind::Constant => math.number(slot.value),
            SlotKind::Variable => math.number((0.0, 0.0)),
            SlotKind::Predefined(p) => match p {
                Predefined::Pi => math.pi(),
                Predefined::E => math.e(),
                _ => math.number(predefined(p, params)),
            },
        })
        .collect()
}

fn predefined(p: Predefined, params: &Params) -> (f64, f64) {
    use Predefined::*;
    let zero = (0.0, 0.0);
    match p {
        P1 => params.p(1).unwrap_or(zero),
        P2 => params.p(2).unwrap_or(zero),
        P3 => params.p(3).unwrap_or(zero),
        P4 => params.p(4).unwrap_or(zero),
        P5 => params.p(5).unwrap_or(zero),
        ScrnMax => (params.xdots as f64, params.ydots as f64),
        MaxIt => (params.maxit as f64, 0.0),
        IsMand => (if params.ismand { 1.0 } else { 0.0 }, 0.0),
        Center => params.view.center(),
        MagXMag => params.view.magxmag(),
        RotSkew => params.view.rotskew(),
        _ => zero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(body: &str) -> EvaluationContext {
        let program = Program::from_body(body, &Settings::default()).unwrap();
        let params = Params {
            seed: Some(1),
            ..Params::default()
        };
        EvaluationContext::with_program(program, params)
    }

    #[test]
    fn test_states() {
        let mut c = EvaluationContext::default();
        assert_eq!(c.state(), State::Uninitialized);
        assert!(c.init_pixel(0, 0).is_err());
        assert_eq!(c.step(), StepResult::Bailout);
        c = context("z=z+1,z<3");
        assert_eq!(c.state(), State::Bound);
        assert_eq!(c.step(), StepResult::Bailout);
        c.init_pixel(0, 0).unwrap();
        assert_eq!(c.state(), State::PixelReady);
        assert_eq!(c.step(), StepResult::Continue);
        assert_eq!(c.state(), State::IterationReady);
        assert_eq!(c.step(), StepResult::Continue);
        assert_eq!(c.step(), StepResult::Bailout);
        assert_eq!(c.z(), (3.0, 0.0));
    }

    #[test]
    fn test_lastsqr() {
        let mut c = context("z=sqr((3,4)),1");
        c.init_pixel(0, 0).unwrap();
        c.step();
        assert_eq!(c.value("lastsqr"), Some((25.0, 0.0)));
        assert_eq!(c.z(), (-7.0, 24.0));
    }

    #[test]
    fn test_per_pixel_values() {
        let mut c = context("a=whitesq+scrnpix,1");
        c.init_pixel(3, 4).unwrap();
        c.step();
        assert_eq!(c.value("a"), Some((4.0, 4.0)));
        assert_eq!(c.value("scrnmax"), Some((640.0, 480.0)));
        assert_eq!(c.value("ismand"), Some((1.0, 0.0)));
    }

    #[test]
    fn test_divide_by_zero_overflows() {
        let mut c = context("z=1/z,1");
        c.init_pixel(0, 0).unwrap();
        assert_eq!(c.step(), StepResult::Overflow);
    }

    #[test]
    fn test_set_param() {
        let mut c = context("z=p1,1");
        assert!(c.set_param(1, (0.5, -0.5)));
        assert!(!c.set_param(6, (0.0, 0.0)));
        c.init_pixel(0, 0).unwrap();
        c.step();
        assert_eq!(c.z(), (0.5, -0.5));
        assert_eq!(c.param(1), Some((0.5, -0.5)));
    }
}
