use super::token::*;
use super::{Error, ErrorCode, ErrorList, Limits};
use tracing::debug;

/// Which caller supplied values a formula reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamUsage {
    pub p1: bool,
    pub p2: bool,
    pub p3: bool,
    pub p4: bool,
    pub p5: bool,
    pub ismand: bool,
    /// Highest of `fn1`..`fn4` used, zero for none.
    pub max_fn: u8,
}

impl ParamUsage {
    fn variable(&mut self, p: Predefined) {
        match p {
            Predefined::P1 => self.p1 = true,
            Predefined::P2 => self.p2 = true,
            Predefined::P3 => self.p3 = true,
            Predefined::P4 => self.p4 = true,
            Predefined::P5 => self.p5 = true,
            Predefined::IsMand => self.ismand = true,
            _ => {}
        }
    }
}

/// ## Result of a successful prescan
///
/// Counts are upper bounds for sizing the compiled program.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prescan {
    pub ops: usize,
    pub loads: usize,
    pub stores: usize,
    pub jumps: usize,
    pub ifs: usize,
    pub uses_jump: bool,
    pub usage: ParamUsage,
}

/// Validates one formula. `start` is the offset where its first statement
/// begins. The tokens must run through the end of the formula.
pub fn prescan(tokens: &[Token], start: usize, limits: &Limits) -> Result<Prescan, ErrorList> {
    let mut scanner = Scanner::new(start, limits);
    for (index, token) in tokens.iter().enumerate() {
        let next = tokens.get(index + 1);
        if let Err(fatal) = scanner.token(token, next) {
            scanner.errors.record(fatal);
            break;
        }
        if scanner.errors.is_full() || token.is_end_of_formula() {
            break;
        }
    }
    debug!(
        ops = scanner.counts.ops,
        loads = scanner.counts.loads,
        stores = scanner.counts.stores,
        jumps = scanner.counts.jumps,
        errors = scanner.errors.len(),
        "prescan"
    );
    if scanner.errors.is_empty() {
        Ok(scanner.counts)
    } else {
        Err(scanner.errors)
    }
}

struct Scanner<'a> {
    limits: &'a Limits,
    counts: Prescan,
    errors: ErrorList,
    statement: usize,
    paren: usize,
    modulus: Vec<bool>,
    else_used: Vec<bool>,
    expecting_arg: bool,
    new_statement: bool,
    assignment_ok: bool,
    got_colon: bool,
}

impl<'a> Scanner<'a> {
    fn new(start: usize, limits: &'a Limits) -> Scanner<'a> {
        Scanner {
            limits,
            counts: Prescan::default(),
            errors: ErrorList::new(),
            statement: start,
            paren: 0,
            modulus: vec![false],
            else_used: vec![],
            expecting_arg: true,
            new_statement: true,
            assignment_ok: true,
            got_colon: false,
        }
    }

    fn error(&mut self, code: ErrorCode, token: &Token) {
        let error = Error::new(code)
            .in_statement(self.statement)
            .in_column(&token.column);
        self.errors.record(error);
    }

    fn in_modulus(&self) -> bool {
        self.modulus.last().copied().unwrap_or(false)
    }

    fn any_modulus(&self) -> bool {
        self.modulus.iter().any(|m| *m)
    }

    /// Only an unexpected end of file is returned as an error; everything
    /// else is recorded and scanning continues.
    fn token(&mut self, token: &Token, next: Option<&Token>) -> Result<(), Error> {
        use ErrorCode::*;
        match token.kind {
            Kind::Invalid(LexError::EndOfFile) => {
                return Err(error!(UnexpectedEof, self.statement, ..&token.column));
            }
            Kind::Invalid(reason) => self.error(reason.code(), token),
            Kind::OpenParen => {
                self.counts.ops += 1;
                self.assignment_ok = false;
                self.new_statement = false;
                self.paren += 1;
                if self.paren > self.limits.max_paren_depth {
                    self.error(NestingTooDeep, token);
                } else if !self.expecting_arg {
                    self.error(ShouldBeOperator, token);
                }
                self.modulus.push(false);
            }
            Kind::CloseParen => {
                self.counts.ops += 1;
                self.new_statement = false;
                if self.paren > 0 {
                    self.paren -= 1;
                } else {
                    self.error(NeedMatchingOpenParen, token);
                }
                if self.in_modulus() {
                    self.error(UnmatchedModulus, token);
                }
                if self.modulus.len() > 1 {
                    self.modulus.pop();
                }
                if self.expecting_arg {
                    self.error(ShouldBeArgument, token);
                }
            }
            Kind::ParamVariable(_)
            | Kind::PredefinedVariable(_)
            | Kind::UserVariable
            | Kind::RealConstant(_)
            | Kind::ComplexConstant(_, _) => {
                if let Kind::ParamVariable(p) = token.kind {
                    self.counts.usage.variable(p);
                }
                if token.constant().is_some() {
                    self.assignment_ok = false;
                }
                self.counts.ops += 1;
                self.counts.loads += 1;
                self.new_statement = false;
                if !self.expecting_arg {
                    self.error(ShouldBeOperator, token);
                }
                self.expecting_arg = false;
            }
            Kind::Function(_) | Kind::ParamFunction(_) => {
                if let Kind::ParamFunction(n) = token.kind {
                    self.counts.usage.max_fn = self.counts.usage.max_fn.max(n);
                }
                self.counts.ops += 1;
                self.assignment_ok = false;
                self.new_statement = false;
                if !self.expecting_arg {
                    self.error(ShouldBeOperator, token);
                }
            }
            Kind::Flow(flow) => self.flow(flow, token),
            Kind::Operator(op) => self.operator(op, token, next),
            Kind::EndOfFormula => {
                self.counts.ops += 3;
                if self.paren > 0 {
                    self.error(NeedMoreCloseParens, token);
                }
                if self.any_modulus() {
                    self.error(UnmatchedModulus, token);
                }
                if !self.else_used.is_empty() {
                    self.error(IfWithNoEndif, token);
                }
                if self.expecting_arg && !self.new_statement {
                    self.error(ShouldBeArgument, token);
                }
                if self.counts.ifs > self.limits.max_jumps {
                    self.error(TooManyJumps, token);
                }
            }
        }
        Ok(())
    }

    fn flow(&mut self, flow: Flow, token: &Token) {
        use ErrorCode::*;
        self.counts.ops += 1;
        self.counts.jumps += 1;
        self.counts.uses_jump = true;
        if !self.new_statement {
            self.error(JumpNotFirst, token);
            return;
        }
        match flow {
            Flow::If => {
                self.counts.ifs += 1;
                self.else_used.push(false);
            }
            Flow::ElseIf | Flow::Else => {
                if flow == Flow::ElseIf {
                    self.counts.ops += 3;
                    self.counts.jumps += 1;
                }
                match self.else_used.last_mut() {
                    Some(true) => self.error(EndifRequiredAfterElse, token),
                    Some(else_used) => {
                        if flow == Flow::Else {
                            *else_used = true;
                        }
                    }
                    None => self.error(MisplacedElseOrElseif, token),
                }
            }
            Flow::EndIf => {
                if self.else_used.pop().is_none() {
                    self.error(EndifWithNoIf, token);
                }
            }
        }
    }

    fn operator(&mut self, op: Operator, token: &Token, next: Option<&Token>) {
        use ErrorCode::*;
        self.counts.ops += 1;
        match op {
            Operator::Comma | Operator::Colon => {
                if self.paren > 0 {
                    self.error(NeedMoreCloseParens, token);
                    self.paren = 0;
                }
                if self.any_modulus() {
                    self.error(UnmatchedModulus, token);
                }
                self.modulus = vec![false];
                if self.expecting_arg && !self.new_statement {
                    self.error(ShouldBeArgument, token);
                }
                if op == Operator::Colon {
                    if !self.else_used.is_empty() {
                        self.error(UnmatchedIfInInit, token);
                        self.else_used.clear();
                    }
                    if self.got_colon {
                        self.error(SecondColon, token);
                    }
                    self.got_colon = true;
                }
                self.new_statement = true;
                self.expecting_arg = true;
                self.assignment_ok = true;
                self.statement = token.column.end;
            }
            Operator::Assign => {
                self.counts.ops -= 1;
                self.counts.loads = self.counts.loads.saturating_sub(1);
                self.counts.stores += 1;
                self.new_statement = false;
                if !self.assignment_ok {
                    self.error(IllegalAssignment, token);
                }
                self.expecting_arg = true;
            }
            Operator::Modulus => {
                self.assignment_ok = false;
                self.new_statement = false;
                if self.in_modulus() {
                    if self.expecting_arg {
                        self.error(ShouldBeArgument, token);
                    }
                } else if !self.expecting_arg {
                    self.error(ShouldBeOperator, token);
                }
                if let Some(top) = self.modulus.last_mut() {
                    *top = !*top;
                }
            }
            Operator::Minus => {
                self.assignment_ok = false;
                self.new_statement = false;
                self.expecting_arg = true;
            }
            _ => {
                self.assignment_ok = false;
                self.new_statement = false;
                if self.expecting_arg {
                    self.error(ShouldBeArgument, token);
                }
                if op == Operator::Power {
                    if let Some(Kind::Operator(Operator::Minus)) = next.map(|t| t.kind) {
                        self.error(NoNegAfterExponent, token);
                    }
                }
                self.expecting_arg = true;
            }
        }
    }
}
