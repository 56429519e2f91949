#![allow(dead_code)]

use formula::lang::ErrorCode;
use formula::mach::{Backend, EvaluationContext, Params, Program, Settings, StepResult};

pub fn settings(backend: Backend) -> Settings {
    Settings {
        backend,
        ..Settings::default()
    }
}

pub fn params() -> Params {
    Params {
        seed: Some(1),
        ..Params::default()
    }
}

pub fn program(body: &str) -> Program {
    match Program::from_body(body, &Settings::default()) {
        Ok(program) => program,
        Err(errors) => panic!("{}\n{}", body, errors.report(body)),
    }
}

/// Error codes from compiling a body, empty when it compiles.
pub fn codes(body: &str) -> Vec<ErrorCode> {
    match Program::from_body(body, &Settings::default()) {
        Ok(_) => vec![],
        Err(errors) => errors.codes(),
    }
}

/// Listing with slot names, one space between instructions.
pub fn listing(body: &str) -> String {
    program(body).mnemonics().join(" ")
}

pub fn context(body: &str, backend: Backend, params: Params) -> EvaluationContext {
    let program = match Program::from_body(body, &settings(backend)) {
        Ok(program) => program,
        Err(errors) => panic!("{}\n{}", body, errors.report(body)),
    };
    EvaluationContext::with_program(program, params)
}

/// Initializes a pixel then steps until bailout or `maxit`. Returns the
/// number of steps that said to continue.
pub fn iterate(context: &mut EvaluationContext, col: usize, row: usize, maxit: usize) -> usize {
    context.init_pixel(col, row).unwrap();
    let mut count = 0;
    while count < maxit {
        match context.step() {
            StepResult::Continue => count += 1,
            _ => break,
        }
    }
    count
}

/// `z` after every step of one pixel.
pub fn orbit(context: &mut EvaluationContext, steps: usize) -> Vec<(f64, f64)> {
    context.init_pixel(0, 0).unwrap();
    (0..steps)
        .map(|_| {
            context.step();
            context.z()
        })
        .collect()
}
