//! # Fractal Formula
//!
//! A compiler and evaluator for the fractal formula language.
//!
//! A formula library holds entries of the form
//! ```text
//! Mandel(XAXIS) { ; the classic
//!   z = 0 :
//!   z = z*z + pixel
//!   |z| <= 4
//! }
//! ```
//! Everything before the `:` runs once per pixel; everything after runs
//! once per iteration, and the iteration continues while the last
//! statement is true.
//!
//! ```
//! use formula::mach::{compile, EvaluationContext, Params, StepResult};
//!
//! let source = "Mandel { z = 0 : z = z*z + pixel, |z| <= 4 }";
//! let program = compile("mandel", source).unwrap();
//! let mut context = EvaluationContext::with_program(program, Params::default());
//! context.init_pixel(320, 240).unwrap();
//! let mut count = 0;
//! while count < 100 && context.step() == StepResult::Continue {
//!     count += 1;
//! }
//! ```
//!
//! Compile errors come back as a list of at most three positioned
//! errors. `ErrorList::report` renders them against the source text.

pub mod lang;
pub mod mach;
