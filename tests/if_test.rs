mod common;
use common::*;
use formula::lang::ErrorCode;
use formula::lang::token::Flow;
use formula::mach::{Backend, Instruction};

const CHAIN: &str = "\
a = real(p1)
if (a == 0)
  b = 1
elseif (a == 1)
  b = 2
else
  b = 3
endif
1";

fn branch(a: f64) -> f64 {
    let mut params = params();
    params.set_p(1, (a, 0.0));
    let mut context = context(CHAIN, Backend::Double, params);
    context.init_pixel(0, 0).unwrap();
    context.step();
    context.value("b").unwrap().0
}

#[test]
fn test_single_jump_target() {
    let p = program("if (real(z) > 0)\n z = z + 1\nendif");
    let jumps: Vec<usize> = p
        .instructions()
        .iter()
        .filter_map(|i| match i {
            Instruction::JumpIfFalse(address) => Some(*address),
            _ => None,
        })
        .collect();
    let endif = p
        .instructions()
        .iter()
        .position(|i| *i == Instruction::EndIf)
        .unwrap();
    assert_eq!(jumps, vec![endif + 1]);
}

#[test]
fn test_branches() {
    assert_eq!(branch(0.0), 1.0);
    assert_eq!(branch(1.0), 2.0);
    assert_eq!(branch(7.0), 3.0);
}

#[test]
fn test_records() {
    let p = program(CHAIN);
    assert_eq!(p.jumps().len(), 5);
    assert!(p
        .jumps()
        .iter()
        .filter(|j| j.flow != Flow::EndIf)
        .all(|j| j.target.is_some()));
}

#[test]
fn test_nested() {
    let source = "\
if (real(p1) > 0)
  if (imag(p1) > 0)
    q = 1
  else
    q = 2
  endif
else
  q = 3
endif
q";
    let q = |p1: (f64, f64)| {
        let mut params = params();
        params.set_p(1, p1);
        let mut context = context(source, Backend::Double, params);
        context.init_pixel(0, 0).unwrap();
        context.step();
        context.value("q").unwrap().0
    };
    assert_eq!(q((1.0, 1.0)), 1.0);
    assert_eq!(q((1.0, -1.0)), 2.0);
    assert_eq!(q((-1.0, 1.0)), 3.0);
}

#[test]
fn test_jump_count_limit() {
    let nested = |n: usize| format!("{}z=1\n{}", "if(1)\n".repeat(n), "endif\n".repeat(n));
    assert_eq!(codes(&nested(200)), vec![]);
    assert_eq!(codes(&nested(201)), vec![ErrorCode::TooManyJumps]);
}

#[test]
fn test_structure_errors() {
    assert_eq!(codes("if(1)\nz=1"), vec![ErrorCode::IfWithNoEndif]);
    assert_eq!(codes("z=1\nendif"), vec![ErrorCode::EndifWithNoIf]);
    assert_eq!(codes("else\nz=1"), vec![ErrorCode::MisplacedElseOrElseif]);
    assert_eq!(
        codes("if(1)\nelse\nelse\nendif"),
        vec![ErrorCode::EndifRequiredAfterElse]
    );
    assert_eq!(codes("z=(1)if(1)"), vec![ErrorCode::JumpNotFirst]);
    assert_eq!(codes("if(1):z=1"), vec![ErrorCode::UnmatchedIfInInit]);
}

#[test]
fn test_flow_keyword_errors() {
    assert_eq!(codes("if\nz=1"), vec![ErrorCode::JumpNeedsBoolean]);
    assert_eq!(codes("if(1)\nendif(1)"), vec![ErrorCode::NoCharAfterThisJump]);
}
