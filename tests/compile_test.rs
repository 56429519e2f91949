mod common;
use common::*;
use formula::lang::{ErrorCode, Function};
use formula::mach::{Backend, Instruction, Program, Settings};

#[test]
fn test_assignment() {
    assert_eq!(
        listing("z=z*z+p1"),
        "LOAD(z) LOAD(z) MUL LOAD(p1) ADD STORE(z)"
    );
    assert_eq!(listing("a=b=1"), "LOAD(1) STORE(b) STORE(a)");
}

#[test]
fn test_precedence() {
    assert_eq!(listing("1+2*3"), "LOAD(1) LOAD(2) LOAD(3) MUL ADD");
    assert_eq!(listing("(1+2)*3"), "LOAD(1) LOAD(2) ADD LOAD(3) MUL");
    assert_eq!(listing("z^2^3"), "LOAD(z) LOAD(2) POW LOAD(3) POW");
    assert_eq!(listing("a<b&&c"), "LOAD(a) LOAD(b) LT LOAD(c) AND");
    assert_eq!(listing("|z|<4"), "LOAD(z) MOD LOAD(4) LT");
}

#[test]
fn test_functions() {
    assert_eq!(listing("sin(z)+1"), "LOAD(z) SIN LOAD(1) ADD");
    assert_eq!(listing("fn2(z)"), "LOAD(z) SQR");
    let settings = Settings {
        functions: [Function::Sin, Function::Exp, Function::Sinh, Function::Cosh],
        ..Settings::default()
    };
    let p = Program::from_body("fn2(z)", &settings).unwrap();
    assert_eq!(p.mnemonics(), vec!["LOAD(z)", "EXP"]);
}

#[test]
fn test_negation() {
    assert_eq!(listing("-z"), "LOAD(z) NEG");
    assert_eq!(listing("a=-2"), "LOAD(-2) STORE(a)");
    assert_eq!(listing("1-2"), "LOAD(1) LOAD(2) SUB");
}

#[test]
fn test_subtraction() {
    assert_eq!(listing("a-b"), "LOAD(a) LOAD(b) SUB");
    assert_eq!(listing("a-(b)"), "LOAD(a) LOAD(b) SUB");
    assert_eq!(listing("a- -b"), "LOAD(a) LOAD(b) NEG SUB");
    assert_eq!(
        listing("z=z*z-p1"),
        "LOAD(z) LOAD(z) MUL LOAD(p1) SUB STORE(z)"
    );
    assert!(codes("z=p1-(1,2)").is_empty());
    assert!(codes("a=(a)-b").is_empty());
}

#[test]
fn test_statements() {
    assert_eq!(
        listing("z=pixel:z=sqr(z),|z|<=4"),
        "LOAD(pixel) STORE(z) ENDINIT LOAD(z) SQR STORE(z) CLEAR LOAD(z) MOD LOAD(4) LTEQ"
    );
}

#[test]
fn test_constants_share_slots() {
    let p = program("a=1,b=1,c=(1,2),d=(1,2)");
    let names = p.slots().names();
    assert_eq!(names.iter().filter(|n| **n == "1").count(), 1);
    assert_eq!(names.iter().filter(|n| **n == "(1,2)").count(), 1);
}

#[test]
fn test_recompile_normalized_text() {
    let source = "z = Pixel , c = P1 :\n  if (|z| > 2) ; escape\n z = 0\n else\n z = z*z + c\n endif\n |z| <= 4\n";
    let a = program(source);
    let b = program(a.text());
    assert_eq!(a.text(), b.text());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.checksum(), b.checksum());
    assert_eq!(a.mnemonics(), b.mnemonics());
    assert_eq!(a.slots().names(), b.slots().names());
}

#[test]
fn test_deterministic() {
    let source = "z=pixel:z=z^2.5+sin(p1)*(1,-1),|z|<=4";
    let a = program(source);
    let b = program(source);
    assert_eq!(a.instructions(), b.instructions());
    assert_eq!(a.checksum(), b.checksum());
}

#[test]
fn test_backend_neutral() {
    let source = "z=pixel:z=z*z+p1,|z|<=4";
    let double = Program::from_body(source, &settings(Backend::Double)).unwrap();
    let fixed = Program::from_body(source, &settings(Backend::fixed())).unwrap();
    assert_eq!(double.instructions(), fixed.instructions());
    assert_eq!(fixed.settings().backend, Backend::fixed());
}

#[test]
fn test_no_executable_instructions() {
    assert_eq!(codes(""), vec![ErrorCode::NoExecutableInstructions]);
    assert_eq!(codes(",,\n"), vec![ErrorCode::NoExecutableInstructions]);
}

#[test]
fn test_errors() {
    assert_eq!(codes("z=(1,2,3)"), vec![ErrorCode::IllFormedConstant]);
    assert_eq!(codes("z=z*"), vec![ErrorCode::ShouldBeArgument]);
    assert_eq!(codes("z=(z"), vec![ErrorCode::NeedMoreCloseParens]);
    assert_eq!(codes("z=z)"), vec![ErrorCode::NeedMatchingOpenParen]);
    assert_eq!(codes("z=1:z=2:z=3"), vec![ErrorCode::SecondColon]);
    assert_eq!(codes("z=sin"), vec![ErrorCode::FuncUsedAsVar]);
    assert_eq!(codes("z=foo(z)"), vec![ErrorCode::UndefinedFunction]);
}

#[test]
fn test_at_most_three_errors() {
    let errors = Program::from_body("a=*\nb=*\nc=*\nd=*", &Settings::default()).unwrap_err();
    assert_eq!(errors.len(), 3);
}

#[test]
fn test_jumps_are_patched() {
    let p = program("if(1)\nz=1\nendif");
    for instruction in p.instructions() {
        if let Instruction::JumpIfFalse(address) = instruction {
            assert!(*address <= p.len());
            assert!(*address > 0);
        }
    }
}
