mod common;
use common::*;
use formula::lang::token::Kind;
use formula::lang::{lex, Lexer};
use formula::mach::{Backend, Program, Settings};
use proptest::prelude::*;

const MAX_INPUT_BYTES: usize = 256;

proptest! {
    #[test]
    fn lexer_ends_every_body(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let tokens = lex(&input);
        prop_assert!(tokens.len() <= input.chars().count() + 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(Kind::EndOfFormula));
    }

    #[test]
    fn bounded_lexer_terminates(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let count = Lexer::bounded(&input, 0).count();
        prop_assert!(count <= input.chars().count() + 1);
    }

    #[test]
    fn compile_and_run_without_panicking(input in "[a-z0-9 ()|+*/^<>=!&,:.\n-]{0,48}") {
        let settings = Settings::default();
        match Program::from_body(&input, &settings) {
            Ok(program) => {
                prop_assert!(!program.is_empty());
                let again = Program::from_body(program.text(), &settings);
                prop_assert_eq!(again.map(|p| p.checksum()).ok(), Some(program.checksum()));
                for &backend in [Backend::Double, Backend::fixed()].iter() {
                    let mut context = context(program.text(), backend, params());
                    if context.init_pixel(1, 1).is_ok() {
                        for _ in 0..3 {
                            context.step();
                        }
                    }
                }
            }
            Err(errors) => {
                prop_assert!(!errors.is_empty() && errors.len() <= 3);
                let _ = errors.report(&input);
            }
        }
    }

    #[test]
    fn backends_agree_inside_the_cardioid(re in -0.2f64..0.2, im in -0.2f64..0.2) {
        let source = "z=z*z+p1,|z|<=4";
        let mut params = params();
        params.set_p(1, (re, im));
        let mut double = context(source, Backend::Double, params.clone());
        let mut fixed = context(source, Backend::Fixed { bitshift: 24 }, params.clone());
        let mut arbitrary = context(source, Backend::arbitrary(), params);
        let a = orbit(&mut double, 8);
        let b = orbit(&mut fixed, 8);
        let c = orbit(&mut arbitrary, 8);
        for i in 0..8 {
            prop_assert!((a[i].0 - b[i].0).abs() < 1e-5 && (a[i].1 - b[i].1).abs() < 1e-5);
            prop_assert!((a[i].0 - c[i].0).abs() < 1e-12 && (a[i].1 - c[i].1).abs() < 1e-12);
        }
    }
}
