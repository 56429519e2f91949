mod common;
use common::*;
use formula::mach::{Backend, StepResult};

const QUADRATIC: &str = "z=z*z+p1,|z|<=4";

fn close(a: (f64, f64), b: (f64, f64), tolerance: f64) -> bool {
    (a.0 - b.0).abs() <= tolerance && (a.1 - b.1).abs() <= tolerance
}

fn quadratic_orbit(backend: Backend, c: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
    let mut params = params();
    params.set_p(1, c);
    let mut context = context(QUADRATIC, backend, params);
    orbit(&mut context, steps)
}

#[test]
fn test_backends_agree() {
    let c = (-0.12, 0.2);
    let double = quadratic_orbit(Backend::Double, c, 12);
    let fixed = quadratic_orbit(Backend::Fixed { bitshift: 24 }, c, 12);
    let arbitrary = quadratic_orbit(Backend::arbitrary(), c, 12);
    for i in 0..12 {
        assert!(close(double[i], fixed[i], 1e-5), "{:?} {:?}", double[i], fixed[i]);
        assert!(close(double[i], arbitrary[i], 1e-12), "{:?} {:?}", double[i], arbitrary[i]);
    }
}

#[test]
fn test_same_iteration_counts() {
    let source = "z=0:z=z*z+pixel,|z|<=4";
    let mut params = params();
    params.xdots = 9;
    params.ydots = 5;
    for &backend in [Backend::Double, Backend::fixed(), Backend::arbitrary()].iter() {
        let mut context = context(source, backend, params.clone());
        assert_eq!(iterate(&mut context, 4, 2, 50), 50, "{}", backend);
        assert_eq!(iterate(&mut context, 0, 0, 50), 0, "{}", backend);
    }
}

#[test]
fn test_set_backend_keeps_program() {
    let mut params = params();
    params.set_p(1, (0.25, 0.0));
    let mut context = context("z=p1:z=z*z+p1", Backend::Double, params);
    let checksum = context.program().map(|p| p.checksum());
    context.set_backend(Backend::fixed());
    assert_eq!(context.backend(), Backend::fixed());
    assert_eq!(context.program().map(|p| p.checksum()), checksum);
    context.init_pixel(0, 0).unwrap();
    assert_eq!(context.step(), StepResult::Continue);
    assert!(close(context.z(), (0.3125, 0.0), 1e-4));
}

#[test]
fn test_fixed_overflow() {
    let mut context = context("z=100,z*z", Backend::Fixed { bitshift: 24 }, params());
    context.init_pixel(0, 0).unwrap();
    assert_eq!(context.step(), StepResult::Overflow);
}

#[test]
fn test_fixed_divide_by_zero() {
    let mut context = context("z=1/z", Backend::fixed(), params());
    context.init_pixel(0, 0).unwrap();
    assert_eq!(context.step(), StepResult::Overflow);
}

#[test]
fn test_fixed_bitshift_out_of_range() {
    for &bitshift in [0, 31, 40].iter() {
        let mut context = context("z=rand,a=1<2,1", Backend::Fixed { bitshift }, params());
        context.init_pixel(0, 0).unwrap();
        assert_eq!(context.step(), StepResult::Continue);
        assert_eq!(context.value("a"), Some((1.0, 0.0)));
        let (re, _) = context.z();
        assert!((0.0..1.0).contains(&re));
    }
}

#[test]
fn test_functions_agree() {
    let source = "z=sin(p1)+exp(p1)*log(p1)-sqrt(p1)/cosh(p1)";
    let mut params = params();
    params.set_p(1, (0.7, -0.4));
    let mut results = vec![];
    for &backend in [Backend::Double, Backend::Fixed { bitshift: 20 }, Backend::arbitrary()].iter() {
        let mut context = context(source, backend, params.clone());
        context.init_pixel(0, 0).unwrap();
        context.step();
        results.push(context.z());
    }
    assert!(close(results[0], results[1], 1e-4), "{:?}", results);
    assert!(close(results[0], results[2], 1e-12), "{:?}", results);
}

#[test]
fn test_lastsqr() {
    for &backend in [Backend::Double, Backend::fixed(), Backend::arbitrary()].iter() {
        let mut context = context("z=sqr((3,4)),lastsqr", backend, params());
        context.init_pixel(0, 0).unwrap();
        assert_eq!(context.step(), StepResult::Continue);
        assert!(close(context.z(), (-7.0, 24.0), 1e-3), "{}", backend);
        assert!(close(context.value("lastsqr").unwrap(), (25.0, 0.0), 1e-3));
    }
}
