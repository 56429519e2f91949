use super::Math;
use crate::lang::Function;
use crate::mach::Backend;
use rug::float::Constant;
use rug::ops::Pow;
use rug::{Complex, Float};
use std::cmp::Ordering;

/// ## Arbitrary precision backend
///
/// Both parts of every value carry `precision` mantissa bits. A result
/// that is not finite sets the overflow flag.

#[derive(Debug)]
pub struct Arbitrary {
    precision: u32,
    overflow: bool,
}

impl Arbitrary {
    pub fn new(precision: u32) -> Arbitrary {
        Arbitrary {
            precision: precision.max(Backend::MIN_PRECISION),
            overflow: false,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    fn checked(&mut self, value: Complex) -> Complex {
        if !value.real().is_finite() || !value.imag().is_finite() {
            self.overflow = true;
        }
        value
    }

    fn zero(&self) -> Complex {
        Complex::new(self.precision)
    }

    fn is_zero(value: &Complex) -> bool {
        value.real().is_zero() && value.imag().is_zero()
    }

    fn map(&self, a: &Complex, f: fn(Float) -> Float) -> Complex {
        let (re, im) = a.clone().into_real_imag();
        Complex::with_val(self.precision, (f(re), f(im)))
    }
}

impl Math for Arbitrary {
    type Value = Complex;

    fn number(&mut self, value: (f64, f64)) -> Complex {
        Complex::with_val(self.precision, value)
    }

    fn to_f64(&self, value: &Complex) -> (f64, f64) {
        (value.real().to_f64(), value.imag().to_f64())
    }

    fn bitshift(&self) -> u32 {
        16
    }

    fn is_false(&self, value: &Complex) -> bool {
        value.real().is_zero()
    }

    fn compare_real(&self, a: &Complex, b: &Complex) -> Option<Ordering> {
        a.real().partial_cmp(b.real())
    }

    fn truth(&mut self, value: bool) -> Complex {
        Complex::with_val(self.precision, (if value { 1 } else { 0 }, 0))
    }

    fn neg(&mut self, a: &Complex) -> Complex {
        -a.clone()
    }

    fn modulus(&mut self, a: &Complex) -> Complex {
        let v = a.clone().norm();
        self.checked(v)
    }

    fn add(&mut self, a: &Complex, b: &Complex) -> Complex {
        let v = Complex::with_val(self.precision, a + b);
        self.checked(v)
    }

    fn sub(&mut self, a: &Complex, b: &Complex) -> Complex {
        let v = Complex::with_val(self.precision, a - b);
        self.checked(v)
    }

    fn mul(&mut self, a: &Complex, b: &Complex) -> Complex {
        let v = Complex::with_val(self.precision, a * b);
        self.checked(v)
    }

    fn div(&mut self, a: &Complex, b: &Complex) -> Complex {
        if Arbitrary::is_zero(b) {
            self.overflow = true;
            return self.zero();
        }
        let v = Complex::with_val(self.precision, a / b);
        self.checked(v)
    }

    fn pow(&mut self, a: &Complex, b: &Complex) -> Complex {
        if Arbitrary::is_zero(a) {
            return self.zero();
        }
        let v = a.clone().pow(b);
        self.checked(v)
    }

    fn call(&mut self, function: Function, a: &Complex) -> Complex {
        use Function::*;
        let z = a.clone();
        let v = match function {
            Sin => z.sin(),
            Sinh => z.sinh(),
            Cos => z.cos(),
            Cosh => z.cosh(),
            Sqr => z.square(),
            Log => {
                if Arbitrary::is_zero(&z) {
                    return self.zero();
                }
                z.ln()
            }
            Exp => z.exp(),
            Abs => self.map(&z, Float::abs),
            Conj => z.conj(),
            Real => Complex::with_val(self.precision, (z.real(), 0)),
            Imag => Complex::with_val(self.precision, (z.imag(), 0)),
            Flip => {
                let (re, im) = z.into_real_imag();
                Complex::with_val(self.precision, (im, re))
            }
            Tan => z.tan(),
            Tanh => z.tanh(),
            Cotan => {
                let (s, c) = (z.clone().sin(), z.cos());
                if Arbitrary::is_zero(&s) {
                    self.overflow = true;
                    return self.zero();
                }
                c / s
            }
            Cotanh => {
                let (s, c) = (z.clone().sinh(), z.cosh());
                if Arbitrary::is_zero(&s) {
                    self.overflow = true;
                    return self.zero();
                }
                c / s
            }
            Cosxx => z.cos().conj(),
            Srand => z,
            Asin => z.asin(),
            Asinh => z.asinh(),
            Acos => z.acos(),
            Acosh => z.acosh(),
            Atan => z.atan(),
            Atanh => z.atanh(),
            Sqrt => z.sqrt(),
            Cabs => z.abs(),
            Floor => self.map(&z, Float::floor),
            Ceil => self.map(&z, Float::ceil),
            Trunc => self.map(&z, Float::trunc),
            Round => self.map(&z, |x| (x + 0.5f64).floor()),
        };
        self.checked(v)
    }

    fn pi(&mut self) -> Complex {
        let pi = Float::with_val(self.precision, Constant::Pi);
        Complex::with_val(self.precision, (pi, 0))
    }

    fn e(&mut self) -> Complex {
        let e = Float::with_val(self.precision, 1).exp();
        Complex::with_val(self.precision, (e, 0))
    }

    fn overflow(&self) -> bool {
        self.overflow
    }

    fn clear_overflow(&mut self) {
        self.overflow = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(m: &Arbitrary, a: &Complex, b: (f64, f64)) -> bool {
        let (re, im) = m.to_f64(a);
        (re - b.0).abs() < 1e-12 && (im - b.1).abs() < 1e-12
    }

    #[test]
    fn test_arithmetic() {
        let mut m = Arbitrary::new(128);
        let a = m.number((1.0, 2.0));
        let b = m.number((3.0, -1.0));
        let p = m.mul(&a, &b);
        assert!(close(&m, &p, (5.0, 5.0)));
        let q = m.div(&p, &b);
        assert!(close(&m, &q, (1.0, 2.0)));
        let modulus = m.modulus(&a);
        assert!(close(&m, &modulus, (5.0, 0.0)));
        assert!(!m.overflow());
        let zero = m.number((0.0, 0.0));
        m.div(&a, &zero);
        assert!(m.overflow());
    }

    #[test]
    fn test_functions() {
        let mut m = Arbitrary::new(128);
        let z = m.number((0.5, 0.25));
        let s = m.call(Function::Sin, &z);
        assert!(close(&m, &s, (0.5f64.sin() * 0.25f64.cosh(), 0.5f64.cos() * 0.25f64.sinh())));
        let flip = m.call(Function::Flip, &z);
        assert!(close(&m, &flip, (0.25, 0.5)));
        let halves = m.number((-1.5, 2.5));
        let round = m.call(Function::Round, &halves);
        assert!(close(&m, &round, (-1.0, 3.0)));
        let pi = m.pi();
        assert!(close(&m, &pi, (std::f64::consts::PI, 0.0)));
    }
}
