use super::{Complex, Math};
use crate::lang::Function;
use crate::mach::Backend;
use std::cmp::Ordering;

/// Complex number of two 32-bit fixed point parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LongComplex {
    pub re: i32,
    pub im: i32,
}

/// ## Fixed point backend
///
/// Values are scaled by `2^bitshift`. Products and quotients are formed
/// in wider integers and must fit back into 32 bits. Transcendental
/// functions go through double precision.

#[derive(Debug)]
pub struct Fixed {
    bitshift: u32,
    overflow: bool,
}

impl Fixed {
    /// `bitshift` is clamped so that one still fits in 32 bits.
    pub fn new(bitshift: u32) -> Fixed {
        Fixed {
            bitshift: bitshift.max(Backend::MIN_BITSHIFT).min(Backend::MAX_BITSHIFT),
            overflow: false,
        }
    }

    fn one(&self) -> i64 {
        1 << self.bitshift
    }

    fn narrow(&mut self, v: i128) -> i32 {
        if v > i32::MAX as i128 {
            self.overflow = true;
            i32::MAX
        } else if v < i32::MIN as i128 {
            self.overflow = true;
            i32::MIN
        } else {
            v as i32
        }
    }

    fn from_f64(&mut self, x: f64) -> i32 {
        let v = (x * self.one() as f64).round();
        if !v.is_finite() {
            self.overflow = true;
            return 0;
        }
        self.narrow(v as i128)
    }

    fn long(&mut self, re: i128, im: i128) -> LongComplex {
        LongComplex {
            re: self.narrow(re),
            im: self.narrow(im),
        }
    }

    fn double(&self, a: &LongComplex) -> Complex {
        let (re, im) = self.to_f64(a);
        Complex::new(re, im)
    }

    fn floor(&self, x: i32) -> i64 {
        ((x as i64) >> self.bitshift) << self.bitshift
    }

    fn ceil(&self, x: i32) -> i64 {
        let n = -(x as i64);
        -((n >> self.bitshift) << self.bitshift)
    }

    fn trunc(&self, x: i32) -> i64 {
        if x < 0 {
            self.ceil(x)
        } else {
            self.floor(x)
        }
    }

    fn round(&self, x: i32) -> i64 {
        let half = (x as i64) + (self.one() >> 1);
        (half >> self.bitshift) << self.bitshift
    }

    fn map(&mut self, a: &LongComplex, f: fn(&Fixed, i32) -> i64) -> LongComplex {
        let (re, im) = (f(self, a.re), f(self, a.im));
        self.long(re as i128, im as i128)
    }
}

impl Math for Fixed {
    type Value = LongComplex;

    fn number(&mut self, value: (f64, f64)) -> LongComplex {
        LongComplex {
            re: self.from_f64(value.0),
            im: self.from_f64(value.1),
        }
    }

    fn to_f64(&self, value: &LongComplex) -> (f64, f64) {
        let one = self.one() as f64;
        (value.re as f64 / one, value.im as f64 / one)
    }

    fn bitshift(&self) -> u32 {
        self.bitshift
    }

    fn is_false(&self, value: &LongComplex) -> bool {
        value.re == 0
    }

    fn compare_real(&self, a: &LongComplex, b: &LongComplex) -> Option<Ordering> {
        Some(a.re.cmp(&b.re))
    }

    fn truth(&mut self, value: bool) -> LongComplex {
        LongComplex {
            re: if value { self.one() as i32 } else { 0 },
            im: 0,
        }
    }

    fn neg(&mut self, a: &LongComplex) -> LongComplex {
        self.long(-(a.re as i128), -(a.im as i128))
    }

    fn modulus(&mut self, a: &LongComplex) -> LongComplex {
        let (re, im) = (a.re as i128, a.im as i128);
        self.long((re * re + im * im) >> self.bitshift, 0)
    }

    fn add(&mut self, a: &LongComplex, b: &LongComplex) -> LongComplex {
        self.long(
            a.re as i128 + b.re as i128,
            a.im as i128 + b.im as i128,
        )
    }

    fn sub(&mut self, a: &LongComplex, b: &LongComplex) -> LongComplex {
        self.long(
            a.re as i128 - b.re as i128,
            a.im as i128 - b.im as i128,
        )
    }

    fn mul(&mut self, a: &LongComplex, b: &LongComplex) -> LongComplex {
        let (ar, ai, br, bi) = (a.re as i128, a.im as i128, b.re as i128, b.im as i128);
        self.long(
            (ar * br - ai * bi) >> self.bitshift,
            (ar * bi + ai * br) >> self.bitshift,
        )
    }

    fn div(&mut self, a: &LongComplex, b: &LongComplex) -> LongComplex {
        let (ar, ai, br, bi) = (a.re as i128, a.im as i128, b.re as i128, b.im as i128);
        let d = br * br + bi * bi;
        if d == 0 {
            self.overflow = true;
            return LongComplex::default();
        }
        self.long(
            ((ar * br + ai * bi) << self.bitshift) / d,
            ((ai * br - ar * bi) << self.bitshift) / d,
        )
    }

    fn pow(&mut self, a: &LongComplex, b: &LongComplex) -> LongComplex {
        let v = self.double(a).pow(self.double(b));
        self.number((v.re, v.im))
    }

    fn call(&mut self, function: Function, a: &LongComplex) -> LongComplex {
        use Function::*;
        match function {
            Sqr => self.mul(a, a),
            Abs => self.long((a.re as i128).abs(), (a.im as i128).abs()),
            Conj => self.long(a.re as i128, -(a.im as i128)),
            Real => LongComplex { re: a.re, im: 0 },
            Imag => LongComplex { re: a.im, im: 0 },
            Flip => LongComplex { re: a.im, im: a.re },
            Floor => self.map(a, Fixed::floor),
            Ceil => self.map(a, Fixed::ceil),
            Trunc => self.map(a, Fixed::trunc),
            Round => self.map(a, Fixed::round),
            Srand => *a,
            _ => match self.double(a).call(function) {
                Some(v) => self.number((v.re, v.im)),
                None => {
                    self.overflow = true;
                    LongComplex::default()
                }
            },
        }
    }

    fn pi(&mut self) -> LongComplex {
        self.number((std::f64::consts::PI, 0.0))
    }

    fn e(&mut self) -> LongComplex {
        self.number((std::f64::consts::E, 0.0))
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

    #[test]
    fn test_scaling() {
        let mut m = Fixed::new(16);
        let a = m.number((1.5, -2.25));
        assert_eq!(a, LongComplex { re: 0x18000, im: -0x24000 });
        assert_eq!(m.to_f64(&a), (1.5, -2.25));
        assert_eq!(m.truth(true).re, 1 << 16);
    }

    #[test]
    fn test_arithmetic() {
        let mut m = Fixed::new(16);
        let a = m.number((1.0, 2.0));
        let b = m.number((3.0, -1.0));
        let p = m.mul(&a, &b);
        assert_eq!(m.to_f64(&p), (5.0, 5.0));
        let q = m.div(&p, &b);
        assert_eq!(m.to_f64(&q), (1.0, 2.0));
        let modulus = m.modulus(&a);
        assert_eq!(m.to_f64(&modulus), (5.0, 0.0));
        assert!(!m.overflow());
    }

    #[test]
    fn test_overflow() {
        let mut m = Fixed::new(16);
        m.number((40000.0, 0.0));
        assert!(m.overflow());
        m.clear_overflow();
        let big = m.number((30000.0, 0.0));
        m.add(&big, &big);
        assert!(m.overflow());
        m.clear_overflow();
        let zero = m.number((0.0, 0.0));
        m.div(&big, &zero);
        assert!(m.overflow());
    }

    #[test]
    fn test_rounding() {
        let mut m = Fixed::new(16);
        let x = m.number((-1.5, 2.5));
        let floor = m.call(Function::Floor, &x);
        let ceil = m.call(Function::Ceil, &x);
        let trunc = m.call(Function::Trunc, &x);
        let round = m.call(Function::Round, &x);
        assert_eq!(m.to_f64(&floor), (-2.0, 2.0));
        assert_eq!(m.to_f64(&ceil), (-1.0, 3.0));
        assert_eq!(m.to_f64(&trunc), (-1.0, 2.0));
        assert_eq!(m.to_f64(&round), (-1.0, 3.0));
    }

    #[test]
    fn test_transcendental() {
        let mut m = Fixed::new(24);
        let z = m.number((0.5, 0.0));
        let s = m.call(Function::Sin, &z);
        assert!((m.to_f64(&s).0 - 0.5f64.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_bitshift_clamped() {
        let m = Fixed::new(0);
        assert_eq!(m.bitshift(), Backend::MIN_BITSHIFT);
        let mut m = Fixed::new(40);
        assert_eq!(m.bitshift(), Backend::MAX_BITSHIFT);
        let t = m.truth(true);
        assert_eq!(m.to_f64(&t), (1.0, 0.0));
    }
}
