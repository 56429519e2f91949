use super::Math;
use crate::lang::Function;
use std::cmp::Ordering;

/// ## Double precision complex number
///
/// Shared by the double backend and by the fixed backend for the
/// functions it evaluates in floating point.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl From<(f64, f64)> for Complex {
    fn from((re, im): (f64, f64)) -> Complex {
        Complex { re, im }
    }
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Complex {
        Complex { re, im }
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    pub fn norm(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn add(self, b: Complex) -> Complex {
        Complex::new(self.re + b.re, self.im + b.im)
    }

    pub fn sub(self, b: Complex) -> Complex {
        Complex::new(self.re - b.re, self.im - b.im)
    }

    pub fn mul(self, b: Complex) -> Complex {
        Complex::new(
            self.re * b.re - self.im * b.im,
            self.re * b.im + self.im * b.re,
        )
    }

    /// `None` when the divisor is too close to zero.
    pub fn div(self, b: Complex) -> Option<Complex> {
        let d = b.norm();
        if d <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Complex::new(
            (self.re * b.re + self.im * b.im) / d,
            (self.im * b.re - self.re * b.im) / d,
        ))
    }

    pub fn sqr(self) -> Complex {
        Complex::new(
            self.re * self.re - self.im * self.im,
            2.0 * self.re * self.im,
        )
    }

    /// The logarithm of zero is taken as zero.
    pub fn ln(self) -> Complex {
        if self.re == 0.0 && self.im == 0.0 {
            return Complex::default();
        }
        Complex::new(self.norm().ln() / 2.0, self.im.atan2(self.re))
    }

    pub fn exp(self) -> Complex {
        let m = self.re.exp();
        Complex::new(m * self.im.cos(), m * self.im.sin())
    }

    pub fn sqrt(self) -> Complex {
        if self.re == 0.0 && self.im == 0.0 {
            return Complex::default();
        }
        let m = self.norm().sqrt().sqrt();
        let a = self.im.atan2(self.re) / 2.0;
        Complex::new(m * a.cos(), m * a.sin())
    }

    /// Zero raised to anything is zero.
    pub fn pow(self, b: Complex) -> Complex {
        if self.re == 0.0 && self.im == 0.0 {
            return Complex::default();
        }
        self.ln().mul(b).exp()
    }

    pub fn sin(self) -> Complex {
        Complex::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    pub fn cos(self) -> Complex {
        Complex::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    /// Cosine with the sign of the imaginary part flipped.
    pub fn cosxx(self) -> Complex {
        Complex::new(
            self.re.cos() * self.im.cosh(),
            self.re.sin() * self.im.sinh(),
        )
    }

    pub fn sinh(self) -> Complex {
        Complex::new(
            self.re.sinh() * self.im.cos(),
            self.re.cosh() * self.im.sin(),
        )
    }

    pub fn cosh(self) -> Complex {
        Complex::new(
            self.re.cosh() * self.im.cos(),
            self.re.sinh() * self.im.sin(),
        )
    }

    pub fn tan(self) -> Option<Complex> {
        let (x, y) = (2.0 * self.re, 2.0 * self.im);
        let d = x.cos() + y.cosh();
        if d.abs() <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Complex::new(x.sin() / d, y.sinh() / d))
    }

    pub fn tanh(self) -> Option<Complex> {
        let (x, y) = (2.0 * self.re, 2.0 * self.im);
        let d = x.cosh() + y.cos();
        if d.abs() <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Complex::new(x.sinh() / d, y.sin() / d))
    }

    pub fn cotan(self) -> Option<Complex> {
        let (x, y) = (2.0 * self.re, 2.0 * self.im);
        let d = y.cosh() - x.cos();
        if d.abs() <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Complex::new(x.sin() / d, -y.sinh() / d))
    }

    pub fn cotanh(self) -> Option<Complex> {
        let (x, y) = (2.0 * self.re, 2.0 * self.im);
        let d = x.cosh() - y.cos();
        if d.abs() <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Complex::new(x.sinh() / d, -y.sin() / d))
    }

    /// `-i ln(iz + sqrt(1 - z²))`
    pub fn asin(self) -> Complex {
        let i = Complex::new(0.0, 1.0);
        let root = Complex::new(1.0, 0.0).sub(self.sqr()).sqrt();
        let w = i.mul(self).add(root).ln();
        Complex::new(w.im, -w.re)
    }

    /// `-i ln(z + i sqrt(1 - z²))`
    pub fn acos(self) -> Complex {
        let i = Complex::new(0.0, 1.0);
        let root = Complex::new(1.0, 0.0).sub(self.sqr()).sqrt();
        let w = self.add(i.mul(root)).ln();
        Complex::new(w.im, -w.re)
    }

    /// `i/2 ln((1 - iz) / (1 + iz))`
    pub fn atan(self) -> Option<Complex> {
        let iz = Complex::new(-self.im, self.re);
        let one = Complex::new(1.0, 0.0);
        let w = one.sub(iz).div(one.add(iz))?.ln();
        Some(Complex::new(-w.im / 2.0, w.re / 2.0))
    }

    /// `ln(z + sqrt(z² + 1))`
    pub fn asinh(self) -> Complex {
        let root = self.sqr().add(Complex::new(1.0, 0.0)).sqrt();
        self.add(root).ln()
    }

    /// `ln(z + sqrt(z + 1) sqrt(z - 1))`
    pub fn acosh(self) -> Complex {
        let one = Complex::new(1.0, 0.0);
        let root = self.add(one).sqrt().mul(self.sub(one).sqrt());
        self.add(root).ln()
    }

    /// `ln((1 + z) / (1 - z)) / 2`
    pub fn atanh(self) -> Option<Complex> {
        let one = Complex::new(1.0, 0.0);
        let w = one.add(self).div(one.sub(self))?.ln();
        Some(Complex::new(w.re / 2.0, w.im / 2.0))
    }

    pub fn map(self, f: fn(f64) -> f64) -> Complex {
        Complex::new(f(self.re), f(self.im))
    }

    /// Every function except `srand`, which the engine handles.
    pub fn call(self, function: Function) -> Option<Complex> {
        use Function::*;
        let z = self;
        Some(match function {
            Sin => z.sin(),
            Sinh => z.sinh(),
            Cos => z.cos(),
            Cosh => z.cosh(),
            Sqr => z.sqr(),
            Log => z.ln(),
            Exp => z.exp(),
            Abs => z.map(f64::abs),
            Conj => Complex::new(z.re, -z.im),
            Real => Complex::new(z.re, 0.0),
            Imag => Complex::new(z.im, 0.0),
            Flip => Complex::new(z.im, z.re),
            Tan => z.tan()?,
            Tanh => z.tanh()?,
            Cotan => z.cotan()?,
            Cotanh => z.cotanh()?,
            Cosxx => z.cosxx(),
            Srand => z,
            Asin => z.asin(),
            Asinh => z.asinh(),
            Acos => z.acos(),
            Acosh => z.acosh(),
            Atan => z.atan()?,
            Atanh => z.atanh()?,
            Sqrt => z.sqrt(),
            Cabs => Complex::new(z.norm().sqrt(), 0.0),
            Floor => z.map(f64::floor),
            Ceil => z.map(f64::ceil),
            Trunc => z.map(f64::trunc),
            Round => z.map(|x| (x + 0.5).floor()),
        })
    }
}

/// ## Double precision backend

#[derive(Debug, Default)]
pub struct Double {
    overflow: bool,
}

impl Double {
    pub fn new() -> Double {
        Double::default()
    }

    fn checked(&mut self, value: Option<Complex>) -> Complex {
        match value {
            Some(v) if v.is_finite() => v,
            Some(v) => {
                self.overflow = true;
                v
            }
            None => {
                self.overflow = true;
                Complex::default()
            }
        }
    }
}

impl Math for Double {
    type Value = Complex;

    fn number(&mut self, value: (f64, f64)) -> Complex {
        Complex::from(value)
    }

    fn to_f64(&self, value: &Complex) -> (f64, f64) {
        (value.re, value.im)
    }

    fn bitshift(&self) -> u32 {
        16
    }

    fn is_false(&self, value: &Complex) -> bool {
        value.re == 0.0
    }

    fn compare_real(&self, a: &Complex, b: &Complex) -> Option<Ordering> {
        a.re.partial_cmp(&b.re)
    }

    fn truth(&mut self, value: bool) -> Complex {
        Complex::new(if value { 1.0 } else { 0.0 }, 0.0)
    }

    fn neg(&mut self, a: &Complex) -> Complex {
        Complex::new(-a.re, -a.im)
    }

    fn modulus(&mut self, a: &Complex) -> Complex {
        let v = Complex::new(a.norm(), 0.0);
        self.checked(Some(v))
    }

    fn add(&mut self, a: &Complex, b: &Complex) -> Complex {
        self.checked(Some(a.add(*b)))
    }

    fn sub(&mut self, a: &Complex, b: &Complex) -> Complex {
        self.checked(Some(a.sub(*b)))
    }

    fn mul(&mut self, a: &Complex, b: &Complex) -> Complex {
        self.checked(Some(a.mul(*b)))
    }

    fn div(&mut self, a: &Complex, b: &Complex) -> Complex {
        self.checked(a.div(*b))
    }

    fn pow(&mut self, a: &Complex, b: &Complex) -> Complex {
        self.checked(Some(a.pow(*b)))
    }

    fn call(&mut self, function: Function, a: &Complex) -> Complex {
        self.checked(a.call(function))
    }

    fn pi(&mut self) -> Complex {
        Complex::new(std::f64::consts::PI, 0.0)
    }

    fn e(&mut self) -> Complex {
        Complex::new(std::f64::consts::E, 0.0)
    }

    fn overflow(&self) -> bool {
        self.overflow
    }

    fn clear_overflow(&mut self) {
        self.overflow = false;
    }
}
