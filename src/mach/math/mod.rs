/*!
## Numeric backends

Every backend implements the same operator and function set over its
own complex value type. A fault never raises: it sets a sticky overflow
flag which the engine checks after each iteration.

*/

use crate::lang::Function;
use std::cmp::Ordering;

mod big;
mod double;
mod fixed;

pub use big::Arbitrary;
pub use double::{Complex, Double};
pub use fixed::{Fixed, LongComplex};

pub trait Math {
    type Value: Clone + std::fmt::Debug;

    fn number(&mut self, value: (f64, f64)) -> Self::Value;
    fn to_f64(&self, value: &Self::Value) -> (f64, f64);
    /// Fraction bits used for random draws and truth values.
    fn bitshift(&self) -> u32;

    fn is_false(&self, value: &Self::Value) -> bool;
    /// Orders real parts. `None` when they are not comparable.
    fn compare_real(&self, a: &Self::Value, b: &Self::Value) -> Option<Ordering>;
    fn truth(&mut self, value: bool) -> Self::Value;

    fn neg(&mut self, a: &Self::Value) -> Self::Value;
    /// Squared modulus in the real part.
    fn modulus(&mut self, a: &Self::Value) -> Self::Value;
    fn add(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn sub(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn div(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn pow(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn call(&mut self, function: Function, a: &Self::Value) -> Self::Value;

    fn pi(&mut self) -> Self::Value;
    fn e(&mut self) -> Self::Value;

    fn overflow(&self) -> bool;
    fn clear_overflow(&mut self);

    fn compare(&mut self, a: &Self::Value, b: &Self::Value, pass: fn(Ordering) -> bool) -> Self::Value {
        let result = match self.compare_real(a, b) {
            Some(ordering) => pass(ordering),
            None => false,
        };
        self.truth(result)
    }

    fn and(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let result = !self.is_false(a) && !self.is_false(b);
        self.truth(result)
    }

    fn or(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let result = !self.is_false(a) || !self.is_false(b);
        self.truth(result)
    }
}
