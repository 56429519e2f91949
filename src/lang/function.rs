use std::collections::HashMap;

thread_local!(
    static NAME_TO_FUNCTION: HashMap<&'static str, Function> =
        Function::ALL.iter().map(|f| (f.name(), *f)).collect();
);

/// ## Built-in functions
///
/// Every function takes one complex argument and returns one complex value.
/// `fn1` through `fn4` are not listed here; they are parameters which the
/// compiler replaces with one of these.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Sinh,
    Cos,
    Cosh,
    Sqr,
    Log,
    Exp,
    Abs,
    Conj,
    Real,
    Imag,
    Flip,
    Tan,
    Tanh,
    Cotan,
    Cotanh,
    Cosxx,
    Srand,
    Asin,
    Asinh,
    Acos,
    Acosh,
    Atan,
    Atanh,
    Sqrt,
    Cabs,
    Floor,
    Ceil,
    Trunc,
    Round,
}

impl Function {
    pub const ALL: [Function; 30] = [
        Function::Sin,
        Function::Sinh,
        Function::Cos,
        Function::Cosh,
        Function::Sqr,
        Function::Log,
        Function::Exp,
        Function::Abs,
        Function::Conj,
        Function::Real,
        Function::Imag,
        Function::Flip,
        Function::Tan,
        Function::Tanh,
        Function::Cotan,
        Function::Cotanh,
        Function::Cosxx,
        Function::Srand,
        Function::Asin,
        Function::Asinh,
        Function::Acos,
        Function::Acosh,
        Function::Atan,
        Function::Atanh,
        Function::Sqrt,
        Function::Cabs,
        Function::Floor,
        Function::Ceil,
        Function::Trunc,
        Function::Round,
    ];

    /// The four functions bound to `fn1`..`fn4` unless configured otherwise.
    pub const PARAM_DEFAULTS: [Function; 4] =
        [Function::Sin, Function::Sqr, Function::Sinh, Function::Cosh];

    pub fn from_name(s: &str) -> Option<Function> {
        NAME_TO_FUNCTION.with(|map| map.get(s).copied())
    }

    /// Returns 1..=4 for `fn1`..`fn4`.
    pub fn param_index(s: &str) -> Option<u8> {
        match s {
            "fn1" => Some(1),
            "fn2" => Some(2),
            "fn3" => Some(3),
            "fn4" => Some(4),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        use Function::*;
        match self {
            Sin => "sin",
            Sinh => "sinh",
            Cos => "cos",
            Cosh => "cosh",
            Sqr => "sqr",
            Log => "log",
            Exp => "exp",
            Abs => "abs",
            Conj => "conj",
            Real => "real",
            Imag => "imag",
            Flip => "flip",
            Tan => "tan",
            Tanh => "tanh",
            Cotan => "cotan",
            Cotanh => "cotanh",
            Cosxx => "cosxx",
            Srand => "srand",
            Asin => "asin",
            Asinh => "asinh",
            Acos => "acos",
            Acosh => "acosh",
            Atan => "atan",
            Atanh => "atanh",
            Sqrt => "sqrt",
            Cabs => "cabs",
            Floor => "floor",
            Ceil => "ceil",
            Trunc => "trunc",
            Round => "round",
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Function::from_name("cotanh"), Some(Function::Cotanh));
        assert_eq!(Function::from_name("fn1"), None);
        assert_eq!(Function::from_name("pickles"), None);
        for f in Function::ALL.iter() {
            assert_eq!(Function::from_name(f.name()), Some(*f));
        }
    }
}
