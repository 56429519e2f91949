use crate::lang::{Function, Limits};

/// ## Numeric backend
///
/// Exactly one is active per evaluation context. A compiled program runs
/// unchanged under any of them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// IEEE double precision.
    Double,
    /// 32-bit integers with `bitshift` fraction bits.
    Fixed { bitshift: u32 },
    /// Complex numbers with `precision` mantissa bits.
    Arbitrary { precision: u32 },
}

impl Backend {
    pub const DEFAULT_BITSHIFT: u32 = 16;
    pub const DEFAULT_PRECISION: u32 = 128;
    pub const MIN_BITSHIFT: u32 = 1;
    pub const MAX_BITSHIFT: u32 = 30;
    pub const MIN_PRECISION: u32 = 2;

    pub fn fixed() -> Backend {
        Backend::Fixed {
            bitshift: Backend::DEFAULT_BITSHIFT,
        }
    }

    pub fn arbitrary() -> Backend {
        Backend::Arbitrary {
            precision: Backend::DEFAULT_PRECISION,
        }
    }

    /// Fraction bits used when drawing random numbers.
    pub fn bitshift(self) -> u32 {
        match self {
            Backend::Fixed { bitshift } => {
                bitshift.max(Backend::MIN_BITSHIFT).min(Backend::MAX_BITSHIFT)
            }
            _ => Backend::DEFAULT_BITSHIFT,
        }
    }

    /// Parses `double`, `fixed`, `fixed:BITS`, `arbitrary` or
    /// `arbitrary:PRECISION`.
    pub fn from_name(s: &str) -> Option<Backend> {
        let mut parts = s.splitn(2, ':');
        let name = parts.next()?.to_ascii_lowercase();
        let arg = match parts.next() {
            Some(n) => Some(n.parse::<u32>().ok()?),
            None => None,
        };
        match (name.as_str(), arg) {
            ("double", None) => Some(Backend::Double),
            ("fixed", None) => Some(Backend::fixed()),
            ("fixed", Some(bitshift))
                if bitshift >= Backend::MIN_BITSHIFT && bitshift <= Backend::MAX_BITSHIFT =>
            {
                Some(Backend::Fixed { bitshift })
            }
            ("arbitrary", None) => Some(Backend::arbitrary()),
            ("arbitrary", Some(precision)) if precision >= Backend::MIN_PRECISION => {
                Some(Backend::Arbitrary { precision })
            }
            _ => None,
        }
    }
}

impl Default for Backend {
    fn default() -> Backend {
        Backend::Double
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Backend::Double => write!(f, "double"),
            Backend::Fixed { bitshift } => write!(f, "fixed:{}", bitshift),
            Backend::Arbitrary { precision } => write!(f, "arbitrary:{}", precision),
        }
    }
}

/// Compile-time configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: Backend,
    /// Bound to `fn1`..`fn4`.
    pub functions: [Function; 4],
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            backend: Backend::default(),
            functions: Function::PARAM_DEFAULTS,
            limits: Limits::default(),
        }
    }
}

/// Corners of the complex plane shown on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl View {
    pub fn center(&self) -> (f64, f64) {
        ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Magnification and the x-magnification factor.
    pub fn magxmag(&self) -> (f64, f64) {
        let width = self.xmax - self.xmin;
        let height = self.ymax - self.ymin;
        if width == 0.0 || height == 0.0 {
            return (0.0, 0.0);
        }
        (2.0 / height, height / (0.75 * width))
    }

    /// The view is always axis aligned.
    pub fn rotskew(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

impl Default for View {
    fn default() -> View {
        View {
            xmin: -2.5,
            xmax: 1.5,
            ymin: -1.5,
            ymax: 1.5,
        }
    }
}

/// ## Values supplied by the caller
///
/// Read when a program is bound and again for every pixel.

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// `p1` is params 0 and 1, `p2` is 2 and 3, and so on through `p5`.
    pub params: [f64; 10],
    pub ismand: bool,
    pub xdots: usize,
    pub ydots: usize,
    pub maxit: u32,
    pub view: View,
    /// Seed for `rand`. The clock is used when not set.
    pub seed: Option<u64>,
}

impl Params {
    /// `n` is 1 through 5.
    pub fn p(&self, n: usize) -> Option<(f64, f64)> {
        if (1..=5).contains(&n) {
            Some((self.params[n * 2 - 2], self.params[n * 2 - 1]))
        } else {
            None
        }
    }

    pub fn set_p(&mut self, n: usize, value: (f64, f64)) -> bool {
        if (1..=5).contains(&n) {
            self.params[n * 2 - 2] = value.0;
            self.params[n * 2 - 1] = value.1;
            true
        } else {
            false
        }
    }

    /// Complex plane coordinates of a screen position.
    pub fn pixel(&self, col: usize, row: usize) -> (f64, f64) {
        let v = &self.view;
        let dx = if self.xdots > 1 {
            (v.xmax - v.xmin) / (self.xdots - 1) as f64
        } else {
            0.0
        };
        let dy = if self.ydots > 1 {
            (v.ymax - v.ymin) / (self.ydots - 1) as f64
        } else {
            0.0
        };
        (v.xmin + col as f64 * dx, v.ymax - row as f64 * dy)
    }
}

impl Default for Params {
    fn default() -> Params {
        Params {
            params: [0.0; 10],
            ismand: true,
            xdots: 640,
            ydots: 480,
            maxit: 150,
            view: View::default(),
            seed: None,
        }
    }
}
