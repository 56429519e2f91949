// Used in both Token and the slot table

/// ## Predefined variables
///
/// The discriminant is the slot index each one occupies in every
/// compiled program.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predefined {
    Pixel = 0,
    P1 = 1,
    P2 = 2,
    Z = 3,
    LastSqr = 4,
    Pi = 5,
    E = 6,
    Rand = 7,
    P3 = 8,
    WhiteSq = 9,
    ScrnPix = 10,
    ScrnMax = 11,
    MaxIt = 12,
    IsMand = 13,
    Center = 14,
    MagXMag = 15,
    RotSkew = 16,
    P4 = 17,
    P5 = 18,
}

impl Predefined {
    pub const ALL: [Predefined; 19] = [
        Predefined::Pixel,
        Predefined::P1,
        Predefined::P2,
        Predefined::Z,
        Predefined::LastSqr,
        Predefined::Pi,
        Predefined::E,
        Predefined::Rand,
        Predefined::P3,
        Predefined::WhiteSq,
        Predefined::ScrnPix,
        Predefined::ScrnMax,
        Predefined::MaxIt,
        Predefined::IsMand,
        Predefined::Center,
        Predefined::MagXMag,
        Predefined::RotSkew,
        Predefined::P4,
        Predefined::P5,
    ];

    pub fn from_name(s: &str) -> Option<Predefined> {
        Predefined::ALL.iter().copied().find(|p| p.name() == s)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Parameters are supplied by the caller rather than by the engine.
    pub fn is_param(self) -> bool {
        use Predefined::*;
        matches!(self, P1 | P2 | P3 | P4 | P5 | IsMand)
    }

    pub fn name(self) -> &'static str {
        use Predefined::*;
        match self {
            Pixel => "pixel",
            P1 => "p1",
            P2 => "p2",
            Z => "z",
            LastSqr => "lastsqr",
            Pi => "pi",
            E => "e",
            Rand => "rand",
            P3 => "p3",
            WhiteSq => "whitesq",
            ScrnPix => "scrnpix",
            ScrnMax => "scrnmax",
            MaxIt => "maxit",
            IsMand => "ismand",
            Center => "center",
            MagXMag => "magxmag",
            RotSkew => "rotskew",
            P4 => "p4",
            P5 => "p5",
        }
    }
}

impl std::fmt::Display for Predefined {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
