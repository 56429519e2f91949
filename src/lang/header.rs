use super::{Column, Error, Limits};

type Result<T> = std::result::Result<T, Error>;

/// Symmetry a formula declares. The renderer uses it to mirror pixels
/// instead of computing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    NoSym = 0,
    XAxisNoParm = -1,
    XAxis = 1,
    YAxisNoParm = -2,
    YAxis = 2,
    XYAxisNoParm = -3,
    XYAxis = 3,
    OriginNoParm = -4,
    Origin = 4,
    PiSymNoParm = -5,
    PiSym = 5,
    XAxisNoImag = -6,
    XAxisNoReal = 6,
    NoPlot = 99,
}

impl Symmetry {
    pub fn from_name(s: &str) -> Option<Symmetry> {
        use Symmetry::*;
        match s.to_ascii_uppercase().as_str() {
            "NOSYM" => Some(NoSym),
            "XAXIS_NOPARM" => Some(XAxisNoParm),
            "XAXIS" => Some(XAxis),
            "YAXIS_NOPARM" => Some(YAxisNoParm),
            "YAXIS" => Some(YAxis),
            "XYAXIS_NOPARM" => Some(XYAxisNoParm),
            "XYAXIS" => Some(XYAxis),
            "ORIGIN_NOPARM" => Some(OriginNoParm),
            "ORIGIN" => Some(Origin),
            "PI_SYM_NOPARM" => Some(PiSymNoParm),
            "PI_SYM" => Some(PiSym),
            "XAXIS_NOIMAG" => Some(XAxisNoImag),
            "XAXIS_NOREAL" => Some(XAxisNoReal),
            "NOPLOT" => Some(NoPlot),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }
}

impl Default for Symmetry {
    fn default() -> Symmetry {
        Symmetry::NoSym
    }
}

/// ## Formula entry header
///
/// `name(symmetry) {` up to and including the open brace.

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: String,
    pub symmetry: Symmetry,
    /// Offset of the first character after `{`.
    pub body_start: usize,
    /// Set when the symmetry was not recognized.
    pub warning: Option<Error>,
}

impl Header {
    /// Reads the header at the start of `s`. Offsets in the result and in
    /// errors are relative to `s`.
    pub fn parse(s: &str, limits: &Limits) -> Result<Header> {
        let mut chars = s.char_indices().peekable();
        let mut name = String::new();
        let mut name_end = 0;
        while let Some(&(index, ch)) = chars.peek() {
            if ch == '(' || ch == '{' || ch == ' ' || ch == '\t' || ch == '\n' || ch == '\r' {
                break;
            }
            chars.next();
            name.push(ch);
            name_end = index + ch.len_utf8();
        }
        let name_column: Column = 0..name_end;
        if name.chars().count() > limits.max_name_len {
            return Err(error!(FormulaNameTooLarge, 0, ..&name_column));
        }
        let mut symmetry = Symmetry::NoSym;
        let mut warning = None;
        loop {
            let (index, ch) = match chars.next() {
                Some(next) => next,
                None => return Err(error!(UnexpectedEof, 0, ..&(s.len()..s.len()))),
            };
            match ch {
                '{' => {
                    return Ok(Header {
                        name,
                        symmetry,
                        body_start: index + 1,
                        warning,
                    })
                }
                '\n' => return Err(error!(NoLeftBracketFirstLine, 0, ..&(index..index + 1))),
                '(' => {
                    let mut sym = String::new();
                    let start = index + 1;
                    let mut end = start;
                    loop {
                        match chars.next() {
                            Some((_, ')')) => break,
                            Some((index, '{')) | Some((index, '\n')) => {
                                return Err(error!(NoMatchRightParen, 0, ..&(index..index + 1)));
                            }
                            Some((index, ch)) => {
                                if !ch.is_whitespace() {
                                    sym.push(ch);
                                }
                                end = index + ch.len_utf8();
                            }
                            None => {
                                return Err(error!(UnexpectedEof, 0, ..&(s.len()..s.len())))
                            }
                        }
                    }
                    match Symmetry::from_name(&sym) {
                        Some(sym) => symmetry = sym,
                        None => warning = Some(error!(InvalidSymmetry, 0, ..&(start..end))),
                    }
                }
                _ => {}
            }
        }
    }
}
