use super::lex::Lexer;
use super::token::*;
use super::{Error, ErrorList, Header, Limits, Prescan, Symmetry};
use super::prescan::prescan;
use tracing::{debug, warn};

/// ## Normalized formula
///
/// The text is every token's text run together with one `,` or `:`
/// between statements. Two sources that differ only in layout, comments
/// or case normalize to the same text.

#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub name: String,
    pub symmetry: Symmetry,
    pub text: String,
    pub prescan: Prescan,
    pub warning: Option<Error>,
}

impl Formula {
    /// Normalizes a library entry `name(symmetry) { body }` which begins at
    /// `offset` in the full source.
    pub fn from_entry(entry: &str, offset: usize, limits: &Limits) -> Result<Formula, ErrorList> {
        let header = Header::parse(entry, limits).map_err(|e| ErrorList::from(e.shifted(offset)))?;
        if let Some(warning) = &header.warning {
            warn!(formula = %header.name, "{}", warning);
        }
        let start = offset + header.body_start;
        let tokens: Vec<Token> = Lexer::bounded(&entry[header.body_start..], start).collect();
        let (text, prescan) = normalize(&tokens, start, limits)?;
        Ok(Formula {
            name: header.name,
            symmetry: header.symmetry,
            text,
            prescan,
            warning: header.warning.map(|w| w.shifted(offset)),
        })
    }

    /// Normalizes a bare formula body. It ends at `}` or the end of `body`.
    pub fn from_body(body: &str, limits: &Limits) -> Result<Formula, ErrorList> {
        let tokens: Vec<Token> = Lexer::body(body).collect();
        let (text, prescan) = normalize(&tokens, 0, limits)?;
        Ok(Formula {
            name: String::new(),
            symmetry: Symmetry::NoSym,
            text,
            prescan,
            warning: None,
        })
    }
}

/// Validates the tokens of one formula and serializes them.
pub fn normalize(
    tokens: &[Token],
    start: usize,
    limits: &Limits,
) -> Result<(String, Prescan), ErrorList> {
    let prescan = prescan(tokens, start, limits)?;
    let mut iter = tokens
        .iter()
        .skip_while(|t| t.kind == Kind::Operator(Operator::Comma))
        .peekable();
    match iter.peek() {
        None => return Err(error!(NoExecutableInstructions, start).into()),
        Some(t) if t.is_end_of_formula() => {
            return Err(error!(NoExecutableInstructions, start, ..&t.column).into())
        }
        _ => {}
    }
    let mut text = String::new();
    for token in iter.take_while(|t| !t.is_end_of_formula()) {
        text.push_str(&token.text);
        if text.len() > limits.max_chars {
            return Err(error!(FormulaTooLarge, start, ..&token.column).into());
        }
    }
    debug!(chars = text.len(), text = %text, "normalized");
    Ok((text, prescan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_layout_independent() {
        let limits = Limits::default();
        let a = Formula::from_body("z = Pixel :\n  z = z*z + P1 ; square\n |z| <= 4\n", &limits);
        let b = Formula::from_body("z=pixel:z=z * z+p1,\\\n|z|<=4", &limits);
        assert_eq!(a.unwrap().text, "z=pixel:z=z*z+p1,|z|<=4");
        assert_eq!(b.unwrap().text, "z=pixel:z=z*z+p1,|z|<=4");
    }

    #[test]
    fn test_no_executable_instructions() {
        let codes = Formula::from_body("\n\n,,\n", &Limits::default())
            .err()
            .map(|e| e.codes());
        assert_eq!(codes, Some(vec![ErrorCode::NoExecutableInstructions]));
    }

    #[test]
    fn test_too_large() {
        let limits = Limits {
            max_chars: 8,
            ..Limits::default()
        };
        let codes = Formula::from_body("z=z*z+pixel", &limits).err().map(|e| e.codes());
        assert_eq!(codes, Some(vec![ErrorCode::FormulaTooLarge]));
    }

    #[test]
    fn test_entry() {
        let src = "; comment\nJulia(ORIGIN) {\n z = pixel:\n z = z*z + p1\n |z| <= 4\n}\n";
        let f = Formula::from_entry(&src[10..], 10, &Limits::default()).unwrap();
        assert_eq!(f.name, "Julia");
        assert_eq!(f.symmetry, Symmetry::Origin);
        assert_eq!(f.text, "z=pixel:z=z*z+p1,|z|<=4");
    }
}
