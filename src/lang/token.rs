pub use super::function::Function;
pub use super::ident::Predefined;
use super::{Column, ErrorCode};

/// ## Classified token
///
/// The text is lower case with all whitespace removed, exactly as it
/// will appear in normalized formula text. The column is the byte range
/// the token spans in the source, whitespace and line continuations
/// included.

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: Kind,
    pub text: String,
    pub column: Column,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    OpenParen,
    CloseParen,
    ParamVariable(Predefined),
    PredefinedVariable(Predefined),
    UserVariable,
    RealConstant(f64),
    ComplexConstant(f64, f64),
    Function(Function),
    ParamFunction(u8),
    Flow(Flow),
    Operator(Operator),
    EndOfFormula,
    Invalid(LexError),
}

impl Token {
    pub fn new(kind: Kind, text: String, column: Column) -> Token {
        Token { kind, text, column }
    }

    pub fn is_end_of_statement(&self) -> bool {
        matches!(
            self.kind,
            Kind::Operator(Operator::Comma) | Kind::Operator(Operator::Colon)
        )
    }

    pub fn is_end_of_formula(&self) -> bool {
        self.kind == Kind::EndOfFormula
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, Kind::Invalid(_))
    }

    /// Real and imaginary part of a constant token.
    pub fn constant(&self) -> Option<(f64, f64)> {
        match self.kind {
            Kind::RealConstant(re) => Some((re, 0.0)),
            Kind::ComplexConstant(re, im) => Some((re, im)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    If,
    ElseIf,
    Else,
    EndIf,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Flow::*;
        match self {
            If => write!(f, "if"),
            ElseIf => write!(f, "elseif"),
            Else => write!(f, "else"),
            EndIf => write!(f, "endif"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Comma,
    Colon,
    NotEqual,
    Assign,
    Equal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Modulus,
    Or,
    And,
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn is_binary(self) -> bool {
        use Operator::*;
        match self {
            NotEqual | Equal | Less | LessEqual | Greater | GreaterEqual | Or | And | Plus
            | Multiply | Divide | Power => true,
            Comma | Colon | Assign | Modulus | Minus => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            NotEqual => write!(f, "!="),
            Assign => write!(f, "="),
            Equal => write!(f, "=="),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Modulus => write!(f, "|"),
            Or => write!(f, "||"),
            And => write!(f, "&&"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Power => write!(f, "^"),
        }
    }
}

/// Why the lexer could not produce a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexError {
    EndOfFile,
    IllegalCharacter,
    IllegalVariableName,
    TokenTooLong,
    FuncUsedAsVar,
    JumpMissingBoolean,
    JumpWithIllegalChar,
    UndefinedFunction,
    IllegalOperator,
    IllFormedConstant,
}

impl LexError {
    pub fn code(self) -> ErrorCode {
        use LexError::*;
        match self {
            EndOfFile => ErrorCode::UnexpectedEof,
            IllegalCharacter => ErrorCode::IllegalCharacter,
            IllegalVariableName => ErrorCode::IllegalVariableName,
            TokenTooLong => ErrorCode::TokenTooLong,
            FuncUsedAsVar => ErrorCode::FuncUsedAsVar,
            JumpMissingBoolean => ErrorCode::JumpNeedsBoolean,
            JumpWithIllegalChar => ErrorCode::NoCharAfterThisJump,
            UndefinedFunction => ErrorCode::UndefinedFunction,
            IllegalOperator => ErrorCode::UndefinedOperator,
            IllFormedConstant => ErrorCode::IllFormedConstant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_text() {
        assert_eq!(Operator::NotEqual.to_string(), "!=");
        assert_eq!(Operator::Modulus.to_string(), "|");
        assert!(!Operator::Minus.is_binary());
        assert!(Operator::Power.is_binary());
    }

    #[test]
    fn test_lex_error_code() {
        assert_eq!(LexError::IllegalOperator.code(), ErrorCode::UndefinedOperator);
        assert_eq!(LexError::EndOfFile.code(), ErrorCode::UnexpectedEof);
    }
}
