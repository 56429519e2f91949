use super::Column;

/// ## Formula error
///
/// Every compile-time diagnostic is one of these. The statement is the
/// source offset where the offending statement begins and the column is
/// the byte range of the offending token, both counted from the start of
/// the text handed to the compiler.

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    statement: Option<usize>,
    column: Column,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $stmt:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_statement($stmt)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $stmt:expr, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_statement($stmt)
            .in_column($col)
    };
    ($err:ident, $stmt:expr, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_statement($stmt)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            statement: None,
            column: 0..0,
            message: "",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn statement(&self) -> Option<usize> {
        self.statement
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn in_statement(&self, statement: usize) -> Error {
        Error {
            code: self.code,
            statement: Some(statement),
            column: self.column.clone(),
            message: self.message,
        }
    }

    pub fn in_column(&self, column: &Column) -> Error {
        debug_assert_eq!(self.column, 0..0);
        Error {
            code: self.code,
            statement: self.statement,
            column: column.clone(),
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            statement: self.statement,
            column: self.column.clone(),
            message,
        }
    }

    /// Moves every position by `offset`. Used when a body was scanned
    /// out of a larger library text.
    pub fn shifted(&self, offset: usize) -> Error {
        Error {
            code: self.code,
            statement: self.statement.map(|s| s + offset),
            column: (self.column.start + offset)..(self.column.end + offset),
            message: self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ShouldBeArgument = 0,
    ShouldBeOperator = 1,
    NeedMatchingOpenParen = 2,
    NeedMoreCloseParens = 3,
    UndefinedOperator = 4,
    UndefinedFunction = 5,
    TableOverflow = 6,
    NoMatchRightParen = 7,
    NoLeftBracketFirstLine = 8,
    UnexpectedEof = 9,
    InvalidSymmetry = 10,
    FormulaTooLarge = 11,
    CouldNotOpenFile = 13,
    JumpNotFirst = 14,
    NoCharAfterThisJump = 15,
    JumpNeedsBoolean = 16,
    EndifRequiredAfterElse = 17,
    EndifWithNoIf = 18,
    MisplacedElseOrElseif = 19,
    UnmatchedIfInInit = 20,
    IfWithNoEndif = 21,
    ErrorInParsingJumps = 22,
    TooManyJumps = 23,
    FormulaNameTooLarge = 24,
    IllegalAssignment = 25,
    IllegalVariableName = 26,
    IllFormedConstant = 27,
    IllegalCharacter = 28,
    NestingTooDeep = 29,
    UnmatchedModulus = 30,
    FuncUsedAsVar = 31,
    NoNegAfterExponent = 32,
    TokenTooLong = 33,
    SecondColon = 34,
    NoExecutableInstructions = 35,
    FormulaNotFound = 36,
    InternalError = 51,
    Overflow = 60,
}

impl ErrorCode {
    pub fn number(self) -> u16 {
        self as u16
    }

    fn phrase(self) -> &'static str {
        use ErrorCode::*;
        match self {
            ShouldBeArgument => "SHOULD BE AN ARGUMENT",
            ShouldBeOperator => "SHOULD BE AN OPERATOR",
            NeedMatchingOpenParen => "')' NEEDS A MATCHING '('",
            NeedMoreCloseParens => "NEED MORE ')'",
            UndefinedOperator => "UNDEFINED OPERATOR",
            UndefinedFunction => "UNDEFINED FUNCTION",
            TableOverflow => "TABLE OVERFLOW",
            NoMatchRightParen => "DIDN'T FIND MATCHING ')' IN SYMMETRY DECLARATION",
            NoLeftBracketFirstLine => "NO '{' FOUND ON FIRST LINE",
            UnexpectedEof => "UNEXPECTED EOF",
            InvalidSymmetry => "SYMMETRY IS INVALID, WILL USE NOSYM",
            FormulaTooLarge => "FORMULA IS TOO LARGE",
            CouldNotOpenFile => "COULD NOT OPEN FILE WHERE FORMULA LOCATED",
            JumpNotFirst => "NO CHARACTERS MAY PRECEDE JUMP INSTRUCTION",
            NoCharAfterThisJump => "NO CHARACTERS MAY FOLLOW THIS JUMP INSTRUCTION",
            JumpNeedsBoolean => "JUMP INSTRUCTION MISSING REQUIRED (BOOLEAN ARGUMENT)",
            EndifRequiredAfterElse => "NEXT JUMP AFTER \"ELSE\" MUST BE \"ENDIF\"",
            EndifWithNoIf => "\"ENDIF\" HAS NO MATCHING \"IF\"",
            MisplacedElseOrElseif => "MISPLACED \"ELSE\" OR \"ELSEIF()\"",
            UnmatchedIfInInit => "\"IF ()\" IN INITIALIZATION HAS NO MATCHING \"ENDIF\"",
            IfWithNoEndif => "\"IF ()\" HAS NO MATCHING \"ENDIF\"",
            ErrorInParsingJumps => "ERROR IN PARSING JUMP STATEMENTS",
            TooManyJumps => "FORMULA HAS TOO MANY JUMP COMMANDS",
            FormulaNameTooLarge => "FORMULA NAME HAS TOO MANY CHARACTERS",
            IllegalAssignment => "ONLY VARIABLES ARE ALLOWED TO LEFT OF ASSIGNMENT",
            IllegalVariableName => "ILLEGAL VARIABLE NAME",
            IllFormedConstant => "INVALID CONSTANT EXPRESSION",
            IllegalCharacter => "THIS CHARACTER NOT SUPPORTED BY PARSER",
            NestingTooDeep => "NESTING OF PARENTHESES EXCEEDS MAXIMUM DEPTH",
            UnmatchedModulus => "UNMATCHED MODULUS OPERATOR \"|\" IN THIS EXPRESSION",
            FuncUsedAsVar => "CAN'T USE FUNCTION NAME AS VARIABLE",
            NoNegAfterExponent => "NEGATIVE EXPONENT MUST BE ENCLOSED IN PARENS",
            TokenTooLong => "VARIABLE OR CONSTANT EXCEEDS 32 CHARACTERS",
            SecondColon => "ONLY ONE \":\" PERMITTED IN A FORMULA",
            NoExecutableInstructions => "NO EXECUTABLE INSTRUCTIONS",
            FormulaNotFound => "FORMULA NOT FOUND",
            InternalError => "INTERNAL ERROR",
            Overflow => "OVERFLOW",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} IN{}", self.code, suffix)
        }
    }
}

impl std::error::Error for Error {}

/// ## Collected diagnostics
///
/// At most three errors are kept, and never two for the same statement.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<Error>,
}

impl ErrorList {
    pub const MAX_ERRORS: usize = 3;

    pub fn new() -> ErrorList {
        ErrorList::default()
    }

    /// Records `error` unless the previous one came from the same statement.
    /// Returns false once the list is full.
    pub fn record(&mut self, error: Error) -> bool {
        if self.is_full() {
            return false;
        }
        let same_statement = match self.errors.last() {
            Some(last) => last.statement.is_some() && last.statement == error.statement,
            None => false,
        };
        if !same_statement {
            self.errors.push(error);
        }
        !self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.errors.len() >= ErrorList::MAX_ERRORS
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(Error::code).collect()
    }

    pub fn shifted(&self, offset: usize) -> ErrorList {
        ErrorList {
            errors: self.errors.iter().map(|e| e.shifted(offset)).collect(),
        }
    }

    /// Renders every error with its line number, the text of the statement
    /// it belongs to and a caret under the offending token.
    pub fn report(&self, source: &str) -> String {
        let mut s = String::new();
        for error in &self.errors {
            let at = error.column.start.min(source.len());
            let line = source[..at].matches('\n').count() + 1;
            s.push_str(&format!(
                "Error({}) at line {}:  {}\n",
                error.code.number(),
                line,
                error.code
            ));
            let start = error.statement.unwrap_or(at).min(at);
            let start = match source[..start].rfind('\n') {
                Some(nl) if error.statement.is_none() => nl + 1,
                _ => start,
            };
            let end = source[at..]
                .find('\n')
                .map(|n| n + at)
                .unwrap_or_else(|| source.len());
            let text: String = source[start..end]
                .chars()
                .take(74)
                .map(|c| if c == '\t' { ' ' } else { c })
                .collect();
            let text = match text.rfind('\n') {
                Some(nl) => text[nl + 1..].to_string(),
                None => text,
            };
            let caret_at = source[start..at]
                .rsplit('\n')
                .next()
                .map(|t| t.chars().count())
                .unwrap_or(0);
            s.push_str(&format!("  {}\n", text));
            s.push_str(&format!("  {:>w$}\n", "^", w = caret_at + 1));
        }
        s
    }
}

impl From<Error> for ErrorList {
    fn from(error: Error) -> ErrorList {
        ErrorList {
            errors: vec![error],
        }
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;
    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl std::fmt::Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = error!(ShouldBeArgument, 0, ..&(4..5));
        assert_eq!(e.to_string(), "SHOULD BE AN ARGUMENT IN (4..5)");
        let e = error!(InternalError; "UNDERFLOW");
        assert_eq!(e.to_string(), "INTERNAL ERROR IN; UNDERFLOW");
    }

    #[test]
    fn test_one_per_statement() {
        let mut list = ErrorList::new();
        assert!(list.record(error!(ShouldBeOperator, 0, ..&(1..2))));
        assert!(list.record(error!(ShouldBeArgument, 0, ..&(3..4))));
        assert_eq!(list.len(), 1);
        assert!(list.record(error!(ShouldBeArgument, 5, ..&(6..7))));
        assert!(!list.record(error!(SecondColon, 9, ..&(9..10))));
        assert!(!list.record(error!(SecondColon, 12, ..&(12..13))));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_report() {
        let src = "z=pixel:\nz=z*+p1";
        let list = ErrorList::from(error!(ShouldBeArgument, 9, ..&(13..14)));
        let report = list.report(src);
        assert_eq!(
            report,
            "Error(0) at line 2:  SHOULD BE AN ARGUMENT\n  z=z*+p1\n      ^\n"
        );
    }
}
