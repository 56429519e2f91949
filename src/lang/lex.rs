use super::token::*;
use std::iter::Peekable;

/// Longest identifier or constant, in characters.
pub const MAX_TOKEN_LEN: usize = 32;

/// Lexes a formula body which ends at `}` or at the end of the text.
pub fn lex(s: &str) -> Vec<Token> {
    Lexer::body(s).collect()
}

/// ## Significant characters of formula text
///
/// Spaces, tabs and carriage returns vanish. A `;` comments out the rest
/// of the line. A `\` joins the next line onto this one. Letters come out
/// lower case. Each character carries its byte offset in the source.

#[derive(Clone)]
struct FormulaChars<'a> {
    chars: std::str::CharIndices<'a>,
    offset: usize,
}

impl<'a> Iterator for FormulaChars<'a> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        let mut linewrap = false;
        loop {
            let (index, ch) = self.chars.next()?;
            match ch {
                '\r' | ' ' | '\t' => {}
                '\\' => linewrap = true,
                '\u{1a}' => return None,
                ';' | '\n' => {
                    let index = if ch == ';' {
                        loop {
                            match self.chars.next() {
                                Some((index, '\n')) => break index,
                                Some((_, '\u{1a}')) | None => return None,
                                Some(_) => {}
                            }
                        }
                    } else {
                        index
                    };
                    if !linewrap {
                        return Some((self.offset + index, '\n'));
                    }
                    linewrap = false;
                }
                _ => return Some((self.offset + index, ch.to_ascii_lowercase())),
            }
        }
    }
}

fn is_statement_end(ch: char) -> bool {
    ch == ',' || ch == '\n' || ch == ':'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

enum ComplexScan {
    Constant(Token),
    ThirdPart(Token),
    NotComplex,
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut Peekable<FormulaChars<'a>>;

    fn peek_char(&mut self) -> Option<char> {
        self.chars().peek().map(|&(_, ch)| ch)
    }

    fn next_is(&mut self, want: char) -> Option<usize> {
        match self.chars().peek() {
            Some(&(index, ch)) if ch == want => {
                self.chars().next();
                Some(index + 1)
            }
            _ => None,
        }
    }

    fn constant(&mut self, start: usize, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        let mut end = start + first.len_utf8();
        let mut getting_base = true;
        let mut decimal = first == '.';
        let invalid =
            |s: String, end: usize| Token::new(Kind::Invalid(LexError::IllFormedConstant), s, start..end);
        loop {
            let (index, ch) = match self.chars().peek() {
                Some(&pk) => pk,
                None => break,
            };
            let last = s.chars().last().unwrap_or(first);
            if ch.is_ascii_digit() {
                self.chars().next();
                s.push(ch);
                end = index + 1;
            } else if ch == '.' {
                self.chars().next();
                s.push(ch);
                end = index + 1;
                if decimal || !getting_base {
                    return invalid(s, end);
                }
                decimal = true;
            } else if ch == 'e'
                && getting_base
                && (last.is_ascii_digit() || (last == '.' && s.len() > 1))
            {
                self.chars().next();
                s.push(ch);
                end = index + 1;
                getting_base = false;
                if let Some(&(index, sign)) = self.chars().peek() {
                    if sign == '+' || sign == '-' {
                        self.chars().next();
                        s.push(sign);
                        end = index + 1;
                    }
                }
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                self.chars().next();
                s.push(ch);
                end = index + 1;
                return invalid(s, end);
            } else {
                break;
            }
            if s.len() > MAX_TOKEN_LEN {
                while let Some(&(index, ch)) = self.chars().peek() {
                    if !is_name_char(ch) && ch != '.' {
                        break;
                    }
                    self.chars().next();
                    s.push(ch);
                    end = index + 1;
                }
                return Token::new(Kind::Invalid(LexError::TokenTooLong), s, start..end);
            }
        }
        let last = s.chars().last().unwrap_or(first);
        if last == 'e' || last == '+' || last == '-' || s == "." {
            return invalid(s, end);
        }
        match s.parse::<f64>() {
            Ok(value) => Token::new(Kind::RealConstant(value), s, start..end),
            Err(_) => invalid(s, end),
        }
    }

    fn alphabetic(&mut self, start: usize, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        let mut end = start + 1;
        while let Some(&(index, ch)) = self.chars().peek() {
            if is_name_char(ch) {
                self.chars().next();
                s.push(ch);
                end = index + 1;
            } else if ch == '.' {
                self.chars().next();
                s.push(ch);
                end = index + 1;
                return Token::new(Kind::Invalid(LexError::IllegalVariableName), s, start..end);
            } else {
                break;
            }
        }
        let column = start..end;
        if s.len() > MAX_TOKEN_LEN {
            return Token::new(Kind::Invalid(LexError::TokenTooLong), s, column);
        }
        let next = self.peek_char();
        let kind = if next == Some('(') {
            if let Some(function) = Function::from_name(&s) {
                Kind::Function(function)
            } else if let Some(n) = Function::param_index(&s) {
                Kind::ParamFunction(n)
            } else {
                match s.as_str() {
                    "if" => Kind::Flow(Flow::If),
                    "elseif" => Kind::Flow(Flow::ElseIf),
                    "else" | "endif" => Kind::Invalid(LexError::JumpWithIllegalChar),
                    _ => Kind::Invalid(LexError::UndefinedFunction),
                }
            }
        } else if Function::from_name(&s).is_some() || Function::param_index(&s).is_some() {
            Kind::Invalid(LexError::FuncUsedAsVar)
        } else {
            match s.as_str() {
                "if" | "elseif" => Kind::Invalid(LexError::JumpMissingBoolean),
                "else" | "endif" => match next {
                    Some(ch) if !is_statement_end(ch) && ch != '}' => {
                        Kind::Invalid(LexError::JumpWithIllegalChar)
                    }
                    _ if s == "else" => Kind::Flow(Flow::Else),
                    _ => Kind::Flow(Flow::EndIf),
                },
                _ => match Predefined::from_name(&s) {
                    Some(p) if p.is_param() => Kind::ParamVariable(p),
                    Some(p) => Kind::PredefinedVariable(p),
                    None => Kind::UserVariable,
                },
            }
        };
        Token::new(kind, s, column)
    }

    fn operator(&mut self, start: usize, first: char) -> Token {
        use Operator::*;
        let one = |op: Operator| Token::new(Kind::Operator(op), op.to_string(), start..start + 1);
        let two = |op: Operator, end: usize| Token::new(Kind::Operator(op), op.to_string(), start..end);
        match first {
            '<' => match self.next_is('=') {
                Some(end) => two(LessEqual, end),
                None => one(Less),
            },
            '>' => match self.next_is('=') {
                Some(end) => two(GreaterEqual, end),
                None => one(Greater),
            },
            '=' => match self.next_is('=') {
                Some(end) => two(Equal, end),
                None => one(Assign),
            },
            '!' => match self.next_is('=') {
                Some(end) => two(NotEqual, end),
                None => Token::new(
                    Kind::Invalid(LexError::IllegalOperator),
                    "!".to_string(),
                    start..start + 1,
                ),
            },
            '&' => match self.next_is('&') {
                Some(end) => two(And, end),
                None => Token::new(
                    Kind::Invalid(LexError::IllegalOperator),
                    "&".to_string(),
                    start..start + 1,
                ),
            },
            '|' => match self.next_is('|') {
                Some(end) => two(Or, end),
                None => one(Modulus),
            },
            '+' => one(Plus),
            '-' => one(Minus),
            '*' => one(Multiply),
            '/' => one(Divide),
            _ => one(Power),
        }
    }

    /// Tries to read `re,im)` after an open parenthesis.
    fn complex(&mut self, start: usize) -> ComplexScan {
        let mut s = String::from("(");
        let mut value = [0.0; 2];
        for part in 0..2 {
            let (index, mut ch) = match self.chars().next() {
                Some(next) => next,
                None => return ComplexScan::NotComplex,
            };
            let mut index = index;
            let mut sign = 1.0;
            if ch == '-' {
                sign = -1.0;
                s.push('-');
                match self.chars().next() {
                    Some((i, c)) => {
                        index = i;
                        ch = c;
                    }
                    None => return ComplexScan::NotComplex,
                }
            }
            if !ch.is_ascii_digit() && ch != '.' {
                return ComplexScan::NotComplex;
            }
            let token = self.constant(index, ch);
            match token.kind {
                Kind::RealConstant(v) => value[part] = v * sign,
                _ => return ComplexScan::NotComplex,
            }
            s.push_str(&token.text);
            let (index, ch) = match self.chars().next() {
                Some(next) => next,
                None => return ComplexScan::NotComplex,
            };
            if part == 0 {
                if ch != ',' {
                    return ComplexScan::NotComplex;
                }
                s.push(',');
            } else if ch == ',' {
                s.push(',');
                while let Some(&(_, ch)) = self.chars().peek() {
                    if !ch.is_ascii_digit() && !".,+-e".contains(ch) {
                        break;
                    }
                    self.chars().next();
                    s.push(ch);
                }
                if self.next_is(')').is_some() {
                    s.push(')');
                }
                return ComplexScan::ThirdPart(Token::new(
                    Kind::Invalid(LexError::IllFormedConstant),
                    s,
                    index..index + 1,
                ));
            } else if ch != ')' {
                return ComplexScan::NotComplex;
            } else {
                s.push(')');
                let kind = if value[1] == 0.0 {
                    Kind::RealConstant(value[0])
                } else {
                    Kind::ComplexConstant(value[0], value[1])
                };
                return ComplexScan::Constant(Token::new(kind, s, start..index + 1));
            }
        }
        ComplexScan::NotComplex
    }

    fn end_of_statement(&mut self, start: usize, first: char, bounded: bool) -> Token {
        let mut colon = first == ':';
        let mut end = start + 1;
        while let Some(&(index, ch)) = self.chars().peek() {
            if !is_statement_end(ch) {
                break;
            }
            self.chars().next();
            colon |= ch == ':';
            end = index + 1;
        }
        if let Some(end) = self.next_is('}') {
            return Token::new(Kind::EndOfFormula, "}".to_string(), start..end);
        }
        if !bounded && self.chars().peek().is_none() {
            return Token::new(Kind::EndOfFormula, String::new(), start..end);
        }
        let op = if colon {
            Operator::Colon
        } else {
            Operator::Comma
        };
        Token::new(Kind::Operator(op), op.to_string(), start..end)
    }
}

/// ## Formula lexer
///
/// Yields tokens up to and including the end of the formula. A bounded
/// lexer reads a library entry and requires the closing `}`; reaching the
/// end of the text first yields an end of file token.

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<FormulaChars<'a>>,
    bounded: bool,
    end: usize,
    done: bool,
}

impl<'a> Tokenizers<'a> for Lexer<'a> {
    fn chars(&mut self) -> &mut Peekable<FormulaChars<'a>> {
        &mut self.chars
    }
}

impl<'a> Lexer<'a> {
    pub fn body(s: &'a str) -> Lexer<'a> {
        Lexer::new(s, 0, false)
    }

    /// Lexes `s`, which starts at `offset` in the full source, up to `}`.
    pub fn bounded(s: &'a str, offset: usize) -> Lexer<'a> {
        Lexer::new(s, offset, true)
    }

    fn new(s: &'a str, offset: usize, bounded: bool) -> Lexer<'a> {
        Lexer {
            chars: FormulaChars {
                chars: s.char_indices(),
                offset,
            }
            .peekable(),
            bounded,
            end: offset + s.len(),
            done: false,
        }
    }

    fn token(&mut self) -> Token {
        let (start, ch) = match self.chars.next() {
            Some(next) => next,
            None => {
                let column = self.end..self.end;
                return if self.bounded {
                    Token::new(Kind::Invalid(LexError::EndOfFile), String::new(), column)
                } else {
                    Token::new(Kind::EndOfFormula, String::new(), column)
                };
            }
        };
        match ch {
            '0'..='9' | '.' => self.constant(start, ch),
            'a'..='z' | '_' => self.alphabetic(start, ch),
            ',' | '\n' | ':' => {
                let bounded = self.bounded;
                self.end_of_statement(start, ch, bounded)
            }
            '(' => {
                let mut probe = self.clone();
                match probe.complex(start) {
                    ComplexScan::Constant(token) | ComplexScan::ThirdPart(token) => {
                        self.chars = probe.chars;
                        token
                    }
                    ComplexScan::NotComplex => {
                        Token::new(Kind::OpenParen, "(".to_string(), start..start + 1)
                    }
                }
            }
            ')' => Token::new(Kind::CloseParen, ")".to_string(), start..start + 1),
            '}' => Token::new(Kind::EndOfFormula, "}".to_string(), start..start + 1),
            '<' | '>' | '=' | '!' | '&' | '|' | '+' | '-' | '*' | '/' | '^' => {
                self.operator(start, ch)
            }
            _ => Token::new(
                Kind::Invalid(LexError::IllegalCharacter),
                ch.to_string(),
                start..start + ch.len_utf8(),
            ),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.token();
        if token.is_end_of_formula() || token.kind == Kind::Invalid(LexError::EndOfFile) {
            self.done = true;
        }
        Some(token)
    }
}
