/*!
## Rust Language Module

This Rust module provides lexical analysis and validation of the fractal
formula language. It turns library text into normalized formula text
which the machine module compiles.

*/

pub type Column = std::ops::Range<usize>;

#[macro_use]
mod error;
mod function;
mod header;
mod ident;
mod lex;
mod library;
mod limits;
mod normalize;
mod prescan;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::ErrorList;
pub use function::Function;
pub use header::{Header, Symmetry};
pub use ident::Predefined;
pub use lex::{lex, Lexer, MAX_TOKEN_LEN};
pub use library::{Entry, Library};
pub use limits::Limits;
pub use normalize::{normalize, Formula};
pub use prescan::{prescan, ParamUsage, Prescan};
