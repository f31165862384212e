mod token;
mod lexer;

pub use token::Token;
pub use lexer::{Lexer, parse_options_from_comment};
