use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    // Comments and whitespace (skipped)
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Comment,

    // Keywords
    #[token("layer")]
    Layer,

    #[token("leds")]
    Leds,

    #[token("override")]
    Override,

    // Operators
    #[token("=>")]
    Arrow,

    #[token("+")]
    Plus,

    #[token("|")]
    Pipe,

    #[token("@")]
    At,

    // Delimiters
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    // Numbers, decimal or hex
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| u32::from_str_radix(&lex.slice()[2..], 16).ok())]
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(Option<u32>),

    // Identifiers (keycodes, layers, modifiers, wrappers)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
}
