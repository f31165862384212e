use logos::{Logos, Lexer as LogosLexer};
use keyrouter_core::KlsError;
use super::Token;

/// Token stream over KLS source that knows which line it is on.
///
/// Lines are counted lazily: `scanned` marks the byte offset up to which
/// newlines have been folded into `line`.
pub struct Lexer<'a> {
    tokens: LogosLexer<'a, Token>,
    source: &'a str,
    scanned: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            tokens: Token::lexer(source),
            source,
            scanned: 0,
            line: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn current_line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, KlsError> {
        let Some(lexed) = self.tokens.next() else {
            return Ok(None);
        };
        self.advance_to(self.tokens.span().start);

        match lexed {
            Ok(Token::Number(None)) => Err(self.error("Number out of range")),
            Ok(token) => Ok(Some(token)),
            Err(_) => Err(self.error("Unexpected token")),
        }
    }

    pub fn collect_all(mut self) -> Result<Vec<Token>, KlsError> {
        std::iter::from_fn(|| self.next_token().transpose()).collect()
    }

    fn advance_to(&mut self, offset: usize) {
        self.line += count_lines(&self.source[self.scanned..offset]);
        self.scanned = offset;
    }

    fn error(&self, what: &str) -> KlsError {
        KlsError::Parse {
            line: self.line,
            message: format!("{}: '{}'", what, self.tokens.slice()),
        }
    }
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Extracts `@KEY = "value"` pairs from a line or block comment
pub fn parse_options_from_comment(comment: &str) -> Vec<(String, String)> {
    let body = comment
        .trim_start_matches("//")
        .trim_start_matches("/*")
        .trim_end_matches("*/");

    body.lines()
        .filter_map(|line| {
            let (_, option) = line.split_once('@')?;
            let (key, value) = option.split_once('=')?;
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_line_tracking() {
        let mut lexer = Lexer::new("layer\nMAC_BASE\n\n{");

        assert_eq!(lexer.next_token().unwrap(), Some(Token::Layer));
        assert_eq!(lexer.current_line(), 1);

        assert!(matches!(lexer.next_token().unwrap(), Some(Token::Identifier(_))));
        assert_eq!(lexer.current_line(), 2);

        assert_eq!(lexer.next_token().unwrap(), Some(Token::LBrace));
        assert_eq!(lexer.current_line(), 4);

        assert_eq!(lexer.next_token().unwrap(), None);
        assert_eq!(lexer.current_line(), 4);
    }

    #[test]
    fn test_lines_inside_comments_are_counted() {
        let mut lexer = Lexer::new("/* one\ntwo */\n// three\nlayer");
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Layer));
        assert_eq!(lexer.current_line(), 4);
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("layer\n$");
        assert!(lexer.next_token().is_ok());
        match lexer.next_token() {
            Err(KlsError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert_eq!(message, "Unexpected token: '$'");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = Lexer::new("/* @NAME = \"x\" */ layer // trailing\n 0x7E10").collect_all().unwrap();
        assert_eq!(tokens, vec![Token::Layer, Token::Number(Some(0x7E10))]);
    }

    #[test]
    fn test_parse_options() {
        let comment = r#"/*
@NAME = "K1 Pro ISO"
@DESCRIPTION = "OS-adaptive layout"
@DEBUG_INTERVAL = '250'
not an option
*/"#;

        let options = parse_options_from_comment(comment);
        assert_eq!(
            options,
            vec![
                ("NAME".to_string(), "K1 Pro ISO".to_string()),
                ("DESCRIPTION".to_string(), "OS-adaptive layout".to_string()),
                ("DEBUG_INTERVAL".to_string(), "250".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_comment_option() {
        let options = parse_options_from_comment("// @DEBUG_INTERVAL = \"10\"");
        assert_eq!(options, vec![("DEBUG_INTERVAL".to_string(), "10".to_string())]);
    }
}
