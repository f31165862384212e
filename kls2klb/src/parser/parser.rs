use crate::lexer::{Lexer, Token, parse_options_from_comment};
use keyrouter_core::KlsError;
use super::ast::*;
use std::collections::HashMap;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    /// Lexer error hit while reading the first token
    pending_error: Option<KlsError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        let mut lexer = Lexer::new(input);
        let (current, pending_error) = match lexer.next_token() {
            Ok(token) => (token, None),
            Err(e) => (None, Some(e)),
        };

        Self {
            lexer,
            current,
            pending_error,
        }
    }

    pub fn parse(&mut self) -> Result<KlsFile, KlsError> {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }

        let mut ast = KlsFile::new();
        ast.options = self.extract_options_from_input();

        while let Some(token) = &self.current {
            match token {
                Token::Layer => {
                    let layer = self.parse_layer()?;
                    ast.layers.push(layer);
                }
                Token::Leds => {
                    let line = self.lexer.current_line();
                    if ast.leds.is_some() {
                        return Err(self.error_at(line, "LED matrix declared twice"));
                    }
                    ast.leds = Some(self.parse_leds()?);
                }
                Token::Override => {
                    let rule = self.parse_override()?;
                    ast.overrides.push(rule);
                }
                other => {
                    return Err(self.error(format!(
                        "Expected 'layer', 'leds' or 'override', found {:?}",
                        other
                    )));
                }
            }
        }

        Ok(ast)
    }

    fn extract_options_from_input(&self) -> HashMap<String, String> {
        let mut options = HashMap::new();

        // Block comments
        let mut rest = self.lexer.source();
        while let Some(start) = rest.find("/*") {
            let Some(end) = rest[start..].find("*/") else {
                break;
            };
            let comment = &rest[start..start + end + 2];
            for (key, value) in parse_options_from_comment(comment) {
                options.insert(key, value);
            }
            rest = &rest[start + end + 2..];
        }

        // Line comments
        for line in self.lexer.source().lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") && trimmed.contains('@') {
                for (key, value) in parse_options_from_comment(trimmed) {
                    options.insert(key, value);
                }
            }
        }

        options
    }

    fn error(&self, message: String) -> KlsError {
        KlsError::Parse {
            line: self.lexer.current_line(),
            message,
        }
    }

    fn error_at(&self, line: usize, message: &str) -> KlsError {
        KlsError::Parse {
            line,
            message: message.to_string(),
        }
    }

    fn advance(&mut self) -> Result<(), KlsError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), KlsError> {
        if self.current.as_ref() != Some(&expected) {
            return Err(self.error(format!("Expected {:?}, found {:?}", expected, self.current)));
        }
        self.advance()
    }

    fn parse_layer(&mut self) -> Result<LayerDecl, KlsError> {
        let line = self.lexer.current_line();
        self.expect(Token::Layer)?;
        let layer = self.parse_layer_ref()?;
        self.expect(Token::LBrace)?;

        let mut rows = Vec::new();
        while self.current == Some(Token::LBracket) {
            self.advance()?;
            let mut row = Vec::new();
            while self.current != Some(Token::RBracket) {
                row.push(self.parse_key_expr()?);
            }
            self.advance()?;
            rows.push(row);
        }

        self.expect(Token::RBrace)?;

        if rows.is_empty() {
            return Err(self.error_at(line, "Layer has no rows"));
        }

        Ok(LayerDecl { layer, rows, line })
    }

    fn parse_layer_ref(&mut self) -> Result<LayerRef, KlsError> {
        let layer = match &self.current {
            Some(Token::Identifier(name)) => LayerRef::Named(name.clone()),
            Some(Token::Number(Some(index))) => LayerRef::Index(*index),
            other => {
                return Err(self.error(format!("Expected layer name or index, found {:?}", other)));
            }
        };
        self.advance()?;
        Ok(layer)
    }

    fn parse_key_expr(&mut self) -> Result<KeyExpr, KlsError> {
        match self.current.clone() {
            Some(Token::Identifier(name)) => {
                self.advance()?;
                if self.current == Some(Token::LParen) {
                    self.advance()?;
                    let inner = self.parse_key_expr()?;
                    self.expect(Token::RParen)?;
                    Ok(KeyExpr::Call(name, Box::new(inner)))
                } else {
                    Ok(KeyExpr::Name(name))
                }
            }
            Some(Token::Number(Some(raw))) => {
                self.advance()?;
                Ok(KeyExpr::Raw(raw))
            }
            other => Err(self.error(format!("Expected keycode, found {:?}", other))),
        }
    }

    fn parse_leds(&mut self) -> Result<LedDecl, KlsError> {
        let line = self.lexer.current_line();
        self.expect(Token::Leds)?;
        self.expect(Token::LBrace)?;

        let mut rows = Vec::new();
        while self.current == Some(Token::LBracket) {
            self.advance()?;
            let mut row = Vec::new();
            loop {
                match &self.current {
                    Some(Token::Number(Some(index))) => row.push(LedValue::Index(*index)),
                    Some(Token::Identifier(name)) if name == "NO_LED" => row.push(LedValue::NoLed),
                    Some(Token::RBracket) => break,
                    other => {
                        return Err(self.error(format!("Expected LED index or NO_LED, found {:?}", other)));
                    }
                }
                self.advance()?;
            }
            self.advance()?;
            rows.push(row);
        }

        self.expect(Token::RBrace)?;
        Ok(LedDecl { rows, line })
    }

    /// `override MODS + TRIGGER => REPLACEMENT @ LAYERS`
    fn parse_override(&mut self) -> Result<OverrideDecl, KlsError> {
        let line = self.lexer.current_line();
        self.expect(Token::Override)?;

        let mut mods = Vec::new();
        loop {
            match &self.current {
                Some(Token::Identifier(name)) => mods.push(name.clone()),
                other => {
                    return Err(self.error(format!("Expected modifier, found {:?}", other)));
                }
            }
            self.advance()?;
            if self.current == Some(Token::Pipe) {
                self.advance()?;
            } else {
                break;
            }
        }

        self.expect(Token::Plus)?;
        let trigger = self.parse_key_expr()?;
        self.expect(Token::Arrow)?;
        let replacement = self.parse_key_expr()?;
        self.expect(Token::At)?;

        let mut layers = vec![self.parse_layer_ref()?];
        while self.current == Some(Token::Pipe) {
            self.advance()?;
            layers.push(self.parse_layer_ref()?);
        }

        Ok(OverrideDecl {
            mods,
            trigger,
            replacement,
            layers,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_layer_rows() {
        let input = "layer MAC_BASE { [ KC_ESC KC_A ] [ _______ MO(NUMPAD) ] }";
        let ast = Parser::new(input).parse().unwrap();

        assert_eq!(ast.layers.len(), 1);
        assert_eq!(ast.layers[0].layer, LayerRef::Named("MAC_BASE".to_string()));
        assert_eq!(
            ast.layers[0].rows[1],
            vec![
                KeyExpr::Name("_______".to_string()),
                KeyExpr::Call("MO".to_string(), Box::new(KeyExpr::Name("NUMPAD".to_string()))),
            ]
        );
    }

    #[test]
    fn test_parse_override() {
        let input = "override MOD_BIT_RALT | MOD_BIT_RSHIFT + KC_LBRC => ROPT(KC_8) @ MAC_BASE | 3";
        let ast = Parser::new(input).parse().unwrap();

        let rule = &ast.overrides[0];
        assert_eq!(rule.mods, vec!["MOD_BIT_RALT".to_string(), "MOD_BIT_RSHIFT".to_string()]);
        assert_eq!(rule.trigger, KeyExpr::Name("KC_LBRC".to_string()));
        assert_eq!(rule.layers, vec![LayerRef::Named("MAC_BASE".to_string()), LayerRef::Index(3)]);
    }

    #[test]
    fn test_parse_leds() {
        let input = "leds { [ 0 1 NO_LED ] [ 2 3 4 ] }";
        let ast = Parser::new(input).parse().unwrap();
        let leds = ast.leds.unwrap();
        assert_eq!(leds.rows[0], vec![LedValue::Index(0), LedValue::Index(1), LedValue::NoLed]);
    }

    #[test]
    fn test_parse_options() {
        let input = "/*\n@NAME = \"Test\"\n*/\n// @DEBUG_INTERVAL = \"100\"\nlayer 0 { [ KC_A ] }";
        let ast = Parser::new(input).parse().unwrap();
        assert_eq!(ast.options.get("NAME").map(String::as_str), Some("Test"));
        assert_eq!(ast.options.get("DEBUG_INTERVAL").map(String::as_str), Some("100"));
    }

    #[test]
    fn test_missing_brace_reports_line() {
        let input = "layer MAC_BASE {\n  [ KC_A ]\n";
        match Parser::new(input).parse() {
            Err(KlsError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
