use kls2klb::parser::Parser;
use keyrouter_core::KlsError;

#[test]
fn test_parser_fails_on_invalid_character() {
    let mut parser = Parser::new("layer 0 {\n  [ KC_A § ]\n}");
    let result = parser.parse();

    match result {
        Err(KlsError::Parse { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("Unexpected token"), "got: {}", message);
            assert!(message.contains('§'));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_parser_fails_on_invalid_first_token() {
    let result = Parser::new("$layer 0 { [ KC_A ] }").parse();
    assert!(matches!(result, Err(KlsError::Parse { line: 1, .. })));
}

#[test]
fn test_parser_accepts_leading_bom() {
    let result = Parser::new("\u{FEFF}layer 0 { [ KC_A ] }").parse();
    assert!(result.is_ok(), "BOM should be ignored: {:?}", result.err());
}

#[test]
fn test_unterminated_row() {
    let result = Parser::new("layer 0 {\n  [ KC_A KC_B\n").parse();
    match result {
        Err(KlsError::Parse { message, .. }) => assert!(message.contains("Expected keycode")),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_override_without_arrow() {
    let result = Parser::new("override MOD_BIT_RALT + KC_LBRC KC_ESC @ MAC_BASE").parse();
    match result {
        Err(KlsError::Parse { line, message }) => {
            assert_eq!(line, 1);
            assert!(message.contains("Arrow"), "got: {}", message);
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_override_without_layers() {
    let result = Parser::new("override MOD_BIT_RALT + KC_LBRC => KC_ESC").parse();
    assert!(matches!(result, Err(KlsError::Parse { .. })));
}

#[test]
fn test_number_out_of_range() {
    let result = Parser::new("layer 0 { [ 99999999999 ] }").parse();
    match result {
        Err(KlsError::Parse { message, .. }) => assert!(message.contains("out of range")),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_led_block() {
    let result = Parser::new("leds { [ 0 ] }\nleds { [ 0 ] }").parse();
    match result {
        Err(KlsError::Parse { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("twice"));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
}
