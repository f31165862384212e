use std::fs;
use kls2klb::compile_kls_file;

#[test]
fn test_utf8_with_bom() {
    let utf8_bom = b"\xEF\xBB\xBF";

    let kls_content = r#"/*
@NAME = "BOM Test"
@DESCRIPTION = "Script saved with a byte order mark"
*/

layer MAC_BASE { [ KC_ESC CKC_MOFN ] }
"#;

    let mut content_with_bom = Vec::from(utf8_bom);
    content_with_bom.extend_from_slice(kls_content.as_bytes());

    let input_path = std::env::temp_dir().join("kls2klb_utf8_bom_test.kls");
    fs::write(&input_path, &content_with_bom).expect("Failed to write test file");

    let result = compile_kls_file(&input_path);
    assert!(result.is_ok(), "Failed to compile file with BOM: {:?}", result.err());

    let klb = result.unwrap();
    assert_eq!(klb.info_string(*b"name").as_deref(), Some("BOM Test"));
    assert_eq!(klb.keymap, vec![0x0029, 0x7E10]);

    let _ = fs::remove_file(&input_path);
}
