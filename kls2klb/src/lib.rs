pub mod lexer;
pub mod parser;
pub mod binary;

pub use keyrouter_core::*;

use std::path::Path;
use std::fs::{File, read_to_string};
use std::io::BufWriter;

pub fn convert_kls_to_klb(input_path: &Path, output_path: &Path) -> std::result::Result<(), KlsError> {
    let klb = compile_kls_file(input_path)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    let klb_writer = binary::KlbWriter::new(writer);
    klb_writer.write_klb_file(&klb)?;

    log::info!(
        "Wrote {} ({} layers, {} overrides)",
        output_path.display(),
        klb.header.layer_count,
        klb.overrides.len()
    );
    Ok(())
}

pub fn compile_kls_file(input_path: &Path) -> std::result::Result<KlbFile, KlsError> {
    let input = read_to_string(input_path)?;
    compile_kls(&input)
}

/// Compile KLS source held in memory
pub fn compile_kls(input: &str) -> std::result::Result<KlbFile, KlsError> {
    let mut parser = parser::Parser::new(input);
    let ast = parser.parse()?;

    let compiler = binary::Compiler::new();
    compiler.compile(ast)
}

/// Compile KLS source straight to KLB bytes
pub fn compile_kls_to_bytes(input: &str) -> std::result::Result<Vec<u8>, KlsError> {
    let klb = compile_kls(input)?;
    let mut buffer = Vec::new();
    binary::KlbWriter::new(&mut buffer).write_klb_file(&klb)?;
    Ok(buffer)
}
