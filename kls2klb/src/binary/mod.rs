mod compiler;
mod writer;

pub use compiler::Compiler;
pub use writer::KlbWriter;
