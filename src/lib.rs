pub mod asm;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod isa;
pub mod lexer;

pub use asm::assemble;
pub use cpu::{Cpu, Status, Trap};
pub use error::{AsmError, AsmErrorKind, Span};
