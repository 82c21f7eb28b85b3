use crate::isa::{self, ArgKind, Op};

/// Format one machine word back to `MNEMONIC arg…` text.
pub fn fmt_word(code: u16) -> String {
    let desc = isa::describe(Op::from_nibble(code >> 12));
    let mut out = desc.mnemonic.to_string();
    let mut shift = 12u16;
    for kind in desc.args {
        match kind {
            ArgKind::Reg | ArgKind::WriteReg => {
                shift -= 4;
                let index = ((code >> shift) & 0xF) as usize;
                out.push(' ');
                out.push_str(isa::REGISTERS[index]);
            }
            ArgKind::Imm => {
                shift -= 8;
                out.push(' ');
                out.push_str(&((code >> shift) & 0xFF).to_string());
            }
        }
    }
    out
}

/// Listing of a whole program, one `index: text` line per word.
pub fn fmt_program(program: &[u16]) -> String {
    program
        .iter()
        .enumerate()
        .map(|(i, &word)| format!("{i:3}: {}", fmt_word(word)))
        .collect::<Vec<_>>()
        .join("\n")
}
