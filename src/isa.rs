use serde::{Deserialize, Serialize};

/// The 16 opcodes, numbered exactly as they appear in bits [15:12] of a
/// machine word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Nop = 0,
    Halt = 1,
    Add = 2,
    Sub = 3,
    And = 4,
    Or = 5,
    Xor = 6,
    Not = 7,
    Set = 8,
    Ist = 9,
    Jmp = 10,
    Jip = 11,
    Lod = 12,
    Sto = 13,
    Shl = 14,
    Shr = 15,
}

impl Op {
    pub fn opcode(self) -> u16 {
        self as u16
    }

    /// Every 4-bit value is a valid opcode; the input is masked down to one.
    pub fn from_nibble(nibble: u16) -> Op {
        match nibble & 0xF {
            0 => Op::Nop,
            1 => Op::Halt,
            2 => Op::Add,
            3 => Op::Sub,
            4 => Op::And,
            5 => Op::Or,
            6 => Op::Xor,
            7 => Op::Not,
            8 => Op::Set,
            9 => Op::Ist,
            10 => Op::Jmp,
            11 => Op::Jip,
            12 => Op::Lod,
            13 => Op::Sto,
            14 => Op::Shl,
            15 => Op::Shr,
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Register read, 4-bit index field.
    Reg,
    /// Register write, 4-bit index field; `zero` and `status` are rejected.
    WriteReg,
    /// 8-bit literal or label reference.
    Imm,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub args: &'static [ArgKind],
}

use ArgKind::{Imm, Reg, WriteReg};

/// Instruction table, indexed by opcode.
pub const TABLE: &[InstrDesc] = &[
    InstrDesc { op: Op::Nop, mnemonic: "NOP", args: &[] },
    InstrDesc { op: Op::Halt, mnemonic: "HALT", args: &[] },
    InstrDesc { op: Op::Add, mnemonic: "ADD", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::Sub, mnemonic: "SUB", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::And, mnemonic: "AND", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::Or, mnemonic: "OR", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::Xor, mnemonic: "XOR", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::Not, mnemonic: "NOT", args: &[Reg, WriteReg] },
    InstrDesc { op: Op::Set, mnemonic: "SET", args: &[Reg, WriteReg] },
    InstrDesc { op: Op::Ist, mnemonic: "IST", args: &[Imm, WriteReg] },
    InstrDesc { op: Op::Jmp, mnemonic: "JMP", args: &[Reg] },
    InstrDesc { op: Op::Jip, mnemonic: "JIP", args: &[Reg, Reg] },
    InstrDesc { op: Op::Lod, mnemonic: "LOD", args: &[Reg, WriteReg] },
    InstrDesc { op: Op::Sto, mnemonic: "STO", args: &[Reg, Reg] },
    InstrDesc { op: Op::Shl, mnemonic: "SHL", args: &[Reg, Reg, WriteReg] },
    InstrDesc { op: Op::Shr, mnemonic: "SHR", args: &[Reg, Reg, WriteReg] },
];

pub fn describe(op: Op) -> &'static InstrDesc {
    &TABLE[op.opcode() as usize]
}

/// Mnemonics match case-insensitively.
pub fn lookup(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic.eq_ignore_ascii_case(mnemonic))
}

/// Fixed register file. Names are case-sensitive.
pub const REGISTERS: [&str; 16] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11",
    "r12", "r13", "zero", "status",
];

/// Always reads 0; the interpreter forces it back after every step.
pub const ZERO: usize = 14;
/// Flags register, overwritten by the interpreter on every step.
pub const STATUS: usize = 15;

pub fn register_index(name: &str) -> Option<u16> {
    REGISTERS.iter().position(|r| *r == name).map(|i| i as u16)
}

pub fn is_writable(index: u16) -> bool {
    index != ZERO as u16 && index != STATUS as u16
}
