use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::isa::{Op, STATUS, ZERO};

pub const MEMORY_SIZE: usize = 256;

bitflags! {
    /// Contents of the `status` register, rebuilt on every executed step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Status: u8 {
        const ZERO = 1 << 0;
        const NEGATIVE = 1 << 1;
        const OVERFLOW = 1 << 2;
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("tried to execute instruction that was out of bounds (pc={pc})")]
    OutOfBounds { pc: usize },
}

/// One virtual machine instance. Each instance exclusively owns its memory
/// and register storage, so several can coexist in a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub program: Vec<u16>,
    pub mem: Vec<u8>,
    pub regs: [u8; 16],
    pub pc: usize,
    pub terminated: bool,
}

impl Cpu {
    pub fn new(program: Vec<u16>) -> Self {
        Self {
            program,
            mem: vec![0; MEMORY_SIZE],
            regs: [0; 16],
            pc: 0,
            terminated: false,
        }
    }

    /// Unconditionally discard all state; callable at any time.
    pub fn reset(&mut self) {
        self.mem.fill(0);
        self.regs = [0; 16];
        self.pc = 0;
        self.terminated = false;
    }

    /// Execute exactly one instruction. A no-op once terminated; fails
    /// without touching any state when the program counter runs off the
    /// end of the program.
    pub fn step(&mut self) -> Result<(), Trap> {
        if self.terminated {
            return Ok(());
        }
        let code = *self
            .program
            .get(self.pc)
            .ok_or(Trap::OutOfBounds { pc: self.pc })?;
        let op = Op::from_nibble(code >> 12);
        let a1 = ((code >> 8) & 0xF) as usize;
        let a2 = ((code >> 4) & 0xF) as usize;
        let a3 = (code & 0xF) as usize;

        let mut status = Status::empty();
        // Flags come from the raw 32-bit result, before 8-bit truncation.
        let mut classify = |raw: i32| -> u8 {
            if raw == 0 {
                status |= Status::ZERO;
            }
            if raw < 0 {
                status |= Status::NEGATIVE | Status::OVERFLOW;
            }
            if raw >= 256 {
                status |= Status::OVERFLOW;
            }
            raw as u8
        };

        match op {
            Op::Nop => {}
            Op::Halt => {
                // No flag or pc update on the halting step.
                self.terminated = true;
                return Ok(());
            }
            Op::Add => {
                self.regs[a3] = classify(self.regs[a1] as i32 + self.regs[a2] as i32);
            }
            Op::Sub => {
                self.regs[a3] = classify(self.regs[a1] as i32 - self.regs[a2] as i32);
            }
            Op::And => {
                self.regs[a3] = classify((self.regs[a1] & self.regs[a2]) as i32);
            }
            Op::Or => {
                self.regs[a3] = classify((self.regs[a1] | self.regs[a2]) as i32);
            }
            Op::Xor => {
                self.regs[a3] = classify((self.regs[a1] ^ self.regs[a2]) as i32);
            }
            Op::Not => {
                // 32-bit complement of an 8-bit value: always negative,
                // truncates to the 8-bit bitwise NOT.
                self.regs[a2] = classify(!(self.regs[a1] as i32));
            }
            Op::Set => {
                self.regs[a2] = classify(self.regs[a1] as i32);
            }
            Op::Ist => {
                self.regs[a3] = classify(((code >> 4) & 0xFF) as i32);
            }
            Op::Jmp => {
                // target - 1: the unconditional increment below lands on it.
                self.pc = (self.regs[a1] as usize).wrapping_sub(1);
            }
            Op::Jip => {
                if self.regs[a2] != 0 {
                    self.pc = (self.regs[a1] as usize).wrapping_sub(1);
                }
            }
            Op::Lod => {
                self.regs[a2] = classify(self.mem[self.regs[a1] as usize] as i32);
            }
            Op::Sto => {
                self.mem[self.regs[a1] as usize] = self.regs[a2];
            }
            Op::Shl => {
                self.regs[a3] = classify((self.regs[a1] as i32) << (self.regs[a2] & 31));
            }
            Op::Shr => {
                self.regs[a3] = classify((self.regs[a1] as i32) >> (self.regs[a2] & 31));
            }
        }

        self.regs[ZERO] = 0;
        // Written even by opcodes that computed no flags, which therefore
        // clear it.
        self.regs[STATUS] = status.bits();
        self.pc = self.pc.wrapping_add(1);
        Ok(())
    }
}
