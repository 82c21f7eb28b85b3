use std::collections::HashMap;

use crate::error::{AsmError, Span};
use crate::isa::{self, ArgKind};
use crate::lexer::{lex, Token, TokenKind};

/// Program indices must fit in an 8-bit immediate field.
pub const MAX_PROGRAM_WORDS: usize = 256;

/// Bit position of the 8-bit immediate field within a word.
const IMM_SHIFT: u16 = 4;
const IMM_MASK: u16 = 0xFF << IMM_SHIFT;

/// Assemble source text into machine words. All-or-nothing: the first
/// error aborts the whole assembly.
pub fn assemble(text: &str) -> Result<Vec<u16>, AsmError> {
    let tokens = lex(text)?;
    Parser::new(tokens, text).parse()
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    idx: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, text: &'a str) -> Self {
        Self { text, tokens, idx: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.idx]
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn error_at(&self, span: Span, message: impl Into<String>) -> AsmError {
        AsmError::parse(self.text, span, message)
    }

    fn expect_ident(&mut self, message: &str) -> Result<(String, Span), AsmError> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(name) => {
                let out = (name.clone(), token.span);
                self.idx += 1;
                Ok(out)
            }
            _ => Err(self.error_at(token.span, message)),
        }
    }

    fn match_ident(&mut self) -> Option<(String, Span)> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(name) => {
                let out = (name.clone(), token.span);
                self.idx += 1;
                Some(out)
            }
            _ => None,
        }
    }

    fn match_colon(&mut self) -> bool {
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    fn expect_number(&mut self, message: &str) -> Result<(u32, Span), AsmError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Number(value) => {
                let span = token.span;
                self.idx += 1;
                Ok((value, span))
            }
            _ => Err(self.error_at(token.span, message)),
        }
    }

    fn parse(mut self) -> Result<Vec<u16>, AsmError> {
        let mut code_words: Vec<u16> = Vec::new();
        let mut patches: Vec<(usize, String, Span)> = Vec::new();
        let mut labels: HashMap<String, usize> = HashMap::new();

        while !self.at_eof() {
            let (mut name, mut span) = self.expect_ident("Expected an instruction")?;
            if self.match_colon() {
                if labels.contains_key(&name) {
                    return Err(self.error_at(span, "Labels must be unique"));
                }
                labels.insert(name, code_words.len());
                (name, span) = self.expect_ident("Expected an instruction")?;
            }
            let instr = isa::lookup(&name)
                .ok_or_else(|| self.error_at(span, "Expected a valid instruction"))?;

            let mut code = instr.op.opcode();
            let mut nibbles = 0;
            for kind in instr.args {
                match kind {
                    ArgKind::Reg | ArgKind::WriteReg => {
                        let (reg, reg_span) = self.expect_ident("Expected a register")?;
                        let index = isa::register_index(&reg)
                            .ok_or_else(|| self.error_at(reg_span, "Expected a valid register"))?;
                        if *kind == ArgKind::WriteReg && !isa::is_writable(index) {
                            return Err(self.error_at(
                                reg_span,
                                format!(
                                    "Expected a writable register, and {reg} is not a writable register"
                                ),
                            ));
                        }
                        code = (code << 4) | index;
                        nibbles += 1;
                    }
                    ArgKind::Imm => {
                        if let Some((label, label_span)) = self.match_ident() {
                            // Placeholder until the label table is complete.
                            patches.push((code_words.len(), label, label_span));
                            code <<= 8;
                        } else {
                            let (value, num_span) =
                                self.expect_number("Expected a number or label")?;
                            if value >= 256 {
                                return Err(self.error_at(
                                    num_span,
                                    "Number exceeds 8-bit integer limit",
                                ));
                            }
                            code = (code << 8) | value as u16;
                        }
                        nibbles += 2;
                    }
                }
            }
            // Pad so every word decodes the same way regardless of arity.
            while nibbles < 3 {
                code <<= 4;
                nibbles += 1;
            }
            code_words.push(code);
        }

        for (index, label, span) in patches {
            let target = *labels
                .get(&label)
                .ok_or_else(|| self.error_at(span, "This label does not exist"))?;
            code_words[index] = (code_words[index] & !IMM_MASK) | ((target as u16) << IMM_SHIFT);
        }

        if code_words.len() >= MAX_PROGRAM_WORDS {
            let span = self.tokens[self.tokens.len() - 1].span;
            return Err(self.error_at(
                span,
                format!(
                    "Too many instructions (there are {} instructions but the maximum allowed is {})",
                    code_words.len(),
                    MAX_PROGRAM_WORDS
                ),
            ));
        }
        Ok(code_words)
    }
}
