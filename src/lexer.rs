use crate::error::{AsmError, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(u32),
    Ident(String),
    Colon,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Tokenize ASCII assembly source. The sequence always ends with a
/// zero-width `Eof` token at the final offset.
pub fn lex(text: &str) -> Result<Vec<Token>, AsmError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b':' => {
                tokens.push(Token::new(TokenKind::Colon, idx, idx + 1));
                idx += 1;
            }
            b' ' | b'\t' | b'\n' => idx += 1,
            b'/' => {
                if bytes.get(idx + 1) == Some(&b'/') {
                    while idx < bytes.len() && bytes[idx] != b'\n' {
                        idx += 1;
                    }
                } else if bytes.get(idx + 1) == Some(&b'*') {
                    let start = idx;
                    // The opening pair is excluded from closer matching,
                    // so `/*/` never counts as closed.
                    idx = start + 3;
                    while idx < bytes.len() && !(bytes[idx] == b'/' && bytes[idx - 1] == b'*') {
                        idx += 1;
                    }
                    if idx >= bytes.len() {
                        return Err(AsmError::lex(
                            text,
                            Span::new(start, start + 2),
                            "Expected end of comment",
                        ));
                    }
                    idx += 1;
                } else {
                    return Err(AsmError::lex(
                        text,
                        Span::new(idx, idx + 1),
                        "Expected the start of a comment",
                    ));
                }
            }
            c if c.is_ascii_digit() => {
                let start = idx;
                let mut value: u32 = 0;
                while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                    // Saturate on absurd literals; the parser rejects
                    // anything over 255 anyway.
                    value = value
                        .saturating_mul(10)
                        .saturating_add((bytes[idx] - b'0') as u32);
                    idx += 1;
                }
                tokens.push(Token::new(TokenKind::Number(value), start, idx));
            }
            c if c.is_ascii_alphabetic() => {
                let start = idx;
                while idx < bytes.len() && bytes[idx].is_ascii_alphanumeric() {
                    idx += 1;
                }
                tokens.push(Token::new(
                    TokenKind::Ident(text[start..idx].to_string()),
                    start,
                    idx,
                ));
            }
            _ => {
                return Err(AsmError::lex(
                    text,
                    Span::new(idx, idx + 1),
                    "Unknown character",
                ))
            }
        }
    }
    tokens.push(Token::new(TokenKind::Eof, bytes.len(), bytes.len()));
    Ok(tokens)
}
