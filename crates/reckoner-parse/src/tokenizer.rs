//! Single-pass tokenizer for formula text.
//!
//! The lexer canonicalizes as it goes: operator synonyms collapse to one
//! spelling (`=`/`==` → `==`, `<>` → `!=`, `&&` → `and`, `||` → `or`,
//! `!` → `not`), identifiers are lower-cased, and string literals are
//! stored unquoted. Every token keeps its byte span in the source so
//! later stages can point at the offending text.

use std::error::Error;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operator associativity, as reported by [`Token::get_precedence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug)]
pub struct TokenizerError {
    pub message: String,
    pub pos: usize,
}

impl Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenizerError: {}", self.message)
    }
}

impl Error for TokenizerError {}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Operand,
    Identifier,
    OpPrefix,
    OpInfix,
    OpenParen,
    CloseParen,
    Separator,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSubType {
    None,
    Number,
    Text,
    Logical,
}

/// One lexed token. `value` holds the canonical spelling (identifiers
/// lower-cased, operators normalized, strings unquoted); `start`/`end`
/// are byte offsets into the original source.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Token {
    pub value: String,
    pub token_type: TokenType,
    pub subtype: TokenSubType,
    pub start: usize,
    pub end: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} subtype: {:?} value: {}>",
            self.token_type, self.subtype, self.value
        )
    }
}

impl Token {
    pub fn new(
        value: String,
        token_type: TokenType,
        subtype: TokenSubType,
        start: usize,
        end: usize,
    ) -> Self {
        Token {
            value,
            token_type,
            subtype,
            start,
            end,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.token_type, TokenType::OpPrefix | TokenType::OpInfix)
    }

    /// Binding power and associativity for infix operators, `None` for
    /// everything else. Higher binds tighter.
    pub fn get_precedence(&self) -> Option<(u8, Associativity)> {
        if self.token_type != TokenType::OpInfix {
            return None;
        }
        match self.value.as_str() {
            "or" => Some((1, Associativity::Left)),
            "and" => Some((2, Associativity::Left)),
            "==" | "!=" | "<" | "<=" | ">" | ">=" => Some((3, Associativity::Left)),
            "+" | "-" => Some((4, Associativity::Left)),
            "*" | "/" | "%" => Some((5, Associativity::Left)),
            "^" => Some((6, Associativity::Right)),
            _ => None,
        }
    }
}

/// The tokenizer walks the source bytes once, pushing tokens into
/// `items`. Construction runs the whole scan; a successfully built
/// `Tokenizer` always holds a complete token stream.
pub struct Tokenizer {
    source: String,
    pub items: Vec<Token>,
    offset: usize,
    paren_depth: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Self, TokenizerError> {
        let mut tokenizer = Tokenizer {
            source: source.to_string(),
            items: Vec::with_capacity(source.len() / 2),
            offset: 0,
            paren_depth: 0,
        };
        tokenizer.scan()?;
        Ok(tokenizer)
    }

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.offset).copied()
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.offset + 1).copied()
    }

    fn scan(&mut self) -> Result<(), TokenizerError> {
        while let Some(b) = self.current_byte() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.offset += 1,
                b'"' | b'\'' => self.scan_string(b)?,
                b'0'..=b'9' => self.scan_number(),
                b'.' if self.peek_byte().is_some_and(|n| n.is_ascii_digit()) => {
                    self.scan_number();
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),
                b'(' => {
                    self.items.push(Token::new(
                        "(".to_string(),
                        TokenType::OpenParen,
                        TokenSubType::None,
                        self.offset,
                        self.offset + 1,
                    ));
                    self.paren_depth += 1;
                    self.offset += 1;
                }
                b')' => {
                    if self.paren_depth == 0 {
                        return Err(TokenizerError {
                            message: "unmatched closing parenthesis".to_string(),
                            pos: self.offset,
                        });
                    }
                    self.paren_depth -= 1;
                    self.items.push(Token::new(
                        ")".to_string(),
                        TokenType::CloseParen,
                        TokenSubType::None,
                        self.offset,
                        self.offset + 1,
                    ));
                    self.offset += 1;
                }
                b',' => {
                    self.items.push(Token::new(
                        ",".to_string(),
                        TokenType::Separator,
                        TokenSubType::None,
                        self.offset,
                        self.offset + 1,
                    ));
                    self.offset += 1;
                }
                b'+' | b'-' | b'*' | b'/' | b'%' | b'^' | b'=' | b'!' | b'<' | b'>' | b'&'
                | b'|' => self.scan_operator()?,
                _ => {
                    // `offset` sits on the leading byte of a char here, so
                    // the slice below starts at a boundary.
                    let c = self.source[self.offset..].chars().next().unwrap_or('?');
                    return Err(TokenizerError {
                        message: format!("unexpected character '{c}'"),
                        pos: self.offset,
                    });
                }
            }
        }
        if self.paren_depth > 0 {
            return Err(TokenizerError {
                message: "unmatched opening parenthesis".to_string(),
                pos: self.offset,
            });
        }
        Ok(())
    }

    fn scan_number(&mut self) {
        let start = self.offset;
        let bytes = self.source.as_bytes();
        let mut seen_dot = false;
        while let Some(b) = self.current_byte() {
            match b {
                b'0'..=b'9' => self.offset += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.offset += 1;
                }
                b'e' | b'E' => {
                    // Exponent marker only counts when a digit (or a signed
                    // digit) follows; otherwise it starts an identifier.
                    let next = bytes.get(self.offset + 1).copied();
                    let after = bytes.get(self.offset + 2).copied();
                    match next {
                        Some(d) if d.is_ascii_digit() => self.offset += 2,
                        Some(b'+') | Some(b'-') if after.is_some_and(|d| d.is_ascii_digit()) => {
                            self.offset += 3;
                        }
                        _ => break,
                    }
                    while self.current_byte().is_some_and(|d| d.is_ascii_digit()) {
                        self.offset += 1;
                    }
                    break;
                }
                _ => break,
            }
        }
        let value = self.source[start..self.offset].to_string();
        self.items.push(Token::new(
            value,
            TokenType::Operand,
            TokenSubType::Number,
            start,
            self.offset,
        ));
    }

    fn scan_identifier(&mut self) {
        let start = self.offset;
        while let Some(b) = self.current_byte() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'.' => self.offset += 1,
                _ => break,
            }
        }
        let word = self.source[start..self.offset].to_lowercase();
        let token = match word.as_str() {
            "true" | "false" => {
                Token::new(word, TokenType::Operand, TokenSubType::Logical, start, self.offset)
            }
            "and" | "or" => {
                Token::new(word, TokenType::OpInfix, TokenSubType::None, start, self.offset)
            }
            // `not` stays an identifier so `not(x)` resolves to the NOT
            // function; the operator form is `!`.
            _ => Token::new(word, TokenType::Identifier, TokenSubType::None, start, self.offset),
        };
        self.items.push(token);
    }

    fn scan_string(&mut self, delim: u8) -> Result<(), TokenizerError> {
        let start = self.offset;
        let bytes = self.source.as_bytes();
        let content_start = self.offset + 1;
        let mut cursor = content_start;
        loop {
            match bytes.get(cursor).copied() {
                None => {
                    return Err(TokenizerError {
                        message: "unterminated string literal".to_string(),
                        pos: start,
                    });
                }
                Some(b) if b == delim => {
                    // A doubled delimiter is an escaped quote, not the end.
                    if bytes.get(cursor + 1).copied() == Some(delim) {
                        cursor += 2;
                    } else {
                        break;
                    }
                }
                Some(_) => cursor += 1,
            }
        }
        // The delimiter is ASCII, so both bounds sit on char boundaries.
        let raw = &self.source[content_start..cursor];
        let value = if delim == b'"' {
            raw.replace("\"\"", "\"")
        } else {
            raw.replace("''", "'")
        };
        self.offset = cursor + 1;
        self.items.push(Token::new(
            value,
            TokenType::Operand,
            TokenSubType::Text,
            start,
            self.offset,
        ));
        Ok(())
    }

    fn scan_operator(&mut self) -> Result<(), TokenizerError> {
        let start = self.offset;
        let bytes = self.source.as_bytes();
        let b = bytes[self.offset];
        let next = bytes.get(self.offset + 1).copied();
        let (canonical, len, token_type) = match (b, next) {
            (b'=', Some(b'=')) => ("==", 2, TokenType::OpInfix),
            (b'=', _) => ("==", 1, TokenType::OpInfix),
            (b'!', Some(b'=')) => ("!=", 2, TokenType::OpInfix),
            (b'!', _) => ("not", 1, TokenType::OpPrefix),
            (b'<', Some(b'>')) => ("!=", 2, TokenType::OpInfix),
            (b'<', Some(b'=')) => ("<=", 2, TokenType::OpInfix),
            (b'<', _) => ("<", 1, TokenType::OpInfix),
            (b'>', Some(b'=')) => (">=", 2, TokenType::OpInfix),
            (b'>', _) => (">", 1, TokenType::OpInfix),
            (b'&', Some(b'&')) => ("and", 2, TokenType::OpInfix),
            (b'&', _) => {
                return Err(TokenizerError {
                    message: "single '&' is not an operator, use '&&'".to_string(),
                    pos: self.offset,
                });
            }
            (b'|', Some(b'|')) => ("or", 2, TokenType::OpInfix),
            (b'|', _) => {
                return Err(TokenizerError {
                    message: "single '|' is not an operator, use '||'".to_string(),
                    pos: self.offset,
                });
            }
            (b'+', _) => ("+", 1, self.sign_type()),
            (b'-', _) => ("-", 1, self.sign_type()),
            (b'*', _) => ("*", 1, TokenType::OpInfix),
            (b'/', _) => ("/", 1, TokenType::OpInfix),
            (b'%', _) => ("%", 1, TokenType::OpInfix),
            (b'^', _) => ("^", 1, TokenType::OpInfix),
            _ => {
                return Err(TokenizerError {
                    message: format!("unexpected operator byte '{}'", b as char),
                    pos: self.offset,
                });
            }
        };
        self.offset += len;
        self.items.push(Token::new(
            canonical.to_string(),
            token_type,
            TokenSubType::None,
            start,
            self.offset,
        ));
        Ok(())
    }

    /// Whether a `+`/`-` here is a sign (prefix) or an infix operator,
    /// decided by the last token already emitted.
    fn sign_type(&self) -> TokenType {
        match self.items.last() {
            None => TokenType::OpPrefix,
            Some(prev) => match prev.token_type {
                TokenType::OpInfix
                | TokenType::OpPrefix
                | TokenType::OpenParen
                | TokenType::Separator => TokenType::OpPrefix,
                _ => TokenType::OpInfix,
            },
        }
    }
}

/// Tokenize `source` into a canonicalized token stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizerError> {
    Ok(Tokenizer::new(source)?.items)
}
