pub mod parser;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use parser::{ASTNode, ASTNodeType, Parser, ParserError, parse};
pub use tokenizer::{
    Associativity, Token, TokenSubType, TokenType, Tokenizer, TokenizerError, tokenize,
};

// Re-export the shared types so downstream crates can depend on this one
// alone for parsing work.
pub use reckoner_common::{EvalError, EvalErrorKind, Value};
