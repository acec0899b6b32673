//! Precedence-climbing parser over the token stream.
//!
//! Grammar, loosest to tightest: `or` < `and` < comparison < `+ -` <
//! `* / %` < `^` (right-associative) < prefix operators < literals,
//! variables, calls, and parenthesized groups.

use std::error::Error;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use reckoner_common::{EvalError, EvalErrorKind, Value};

use crate::tokenizer::{Associativity, Token, TokenSubType, TokenType, Tokenizer, TokenizerError};

#[derive(Debug)]
pub struct ParserError {
    pub message: String,
    /// Byte offset into the source, when one is known.
    pub position: Option<usize>,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "ParserError at byte {}: {}", pos, self.message)
        } else {
            write!(f, "ParserError: {}", self.message)
        }
    }
}

impl Error for ParserError {}

impl From<TokenizerError> for ParserError {
    fn from(e: TokenizerError) -> Self {
        ParserError {
            message: e.message,
            position: Some(e.pos),
        }
    }
}

impl From<ParserError> for EvalError {
    fn from(e: ParserError) -> Self {
        let message = match e.position {
            Some(pos) => format!("{} (byte {pos})", e.message),
            None => e.message,
        };
        EvalError::new(EvalErrorKind::Syntax).with_message(message)
    }
}

/// The shape of one parsed expression element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNodeType {
    Literal(Value),
    /// A reference to a variable by canonical (lower-case) name.
    Variable(String),
    UnaryOp {
        op: String,
        expr: Box<ASTNode>,
    },
    BinaryOp {
        op: String,
        left: Box<ASTNode>,
        right: Box<ASTNode>,
    },
    Function {
        name: String,
        args: Vec<ASTNode>,
    },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ASTNode {
    pub node_type: ASTNodeType,
    /// The token this node came from, kept for error reporting. `None`
    /// for synthesized nodes.
    pub source_token: Option<Token>,
}

impl ASTNode {
    pub fn new(node_type: ASTNodeType, source_token: Option<Token>) -> Self {
        ASTNode {
            node_type,
            source_token,
        }
    }

    /// Free variables referenced by this expression, first appearance
    /// first, deduplicated.
    pub fn get_dependencies(&self) -> Vec<String> {
        let mut dependencies = Vec::new();
        self.collect_dependencies(&mut dependencies);
        dependencies
    }

    fn collect_dependencies(&self, dependencies: &mut Vec<String>) {
        match &self.node_type {
            ASTNodeType::Literal(_) => {}
            ASTNodeType::Variable(name) => {
                if !dependencies.iter().any(|d| d == name) {
                    dependencies.push(name.clone());
                }
            }
            ASTNodeType::UnaryOp { expr, .. } => expr.collect_dependencies(dependencies),
            ASTNodeType::BinaryOp { left, right, .. } => {
                left.collect_dependencies(dependencies);
                right.collect_dependencies(dependencies);
            }
            ASTNodeType::Function { args, .. } => {
                for arg in args {
                    arg.collect_dependencies(dependencies);
                }
            }
        }
    }
}

impl Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_type {
            ASTNodeType::Literal(value) => write!(f, "{value}"),
            ASTNodeType::Variable(name) => write!(f, "{name}"),
            ASTNodeType::UnaryOp { op, expr } => write!(f, "{op}({expr})"),
            ASTNodeType::BinaryOp { op, left, right } => write!(f, "({left} {op} {right})"),
            ASTNodeType::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Converts a token stream into an AST.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn end_position(&self) -> Option<usize> {
        self.tokens.last().map(|t| t.end)
    }

    pub fn parse(&mut self) -> Result<ASTNode, ParserError> {
        if self.tokens.is_empty() {
            return Err(ParserError {
                message: "empty expression".to_string(),
                position: None,
            });
        }
        let ast = self.parse_expression()?;
        if self.position < self.tokens.len() {
            let token = &self.tokens[self.position];
            return Err(ParserError {
                message: format!("unexpected trailing token '{}'", token.value),
                position: Some(token.start),
            });
        }
        Ok(ast)
    }

    fn parse_expression(&mut self) -> Result<ASTNode, ParserError> {
        self.parse_binary_op(0)
    }

    fn parse_binary_op(&mut self, min_precedence: u8) -> Result<ASTNode, ParserError> {
        let mut left = self.parse_unary_op()?;

        while self.position < self.tokens.len() {
            let token = &self.tokens[self.position];
            if token.token_type != TokenType::OpInfix {
                break;
            }
            let (precedence, associativity) =
                token.get_precedence().unwrap_or((0, Associativity::Left));
            if precedence < min_precedence {
                break;
            }

            let op_token = self.tokens[self.position].clone();
            self.position += 1;

            let next_min_precedence = if associativity == Associativity::Left {
                precedence + 1
            } else {
                precedence
            };

            let right = self.parse_binary_op(next_min_precedence)?;
            left = ASTNode::new(
                ASTNodeType::BinaryOp {
                    op: op_token.value.clone(),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Some(op_token),
            );
        }

        Ok(left)
    }

    fn parse_unary_op(&mut self) -> Result<ASTNode, ParserError> {
        if self.position < self.tokens.len()
            && self.tokens[self.position].token_type == TokenType::OpPrefix
        {
            let op_token = self.tokens[self.position].clone();
            self.position += 1;
            let expr = self.parse_unary_op()?;
            return Ok(ASTNode::new(
                ASTNodeType::UnaryOp {
                    op: op_token.value.clone(),
                    expr: Box::new(expr),
                },
                Some(op_token),
            ));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ASTNode, ParserError> {
        if self.position >= self.tokens.len() {
            return Err(ParserError {
                message: "unexpected end of expression".to_string(),
                position: self.end_position(),
            });
        }

        let token = self.tokens[self.position].clone();
        match token.token_type {
            TokenType::Operand => {
                self.position += 1;
                self.parse_operand(token)
            }
            TokenType::Identifier => {
                self.position += 1;
                if self.position < self.tokens.len()
                    && self.tokens[self.position].token_type == TokenType::OpenParen
                {
                    self.position += 1;
                    self.parse_function(token)
                } else {
                    Ok(ASTNode::new(
                        ASTNodeType::Variable(token.value.clone()),
                        Some(token),
                    ))
                }
            }
            TokenType::OpenParen => {
                self.position += 1;
                let expr = self.parse_expression()?;
                if self.position >= self.tokens.len()
                    || self.tokens[self.position].token_type != TokenType::CloseParen
                {
                    return Err(ParserError {
                        message: "expected closing parenthesis".to_string(),
                        position: self.end_position(),
                    });
                }
                self.position += 1;
                Ok(expr)
            }
            _ => Err(ParserError {
                message: format!("unexpected token '{}'", token.value),
                position: Some(token.start),
            }),
        }
    }

    fn parse_operand(&mut self, token: Token) -> Result<ASTNode, ParserError> {
        let start = token.start;
        match token.subtype {
            TokenSubType::Number => {
                let text = token.value.as_str();
                let invalid = |_| ParserError {
                    message: format!("invalid number '{text}'"),
                    position: Some(start),
                };
                // A bare digit run is an Int; anything fractional or in
                // scientific notation is a Float. Digit runs too long for
                // i64 fall back to Float as well.
                let value = if text.contains(['.', 'e', 'E']) {
                    Value::Float(text.parse::<f64>().map_err(invalid)?)
                } else {
                    match text.parse::<i64>() {
                        Ok(i) => Value::Int(i),
                        Err(_) => Value::Float(text.parse::<f64>().map_err(invalid)?),
                    }
                };
                Ok(ASTNode::new(ASTNodeType::Literal(value), Some(token)))
            }
            TokenSubType::Text => Ok(ASTNode::new(
                ASTNodeType::Literal(Value::Text(token.value.clone())),
                Some(token),
            )),
            TokenSubType::Logical => {
                let value = Value::Bool(token.value == "true");
                Ok(ASTNode::new(ASTNodeType::Literal(value), Some(token)))
            }
            TokenSubType::None => Err(ParserError {
                message: format!("unexpected operand '{}'", token.value),
                position: Some(start),
            }),
        }
    }

    fn parse_function(&mut self, name_token: Token) -> Result<ASTNode, ParserError> {
        let args = self.parse_function_arguments()?;
        Ok(ASTNode::new(
            ASTNodeType::Function {
                name: name_token.value.clone(),
                args,
            },
            Some(name_token),
        ))
    }

    fn parse_function_arguments(&mut self) -> Result<Vec<ASTNode>, ParserError> {
        let mut args = Vec::new();

        if self.position < self.tokens.len()
            && self.tokens[self.position].token_type == TokenType::CloseParen
        {
            self.position += 1;
            return Ok(args);
        }

        args.push(self.parse_expression()?);

        while self.position < self.tokens.len() {
            let token = &self.tokens[self.position];
            match token.token_type {
                TokenType::Separator => {
                    self.position += 1;
                    args.push(self.parse_expression()?);
                }
                TokenType::CloseParen => {
                    self.position += 1;
                    return Ok(args);
                }
                _ => {
                    return Err(ParserError {
                        message: format!(
                            "expected ',' or ')' in argument list, got '{}'",
                            token.value
                        ),
                        position: Some(token.start),
                    });
                }
            }
        }

        Err(ParserError {
            message: "unterminated argument list".to_string(),
            position: self.end_position(),
        })
    }
}

/// Parse an expression into an AST.
pub fn parse<T: AsRef<str>>(expression: T) -> Result<ASTNode, ParserError> {
    let tokens = Tokenizer::new(expression.as_ref())?.items;
    Parser::new(tokens).parse()
}
