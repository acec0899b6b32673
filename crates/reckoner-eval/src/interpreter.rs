//! AST evaluation against a binding map.

use smallvec::SmallVec;

use reckoner_common::{EvalError, EvalErrorKind, Value};
use reckoner_parse::{ASTNode, ASTNodeType};

use rustc_hash::FxHashMap;

use crate::calculator::Binding;
use crate::coercion::{self, Num};
use crate::function_registry;
use crate::traits::ArgHandle;

/// Evaluates nodes against a borrowed binding map. The interpreter holds
/// no state of its own; variable resolution, including stored-formula
/// indirection, goes through the map on every lookup.
pub struct Interpreter<'a> {
    bindings: &'a FxHashMap<String, Binding>,
}

impl<'a> Interpreter<'a> {
    pub fn new(bindings: &'a FxHashMap<String, Binding>) -> Self {
        Self { bindings }
    }

    pub fn evaluate(&self, node: &ASTNode) -> Result<Value, EvalError> {
        match &node.node_type {
            ASTNodeType::Literal(value) => Ok(value.clone()),
            ASTNodeType::Variable(name) => self.eval_variable(name),
            ASTNodeType::UnaryOp { op, expr } => self.eval_unary(op, expr),
            ASTNodeType::BinaryOp { op, left, right } => self.eval_binary(op, left, right),
            ASTNodeType::Function { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_variable(&self, name: &str) -> Result<Value, EvalError> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            // A stored formula is evaluated against the same bindings
            // each time it is referenced.
            Some(Binding::Formula(node)) => self.evaluate(node),
            None => Err(EvalError::new(EvalErrorKind::Unbound)
                .with_message(format!("no value for '{name}'"))
                .with_variable(name)),
        }
    }

    fn eval_unary(&self, op: &str, expr: &ASTNode) -> Result<Value, EvalError> {
        let value = self.evaluate(expr)?;
        match op {
            "not" => Ok(Value::Bool(!value.is_truthy())),
            "-" => {
                let n = self.numeric_operand(op, &value)?;
                Ok(coercion::neg(n).into_value())
            }
            "+" => {
                let n = self.numeric_operand(op, &value)?;
                Ok(n.into_value())
            }
            _ => Err(EvalError::new(EvalErrorKind::Argument)
                .with_message(format!("unknown unary operator '{op}'"))),
        }
    }

    fn eval_binary(&self, op: &str, left: &ASTNode, right: &ASTNode) -> Result<Value, EvalError> {
        match op {
            // Combinators short-circuit: the right side of a decided
            // `and`/`or` is never evaluated.
            "and" => {
                let l = self.evaluate(left)?;
                if !l.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let r = self.evaluate(right)?;
                Ok(Value::Bool(r.is_truthy()))
            }
            "or" => {
                let l = self.evaluate(left)?;
                if l.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let r = self.evaluate(right)?;
                Ok(Value::Bool(r.is_truthy()))
            }
            "==" | "!=" | "<" | "<=" | ">" | ">=" => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                self.eval_comparison(op, &l, &r)
            }
            "+" | "-" | "*" | "/" | "%" | "^" => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                self.eval_arithmetic(op, &l, &r)
            }
            _ => Err(EvalError::new(EvalErrorKind::Argument)
                .with_message(format!("unknown operator '{op}'"))),
        }
    }

    fn eval_arithmetic(&self, op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
        let l = self.numeric_operand(op, left)?;
        let r = self.numeric_operand(op, right)?;
        match op {
            "+" => Ok(coercion::add(l, r).into_value()),
            "-" => Ok(coercion::sub(l, r).into_value()),
            "*" => Ok(coercion::mul(l, r).into_value()),
            "/" => coercion::div(l, r),
            "%" => coercion::rem(l, r),
            "^" => Ok(coercion::pow(l, r)),
            _ => Err(EvalError::new(EvalErrorKind::Argument)
                .with_message(format!("unknown operator '{op}'"))),
        }
    }

    fn eval_comparison(&self, op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
        use std::cmp::Ordering;

        // Equality never fails: mismatched types are simply unequal.
        if op == "==" || op == "!=" {
            let equal = match (coercion::numeric(left), coercion::numeric(right)) {
                (Some(l), Some(r)) => l.as_f64() == r.as_f64(),
                _ => left == right,
            };
            return Ok(Value::Bool(if op == "==" { equal } else { !equal }));
        }

        let ordering = match (coercion::numeric(left), coercion::numeric(right)) {
            (Some(l), Some(r)) => l.as_f64().partial_cmp(&r.as_f64()).ok_or_else(|| {
                EvalError::new(EvalErrorKind::Argument)
                    .with_message(format!("cannot order {left} against {right}"))
            })?,
            _ => match (left, right) {
                (Value::Text(l), Value::Text(r)) => l.cmp(r),
                _ => {
                    return Err(EvalError::new(EvalErrorKind::Argument).with_message(format!(
                        "cannot order {} against {}",
                        left.type_name(),
                        right.type_name()
                    )));
                }
            },
        };

        Ok(Value::Bool(match op {
            "<" => ordering == Ordering::Less,
            "<=" => ordering != Ordering::Greater,
            ">" => ordering == Ordering::Greater,
            ">=" => ordering != Ordering::Less,
            _ => false,
        }))
    }

    fn eval_function(&self, name: &str, args: &[ASTNode]) -> Result<Value, EvalError> {
        let function = function_registry::get(name).ok_or_else(|| {
            EvalError::new(EvalErrorKind::Unbound)
                .with_message("undefined function")
                .with_variable(name)
        })?;

        let argc = args.len();
        if argc < function.min_args() || function.max_args().is_some_and(|max| argc > max) {
            return Err(EvalError::new(EvalErrorKind::Argument).with_message(format!(
                "wrong number of arguments for {}(): got {argc}",
                function.name()
            )));
        }

        let handles: SmallVec<[ArgHandle<'_, '_>; 4]> =
            args.iter().map(|node| ArgHandle::new(node, self)).collect();
        function.call(&handles)
    }

    fn numeric_operand(&self, op: &str, value: &Value) -> Result<Num, EvalError> {
        coercion::numeric(value).ok_or_else(|| {
            EvalError::new(EvalErrorKind::Argument)
                .with_message(format!("'{op}' expects a number, got {}", value.type_name()))
        })
    }
}
