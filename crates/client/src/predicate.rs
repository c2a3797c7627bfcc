//! Filter expressions for `where`-restricted queries
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! or   := and ("OR" and)*
//! and  := atom ("AND" atom)*
//! atom := "(" or ")" | "NOT" atom | column op integer
//! op   := "=" | "==" | "!=" | "<>" | "<" | "<=" | ">" | ">="
//! ```
//!
//! Only integer columns can be compared. Benchmark filters look like
//! `id > 1` or `id >= 10000`.

use crate::error::{ClientError, ClientResult};
use crate::schema::{DataType, Record, Schema};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `=` or `==`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column op value`
    Compare {
        /// Column name
        column: String,
        /// Operator
        op: CmpOp,
        /// Literal
        value: i64,
    },
    /// Both sides hold
    And(Box<Predicate>, Box<Predicate>),
    /// Either side holds
    Or(Box<Predicate>, Box<Predicate>),
    /// Negation
    Not(Box<Predicate>),
}

impl Predicate {
    /// Parse an expression
    pub fn parse(expr: &str) -> ClientResult<Self> {
        let tokens = tokenize(expr)?;
        let mut parser = Parser {
            expr,
            tokens,
            pos: 0,
            depth: 0,
            terms: 0,
        };
        let predicate = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(parser.error(format!(
                "unexpected {:?} after expression",
                parser.tokens[parser.pos]
            )));
        }
        Ok(predicate)
    }

    /// Check that every referenced column exists and holds integers
    pub fn validate(&self, expr: &str, schema: &Schema) -> ClientResult<()> {
        match self {
            Predicate::Compare { column, .. } => match schema.field(column) {
                Some(field) if field.data_type == DataType::Int32 => Ok(()),
                Some(_) => Err(ClientError::InvalidFilter {
                    expr: expr.to_string(),
                    reason: format!("column '{}' is not an integer column", column),
                }),
                None => Err(ClientError::InvalidFilter {
                    expr: expr.to_string(),
                    reason: format!("unknown column '{}'", column),
                }),
            },
            Predicate::And(a, b) | Predicate::Or(a, b) => {
                a.validate(expr, schema)?;
                b.validate(expr, schema)
            }
            Predicate::Not(inner) => inner.validate(expr, schema),
        }
    }

    /// Evaluate against a record; a missing column never matches
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Compare { column, op, value } => record
                .int32(column)
                .map(|v| op.apply(i64::from(v), *value))
                .unwrap_or(false),
            Predicate::And(a, b) => a.matches(record) && b.matches(record),
            Predicate::Or(a, b) => a.matches(record) || b.matches(record),
            Predicate::Not(inner) => !inner.matches(record),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(i64),
    Op(CmpOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> ClientResult<Vec<Token>> {
    let invalid = |reason: String| ClientError::InvalidFilter {
        expr: expr.to_string(),
        reason,
    };

    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' {
            tokens.push(Token::LParen);
            i += 1;
        } else if c == ')' {
            tokens.push(Token::RParen);
            i += 1;
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(match word.to_ascii_uppercase().as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "NOT" => Token::Not,
                _ => Token::Ident(word),
            });
        } else if c.is_ascii_digit()
            || (c == '-' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
        {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<i64>()
                .map_err(|e| invalid(format!("bad integer '{}': {}", literal, e)))?;
            tokens.push(Token::Int(value));
        } else {
            let next = chars.get(i + 1).copied();
            let (op, width) = match (c, next) {
                ('=', Some('=')) => (CmpOp::Eq, 2),
                ('=', _) => (CmpOp::Eq, 1),
                ('!', Some('=')) => (CmpOp::Ne, 2),
                ('<', Some('>')) => (CmpOp::Ne, 2),
                ('<', Some('=')) => (CmpOp::Le, 2),
                ('<', _) => (CmpOp::Lt, 1),
                ('>', Some('=')) => (CmpOp::Ge, 2),
                ('>', _) => (CmpOp::Gt, 1),
                _ => return Err(invalid(format!("unexpected character '{}'", c))),
            };
            tokens.push(Token::Op(op));
            i += width;
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Maximum parenthesis and `NOT` nesting in one expression
///
/// Parsing, evaluation and drop all recurse over the expression tree.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum comparisons in one expression
///
/// `AND`/`OR` chains build a tree as deep as the chain is long.
pub const MAX_TERMS: usize = 1024;

struct Parser<'a> {
    expr: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    terms: usize,
}

impl Parser<'_> {
    fn error(&self, reason: String) -> ClientError {
        ClientError::InvalidFilter {
            expr: self.expr.to_string(),
            reason,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> ClientResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn parse_or(&mut self) -> ClientResult<Predicate> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ClientResult<Predicate> {
        let mut lhs = self.parse_atom()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.parse_atom()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self) -> ClientResult<Predicate> {
        match self.next() {
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    other => Err(self.error(format!("expected ')', found {:?}", other))),
                }
            }
            Some(Token::Not) => {
                self.descend()?;
                let inner = self.parse_atom()?;
                self.depth -= 1;
                Ok(Predicate::Not(Box::new(inner)))
            }
            Some(Token::Ident(column)) => {
                self.terms += 1;
                if self.terms > MAX_TERMS {
                    return Err(self.error("expression has too many terms".to_string()));
                }
                let op = match self.next() {
                    Some(Token::Op(op)) => op,
                    other => {
                        return Err(self.error(format!(
                            "expected comparison after '{}', found {:?}",
                            column, other
                        )))
                    }
                };
                match self.next() {
                    Some(Token::Int(value)) => Ok(Predicate::Compare { column, op, value }),
                    other => Err(self.error(format!("expected integer, found {:?}", other))),
                }
            }
            None => Err(self.error("unexpected end of expression".to_string())),
            Some(other) => Err(self.error(format!("unexpected {:?}", other))),
        }
    }
}
