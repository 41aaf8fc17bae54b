use core::cell::{Cell, RefCell};
use std::sync::Arc;

use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::error::convert_pest_error;
use crate::parser::string_literal::unescape;
use crate::parser::{
    BinaryOp, Expr, ExprKind, Literal, NodeId, ParseError, ParseErrorKind, ParsedExpr, Span,
    UnaryOp,
};

/// Default limit on expression nesting.
///
/// Parsing, checking and evaluation all recurse over the tree, so the limit
/// keeps every stage well inside a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 100;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::ternary_op, Assoc::Right))  // `c ? a : b`
        .op(Op::infix(Rule::or, Assoc::Left))           // `||`
        .op(Op::infix(Rule::and, Assoc::Left))          // `&&`

        // Relations.
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::in_op, Assoc::Left)
        )                                               // `==`, `<`, `in`, ...

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                               // `*`, `/`, `%`
        .op(Op::prefix(Rule::not) | Op::prefix(Rule::neg)) // `!`, `-`

        // Postfix operators.
        .op(
            Op::postfix(Rule::member_call_op) |
            Op::postfix(Rule::field_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::call_op)
        )                                               // `.f()`, `.f`, `[]`, `()`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

/// Parse an expression with the default nesting limit.
pub fn parse(source: &str) -> Result<ParsedExpr, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse an expression, rejecting nesting deeper than `max_depth`.
///
/// A literal or identifier has depth 0; every operator, call, access or
/// literal container adds one to the depth of its deepest operand. Open
/// brackets are counted as well, even when they only group.
///
/// Either the whole tree is returned or the first syntax error; a partial
/// tree is never produced.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<ParsedExpr, ParseError> {
    check_nesting(source, max_depth)?;

    let mut pairs =
        ExpressionParser::parse(Rule::main, source).map_err(|e| convert_pest_error(e, source))?;

    let builder = AstBuilder {
        source,
        next_id: Cell::new(0),
        depths: RefCell::new(Vec::new()),
        max_depth,
    };
    let whole = Span::new(0, source.len());
    let main = builder.next_pair(&mut pairs, &whole)?;
    let main_span = Span::from(main.as_span());
    let expression = builder.next_pair(&mut main.into_inner(), &main_span)?;
    let expr = builder.parse_expression(expression)?;

    let node_count = builder.next_id.get();
    tracing::debug!(node_count, "parsed expression");

    Ok(ParsedExpr {
        expr,
        source: Arc::from(source),
        node_count,
    })
}

/// Reject over-deep nesting before handing the text to pest, whose descent
/// is recursive.
///
/// Brackets open a level. Prefix operators and `?` also recurse in pest, so
/// a run of prefix operators and every `?` up to the next `,` count toward
/// the enclosing level.
fn check_nesting(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut enclosing: Vec<usize> = Vec::new();
    let mut prefix_run = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_comment = false;
    let mut chars = source.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if in_comment {
            in_comment = c != '\n';
            continue;
        }
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            continue;
        }

        let next = chars.peek().map(|&(_, next)| next);
        match c {
            '!' if next != Some('=') => prefix_run += 1,
            '-' => prefix_run += 1,
            _ => prefix_run = 0,
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '/' if next == Some('/') => in_comment = true,
            '(' | '[' | '{' => {
                enclosing.push(depth);
                depth += 1;
            }
            ')' | ']' | '}' => depth = enclosing.pop().unwrap_or(0),
            ',' => depth = enclosing.last().map_or(0, |outer| outer + 1),
            '?' => depth += 1,
            _ => {}
        }
        if depth + prefix_run > max_depth {
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded { max_depth },
                source,
                Span::new(offset, offset + c.len_utf8()),
            ));
        }
    }
    Ok(())
}

/// Direct operands of a node.
fn children(kind: &ExprKind) -> Vec<&Expr> {
    match kind {
        ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
        ExprKind::Unary { expr, .. } => vec![&**expr],
        ExprKind::Call { target, args, .. } => target.as_deref().into_iter().chain(args).collect(),
        ExprKind::Index { value, index } => vec![&**value, &**index],
        ExprKind::Field { value, .. } => vec![&**value],
        ExprKind::Conditional {
            cond,
            then_branch,
            else_branch,
        } => vec![&**cond, &**then_branch, &**else_branch],
        ExprKind::List(items) => items.iter().collect(),
        ExprKind::Map(entries) => entries.iter().flat_map(|(key, value)| [key, value]).collect(),
        ExprKind::Literal(_) | ExprKind::Ident(_) => Vec::new(),
    }
}

struct AstBuilder<'s> {
    source: &'s str,
    next_id: Cell<u32>,
    /// Depth of every node built so far, indexed by node id.
    depths: RefCell<Vec<usize>>,
    max_depth: usize,
}

impl<'s> AstBuilder<'s> {
    fn node(&self, kind: ExprKind, span: Span) -> Result<Expr, ParseError> {
        let depth = {
            let depths = self.depths.borrow();
            children(&kind)
                .iter()
                .map(|child| depths.get(child.id.0 as usize).map_or(0, |depth| depth + 1))
                .max()
                .unwrap_or(0)
        };
        if depth > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
                span,
            ));
        }

        let id = NodeId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.depths.borrow_mut().push(depth);
        Ok(Expr { id, span, kind })
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source, span)
    }

    fn next_pair<'p>(
        &self,
        pairs: &mut Pairs<'p, Rule>,
        parent: &Span,
    ) -> Result<Pair<'p, Rule>, ParseError> {
        pairs.next().ok_or_else(|| {
            self.error(
                ParseErrorKind::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: "end of input".to_string(),
                },
                Span::new(parent.0.end, parent.0.end),
            )
        })
    }

    fn parse_expression(&self, pair: Pair<'s, Rule>) -> Result<Expr, ParseError> {
        PRATT_PARSER
            .map_primary(|primary| self.parse_primary(primary))
            .map_prefix(|op, rhs| self.parse_prefix(op, rhs?))
            .map_postfix(|lhs, op| self.parse_postfix(lhs?, op))
            .map_infix(|lhs, op, rhs| self.parse_infix(lhs?, op, rhs?))
            .parse(pair.into_inner())
    }

    fn parse_primary(&self, pair: Pair<'s, Rule>) -> Result<Expr, ParseError> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::number => {
                let text = pair.as_str();
                match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        self.node(ExprKind::Literal(Literal::Number(value)), span)
                    }
                    _ => Err(self.error(
                        ParseErrorKind::InvalidNumber {
                            text: text.to_string(),
                        },
                        span,
                    )),
                }
            }

            Rule::string => {
                let value = match pair.into_inner().next() {
                    Some(body) => unescape(body.as_str(), self.source, body.as_span().start())?,
                    None => String::new(),
                };
                self.node(ExprKind::Literal(Literal::Str(value)), span)
            }

            Rule::boolean => {
                let value = pair.as_str() == "true";
                self.node(ExprKind::Literal(Literal::Bool(value)), span)
            }

            Rule::null_lit => self.node(ExprKind::Literal(Literal::Null), span),

            Rule::ident => self.node(ExprKind::Ident(pair.as_str().to_string()), span),

            Rule::grouped => {
                let inner = self.next_pair(&mut pair.into_inner(), &span)?;
                self.parse_expression(inner)
            }

            Rule::list => {
                let items = pair
                    .into_inner()
                    .map(|item| self.parse_expression(item))
                    .collect::<Result<Vec<_>, _>>()?;
                self.node(ExprKind::List(items), span)
            }

            Rule::map => {
                let mut entries = Vec::new();
                for entry in pair.into_inner() {
                    let entry_span = Span::from(entry.as_span());
                    let mut inner = entry.into_inner();
                    let key = self.parse_expression(self.next_pair(&mut inner, &entry_span)?)?;
                    let value = self.parse_expression(self.next_pair(&mut inner, &entry_span)?)?;
                    entries.push((key, value));
                }
                self.node(ExprKind::Map(entries), span)
            }

            other => Err(self.error(
                ParseErrorKind::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: format!("{:?}", other),
                },
                span,
            )),
        }
    }

    fn parse_prefix(&self, op: Pair<'s, Rule>, rhs: Expr) -> Result<Expr, ParseError> {
        let op_span = Span::from(op.as_span());
        let op = match op.as_rule() {
            Rule::not => UnaryOp::Not,
            Rule::neg => UnaryOp::Neg,
            other => return Err(self.unexpected_operator(other, op_span)),
        };
        let span = Span::combine(&op_span, &rhs.span);
        self.node(
            ExprKind::Unary {
                op,
                expr: Box::new(rhs),
            },
            span,
        )
    }

    fn parse_postfix(&self, lhs: Expr, op: Pair<'s, Rule>) -> Result<Expr, ParseError> {
        let op_span = Span::from(op.as_span());
        let span = Span::combine(&lhs.span, &op_span);
        match op.as_rule() {
            Rule::member_call_op => {
                let mut inner = op.into_inner();
                let function = self.next_pair(&mut inner, &op_span)?.as_str().to_string();
                let args = inner
                    .map(|arg| self.parse_expression(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.node(
                    ExprKind::Call {
                        target: Some(Box::new(lhs)),
                        function,
                        args,
                    },
                    span,
                )
            }

            Rule::field_op => {
                let field = self
                    .next_pair(&mut op.into_inner(), &op_span)?
                    .as_str()
                    .to_string();
                self.node(
                    ExprKind::Field {
                        value: Box::new(lhs),
                        field,
                    },
                    span,
                )
            }

            Rule::index_op => {
                let index = self.parse_expression(self.next_pair(&mut op.into_inner(), &op_span)?)?;
                self.node(
                    ExprKind::Index {
                        value: Box::new(lhs),
                        index: Box::new(index),
                    },
                    span,
                )
            }

            Rule::call_op => {
                let ExprKind::Ident(function) = lhs.kind else {
                    return Err(self.error(
                        ParseErrorKind::NotCallable {
                            callee: lhs.span.str_of(self.source).to_string(),
                        },
                        lhs.span,
                    ));
                };
                let args = op
                    .into_inner()
                    .map(|arg| self.parse_expression(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.node(
                    ExprKind::Call {
                        target: None,
                        function,
                        args,
                    },
                    span,
                )
            }

            other => Err(self.unexpected_operator(other, op_span)),
        }
    }

    fn parse_infix(&self, lhs: Expr, op: Pair<'s, Rule>, rhs: Expr) -> Result<Expr, ParseError> {
        let op_span = Span::from(op.as_span());
        let span = Span::combine(&lhs.span, &rhs.span);
        let op = match op.as_rule() {
            Rule::ternary_op => {
                let then_branch =
                    self.parse_expression(self.next_pair(&mut op.into_inner(), &op_span)?)?;
                return self.node(
                    ExprKind::Conditional {
                        cond: Box::new(lhs),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(rhs),
                    },
                    span,
                );
            }
            Rule::or => BinaryOp::Or,
            Rule::and => BinaryOp::And,
            Rule::eq => BinaryOp::Eq,
            Rule::ne => BinaryOp::Ne,
            Rule::lt => BinaryOp::Lt,
            Rule::le => BinaryOp::Le,
            Rule::gt => BinaryOp::Gt,
            Rule::ge => BinaryOp::Ge,
            Rule::in_op => BinaryOp::In,
            Rule::add => BinaryOp::Add,
            Rule::sub => BinaryOp::Sub,
            Rule::mul => BinaryOp::Mul,
            Rule::div => BinaryOp::Div,
            Rule::rem => BinaryOp::Rem,
            other => return Err(self.unexpected_operator(other, op_span)),
        };
        self.node(
            ExprKind::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            },
            span,
        )
    }

    fn unexpected_operator(&self, rule: Rule, span: Span) -> ParseError {
        self.error(
            ParseErrorKind::UnexpectedToken {
                expected: "operator".to_string(),
                found: format!("{:?}", rule),
            },
            span,
        )
    }
}
