use hashbrown::HashMap;

use crate::analyzer::checked_ast::{CheckedAst, OverloadRef};
use crate::analyzer::error::{TypeError, TypeErrorKind};
use crate::api::Environment;
use crate::diagnostics::Context;
use crate::functions::{CallStyle, ResolutionError};
use crate::parser::{BinaryOp, Expr, ExprKind, Literal, NodeId, ParsedExpr, Span, UnaryOp};
use crate::types::{Type, Unification, join};

/// Type check `parsed` against `env`.
///
/// Every error that does not depend on another is reported: a failing
/// subtree suppresses errors in its ancestors, never in its siblings.
pub fn check(env: &Environment, parsed: &ParsedExpr) -> Result<CheckedAst, Vec<TypeError>> {
    let mut analyzer = Analyzer {
        env,
        source: &parsed.source,
        types: HashMap::new(),
        overloads: HashMap::new(),
        errors: Vec::new(),
    };
    let output_type = analyzer.analyze(&parsed.expr);

    match output_type {
        Some(output_type) if analyzer.errors.is_empty() => {
            tracing::debug!(%output_type, nodes = analyzer.types.len(), "expression checked");
            Ok(CheckedAst {
                parsed: parsed.clone(),
                types: analyzer.types,
                overloads: analyzer.overloads,
                output_type,
                environment: env.id(),
            })
        }
        _ => {
            tracing::debug!(errors = analyzer.errors.len(), "type check failed");
            Err(analyzer.errors)
        }
    }
}

struct Analyzer<'a> {
    env: &'a Environment,
    source: &'a str,
    types: HashMap<NodeId, Type>,
    overloads: HashMap<NodeId, OverloadRef>,
    errors: Vec<TypeError>,
}

/// Shape accepted by an operand position.
fn accepts(ty: &Type, wanted: &Type) -> bool {
    ty.is_dyn() || ty == wanted
}

fn is_key_type(ty: &Type) -> bool {
    matches!(ty, Type::Bool | Type::Number | Type::String | Type::Dyn)
}

impl<'a> Analyzer<'a> {
    fn error(&mut self, kind: TypeErrorKind) -> Option<Type> {
        self.errors.push(TypeError::new(kind, self.source.to_string()));
        None
    }

    fn mismatch(&mut self, expected: Type, found: &Type, span: &Span) -> Option<Type> {
        self.error(TypeErrorKind::TypeMismatch {
            expected,
            found: found.clone(),
            span: span.clone(),
        })
    }

    fn no_operator(&mut self, op: &str, args: &[&Type], span: &Span) -> Option<Type> {
        self.error(TypeErrorKind::NoMatchingOverload {
            function: op.to_string(),
            args: args.iter().map(|ty| (*ty).clone()).collect(),
            candidates: Vec::new(),
            span: span.clone(),
        })
    }

    /// Attach `context` to every error reported since `mark`.
    fn add_context_since(&mut self, mark: usize, context: Context) {
        for error in &mut self.errors[mark..] {
            error.context.push(context.clone());
        }
    }

    fn analyze(&mut self, expr: &Expr) -> Option<Type> {
        let ty = match &expr.kind {
            ExprKind::Literal(literal) => Some(match literal {
                Literal::Null => Type::Null,
                Literal::Bool(_) => Type::Bool,
                Literal::Number(_) => Type::Number,
                Literal::Str(_) => Type::String,
            }),
            ExprKind::Ident(name) => self.analyze_ident(name, &expr.span),
            ExprKind::Unary { op, expr: operand } => self.analyze_unary(*op, operand, &expr.span),
            ExprKind::Binary { op, left, right } => {
                self.analyze_binary(*op, left, right, &expr.span)
            }
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => self.analyze_conditional(cond, then_branch, else_branch),
            ExprKind::Field { value, field } => self.analyze_field(value, field, &expr.span),
            ExprKind::Index { value, index } => self.analyze_index(value, index, &expr.span),
            ExprKind::Call {
                target,
                function,
                args,
            } => self.analyze_call(expr.id, target.as_deref(), function, args, &expr.span),
            ExprKind::List(items) => self.analyze_list(items, &expr.span),
            ExprKind::Map(entries) => self.analyze_map(entries, &expr.span),
        }?;
        self.types.insert(expr.id, ty.clone());
        Some(ty)
    }

    fn analyze_ident(&mut self, name: &str, span: &Span) -> Option<Type> {
        match self.env.variable(name) {
            Some(ty) => Some(ty.clone()),
            None => self.error(TypeErrorKind::UndeclaredReference {
                name: name.to_string(),
                span: span.clone(),
            }),
        }
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: &Expr, span: &Span) -> Option<Type> {
        let ty = self.analyze(operand)?;
        let result = match op {
            UnaryOp::Not => Type::Bool,
            UnaryOp::Neg => Type::Number,
        };
        if accepts(&ty, &result) {
            Some(result)
        } else {
            self.no_operator(op.symbol(), &[&ty], span)
        }
    }

    fn analyze_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: &Span,
    ) -> Option<Type> {
        // Both sides are checked even when one fails.
        let left_ty = self.analyze(left);
        let right_ty = self.analyze(right);
        let (l, r) = (left_ty?, right_ty?);

        let result = match op {
            BinaryOp::And | BinaryOp::Or => {
                (accepts(&l, &Type::Bool) && accepts(&r, &Type::Bool)).then_some(Type::Bool)
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let comparable = matches!(l, Type::Null)
                    || matches!(r, Type::Null)
                    || Unification::new().unify(&l, &r).is_ok();
                comparable.then_some(Type::Bool)
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (&l, &r) {
                (Type::Number | Type::Dyn, Type::Number | Type::Dyn)
                | (Type::String | Type::Dyn, Type::String | Type::Dyn) => Some(Type::Bool),
                _ => None,
            },
            BinaryOp::Add => match (&l, &r) {
                (Type::Dyn, Type::Dyn) => Some(Type::Dyn),
                (Type::Number, Type::Number) | (Type::Number, Type::Dyn) => Some(Type::Number),
                (Type::Dyn, Type::Number) => Some(Type::Number),
                (Type::String, Type::String) | (Type::String, Type::Dyn) => Some(Type::String),
                (Type::Dyn, Type::String) => Some(Type::String),
                (Type::List(a), Type::List(b)) => Some(Type::list(join(a, b))),
                (Type::List(_), Type::Dyn) | (Type::Dyn, Type::List(_)) => {
                    Some(Type::list(Type::Dyn))
                }
                _ => None,
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                (accepts(&l, &Type::Number) && accepts(&r, &Type::Number)).then_some(Type::Number)
            }
            BinaryOp::In => match &r {
                Type::Dyn => Some(Type::Bool),
                Type::List(element) => Unification::new()
                    .unify(element, &l)
                    .is_ok()
                    .then_some(Type::Bool),
                Type::Map(key, _) => (is_key_type(&l) && Unification::new().unify(key, &l).is_ok())
                    .then_some(Type::Bool),
                _ => None,
            },
        };

        match result {
            Some(ty) => Some(ty),
            None => self.no_operator(op.symbol(), &[&l, &r], span),
        }
    }

    fn analyze_conditional(
        &mut self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> Option<Type> {
        let cond_ty = self.analyze(cond);
        let then_ty = self.analyze(then_branch);
        let else_ty = self.analyze(else_branch);

        let cond_ok = match &cond_ty {
            Some(ty) if !accepts(ty, &Type::Bool) => {
                self.mismatch(Type::Bool, ty, &cond.span);
                false
            }
            Some(_) => true,
            None => false,
        };
        let (then_ty, else_ty) = (then_ty?, else_ty?);
        cond_ok.then(|| join(&then_ty, &else_ty))
    }

    fn analyze_field(&mut self, value: &Expr, field: &str, span: &Span) -> Option<Type> {
        let ty = self.analyze(value)?;
        match &ty {
            Type::Dyn => Some(Type::Dyn),
            Type::Map(key, value) if accepts(key, &Type::String) => Some((**value).clone()),
            _ => self.error(TypeErrorKind::NotAMap {
                ty: ty.clone(),
                field: field.to_string(),
                span: span.clone(),
            }),
        }
    }

    fn analyze_index(&mut self, value: &Expr, index: &Expr, span: &Span) -> Option<Type> {
        let value_ty = self.analyze(value);
        let index_ty = self.analyze(index);
        let (value_ty, index_ty) = (value_ty?, index_ty?);

        match &value_ty {
            Type::Dyn => {
                if is_key_type(&index_ty) {
                    Some(Type::Dyn)
                } else {
                    self.error(TypeErrorKind::InvalidMapKey {
                        found: index_ty,
                        span: index.span.clone(),
                    })
                }
            }
            Type::List(element) => {
                if accepts(&index_ty, &Type::Number) {
                    Some((**element).clone())
                } else {
                    self.mismatch(Type::Number, &index_ty, &index.span)
                }
            }
            Type::Map(key, element) => {
                if !is_key_type(&index_ty) {
                    self.error(TypeErrorKind::InvalidMapKey {
                        found: index_ty,
                        span: index.span.clone(),
                    })
                } else if Unification::new().unify(key, &index_ty).is_err() {
                    self.mismatch((**key).clone(), &index_ty, &index.span)
                } else {
                    Some((**element).clone())
                }
            }
            _ => self.error(TypeErrorKind::NotIndexable {
                ty: value_ty.clone(),
                span: span.clone(),
            }),
        }
    }

    fn analyze_call(
        &mut self,
        id: NodeId,
        target: Option<&Expr>,
        function: &str,
        args: &[Expr],
        span: &Span,
    ) -> Option<Type> {
        let mark = self.errors.len();
        let mut arg_types = Vec::with_capacity(args.len() + 1);
        for arg in target.into_iter().chain(args) {
            arg_types.push(self.analyze(arg));
        }
        self.add_context_since(
            mark,
            Context::InFunctionCall {
                name: Some(function.to_string()),
                span: span.clone(),
            },
        );
        let arg_types: Vec<Type> = arg_types.into_iter().collect::<Option<_>>()?;

        let style = if target.is_some() {
            CallStyle::Member
        } else {
            CallStyle::Global
        };
        match self.env.functions().resolve(function, style, &arg_types) {
            Ok(resolution) => {
                self.overloads.insert(
                    id,
                    OverloadRef {
                        function: function.to_string(),
                        overload_id: resolution.overload_id,
                    },
                );
                Some(resolution.result)
            }
            Err(ResolutionError::UndeclaredFunction) => {
                self.error(TypeErrorKind::UndeclaredFunction {
                    name: function.to_string(),
                    span: span.clone(),
                })
            }
            Err(ResolutionError::NoMatch { candidates }) => {
                self.error(TypeErrorKind::NoMatchingOverload {
                    function: function.to_string(),
                    args: arg_types,
                    candidates,
                    span: span.clone(),
                })
            }
            Err(ResolutionError::Ambiguous { overload_ids }) => {
                self.error(TypeErrorKind::AmbiguousOverload {
                    function: function.to_string(),
                    args: arg_types,
                    overload_ids: overload_ids.iter().map(|id| id.to_string()).collect(),
                    span: span.clone(),
                })
            }
        }
    }

    fn analyze_list(&mut self, items: &[Expr], span: &Span) -> Option<Type> {
        let mark = self.errors.len();
        let types: Vec<Option<Type>> = items.iter().map(|item| self.analyze(item)).collect();
        self.add_context_since(
            mark,
            Context::InExpression {
                kind: "list literal".to_string(),
                span: span.clone(),
            },
        );
        let types: Vec<Type> = types.into_iter().collect::<Option<_>>()?;
        let element = types
            .split_first()
            .map(|(first, rest)| rest.iter().fold(first.clone(), |acc, ty| join(&acc, ty)))
            .unwrap_or(Type::Dyn);
        Some(Type::list(element))
    }

    fn analyze_map(&mut self, entries: &[(Expr, Expr)], span: &Span) -> Option<Type> {
        let mark = self.errors.len();
        let mut ok = true;
        let mut key_type: Option<Type> = None;
        let mut value_type: Option<Type> = None;
        for (key, value) in entries {
            let k = self.analyze(key);
            let v = self.analyze(value);
            if let Some(k) = &k {
                if !is_key_type(k) {
                    self.error(TypeErrorKind::InvalidMapKey {
                        found: k.clone(),
                        span: key.span.clone(),
                    });
                    ok = false;
                }
            }
            match (k, v) {
                (Some(k), Some(v)) => {
                    key_type = Some(key_type.map_or(k.clone(), |acc| join(&acc, &k)));
                    value_type = Some(value_type.map_or(v.clone(), |acc| join(&acc, &v)));
                }
                _ => ok = false,
            }
        }
        self.add_context_since(
            mark,
            Context::InExpression {
                kind: "map literal".to_string(),
                span: span.clone(),
            },
        );
        ok.then(|| {
            Type::map(
                key_type.unwrap_or(Type::Dyn),
                value_type.unwrap_or(Type::Dyn),
            )
        })
    }
}
