use crate::api::{Diagnostic, Severity};
use crate::diagnostics::context::Context;
use crate::parser::Span;
use crate::types::Type;

/// Type error with context
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub source: String,
    pub context: Vec<Context>,
}

impl core::fmt::Display for TypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        if let Some(ref help) = diagnostic.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for TypeError {}

/// Specific kinds of type errors
#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    /// Identifier that is not a declared variable
    UndeclaredReference { name: String, span: Span },
    /// Call to a name with no registered overloads
    UndeclaredFunction { name: String, span: Span },
    /// No overload accepts the argument types
    NoMatchingOverload {
        function: String,
        args: Vec<Type>,
        candidates: Vec<String>,
        span: Span,
    },
    /// More than one overload accepts the argument types
    AmbiguousOverload {
        function: String,
        args: Vec<Type>,
        overload_ids: Vec<String>,
        span: Span,
    },
    /// Type mismatch between expected and found types
    TypeMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },
    /// The whole expression has the wrong type
    WrongRootType {
        expected: Type,
        found: Type,
        span: Span,
    },
    /// Map literal key whose type can never be a map key
    InvalidMapKey { found: Type, span: Span },
    /// Index applied to something that is neither a list nor a map
    NotIndexable { ty: Type, span: Span },
    /// Field access on something that is not a map
    NotAMap { ty: Type, field: String, span: Span },
}

impl TypeErrorKind {
    /// Get the span of the error
    pub fn span(&self) -> Span {
        match self {
            TypeErrorKind::UndeclaredReference { span, .. }
            | TypeErrorKind::UndeclaredFunction { span, .. }
            | TypeErrorKind::NoMatchingOverload { span, .. }
            | TypeErrorKind::AmbiguousOverload { span, .. }
            | TypeErrorKind::TypeMismatch { span, .. }
            | TypeErrorKind::WrongRootType { span, .. }
            | TypeErrorKind::InvalidMapKey { span, .. }
            | TypeErrorKind::NotIndexable { span, .. }
            | TypeErrorKind::NotAMap { span, .. } => span.clone(),
        }
    }
}

fn render_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|ty| ty.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeError {
    /// Create a new TypeError with no context
    pub fn new(kind: TypeErrorKind, source: String) -> Self {
        Self {
            kind,
            source,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context.push(context);
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            TypeErrorKind::UndeclaredReference { name, .. } => (
                format!("Undeclared reference to '{}'", name),
                "E001",
                Some("Declare the variable in the environment before use".to_string()),
            ),
            TypeErrorKind::UndeclaredFunction { name, .. } => (
                format!("Undeclared function '{}'", name),
                "E002",
                None,
            ),
            TypeErrorKind::NoMatchingOverload {
                function,
                args,
                candidates,
                ..
            } => (
                format!(
                    "No matching overload for '{}' applied to ({})",
                    function,
                    render_types(args)
                ),
                "E003",
                (!candidates.is_empty())
                    .then(|| format!("Candidates are: {}", candidates.join("; "))),
            ),
            TypeErrorKind::AmbiguousOverload {
                function,
                args,
                overload_ids,
                ..
            } => (
                format!(
                    "Ambiguous call to '{}' with ({}): matches {}",
                    function,
                    render_types(args),
                    overload_ids.join(", ")
                ),
                "E004",
                Some("Make the argument types more specific".to_string()),
            ),
            TypeErrorKind::TypeMismatch {
                expected, found, ..
            } => (
                format!("Type mismatch: expected {}, found {}", expected, found),
                "E005",
                None,
            ),
            TypeErrorKind::WrongRootType {
                expected, found, ..
            } => (
                format!("Expression has type {}, expected {}", found, expected),
                "E006",
                None,
            ),
            TypeErrorKind::InvalidMapKey { found, .. } => (
                format!("Type {} cannot be used as a map key", found),
                "E007",
                Some("Map keys must be bool, number or string".to_string()),
            ),
            TypeErrorKind::NotIndexable { ty, .. } => (
                format!("Cannot index into non-indexable type {}", ty),
                "E008",
                Some("Only lists and maps can be indexed".to_string()),
            ),
            TypeErrorKind::NotAMap { ty, field, .. } => (
                format!("Cannot access field '{}' on type {}", field, ty),
                "E009",
                None,
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.kind.span(),
            related: self
                .context
                .iter()
                .map(|ctx| ctx.to_related_info())
                .collect(),
            help,
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_error_to_diagnostic() {
        let error = TypeError::new(
            TypeErrorKind::UndeclaredReference {
                name: "x".to_string(),
                span: Span(10..11),
            },
            "test source".to_string(),
        );

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "Undeclared reference to 'x'");
        assert_eq!(diagnostic.span, Span(10..11));
        assert_eq!(diagnostic.code, Some("E001".to_string()));
    }

    #[test]
    fn test_context_becomes_related_info() {
        let error = TypeError::new(
            TypeErrorKind::TypeMismatch {
                expected: Type::Bool,
                found: Type::String,
                span: Span(5..10),
            },
            "test source".to_string(),
        )
        .with_context(Context::InFunctionCall {
            name: Some("size".to_string()),
            span: Span(0..12),
        });

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.message, "Type mismatch: expected bool, found string");
        assert_eq!(diagnostic.related.len(), 1);
        assert_eq!(diagnostic.related[0].message, "in call to function 'size'");
        assert_eq!(diagnostic.related[0].span, Span(0..12));
    }
}
