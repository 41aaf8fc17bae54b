use crate::api::RelatedInfo;
use crate::parser::Span;

/// Where a type error occurred, beyond its own span.
///
/// Each entry becomes a [`RelatedInfo`] on the error's diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Context {
    /// In an argument of a function call
    InFunctionCall { name: Option<String>, span: Span },
    /// In an element of a literal or other enclosing expression
    InExpression { kind: String, span: Span },
}

impl Context {
    /// Convert to a RelatedInfo for diagnostic display
    pub fn to_related_info(&self) -> RelatedInfo {
        match self {
            Context::InFunctionCall { name, span } => RelatedInfo {
                span: span.clone(),
                message: match name {
                    Some(n) => format!("in call to function '{}'", n),
                    None => "in function call".to_string(),
                },
            },
            Context::InExpression { kind, span } => RelatedInfo {
                span: span.clone(),
                message: format!("in {}", kind),
            },
        }
    }
}
