use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};

/// A syntax error. Parsing stops at the first one; no partial tree is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Number literal that does not denote a finite number
    InvalidNumber { text: String },
    /// Unknown escape sequence inside a string literal
    InvalidEscape { sequence: String },
    /// Call syntax applied to something other than a function name
    NotCallable { callee: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { max_depth: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, span: Span) -> Self {
        Self {
            kind,
            source: source.to_string(),
            span,
        }
    }

    /// 1-based (line, column) where the error starts.
    pub fn position(&self) -> (usize, usize) {
        self.span.line_col(&self.source)
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("Expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidNumber { text } => {
                format!("Invalid number literal '{}'", text)
            }
            ParseErrorKind::InvalidEscape { sequence } => {
                format!("Invalid escape sequence '{}'", sequence)
            }
            ParseErrorKind::NotCallable { callee } => {
                format!("'{}' cannot be called; only function names can", callee)
            }
            ParseErrorKind::MaxDepthExceeded { max_depth } => format!(
                "Expression nesting depth exceeds maximum of {} levels",
                max_depth
            ),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::InvalidNumber { .. } => ("P002", Some("Check the number format")),
            ParseErrorKind::InvalidEscape { .. } => (
                "P003",
                Some("Supported escapes are \\n, \\t, \\r, \\0, \\\\, \\' and \\\""),
            ),
            ParseErrorKind::NotCallable { .. } => (
                "P004",
                Some("Call a registered function by name, e.g. size(x) or x.size()"),
            ),
            ParseErrorKind::MaxDepthExceeded { .. } => (
                "P005",
                Some("Reduce nesting or simplify the expression"),
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.message(),
            span: self.span.clone(),
            related: Vec::new(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (line, column) = self.position();
        write!(f, "syntax error at {}:{}: {}", line, column, self.message())
    }
}

impl std::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub(crate) fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let expected = match err.variant {
        ErrorVariant::ParsingError { positives, .. } => format_expected_rules(&positives),
        ErrorVariant::CustomError { message } => message,
    };
    let found = describe_found(source, span.0.start);

    ParseError::new(
        ParseErrorKind::UnexpectedToken { expected, found },
        source,
        span,
    )
}

fn format_expected_rules(rules: &[Rule]) -> String {
    let mut names: Vec<&str> = rules.iter().map(|rule| rule_name(*rule)).collect();
    names.sort_unstable();
    names.dedup();
    match names.as_slice() {
        [] => "a valid expression".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn rule_name(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression | Rule::main => "expression",
        Rule::not | Rule::neg => "unary operator",
        Rule::member_call_op | Rule::field_op => "'.'",
        Rule::index_op => "'['",
        Rule::call_op | Rule::grouped => "'('",
        Rule::ternary_op
        | Rule::or
        | Rule::and
        | Rule::eq
        | Rule::ne
        | Rule::le
        | Rule::ge
        | Rule::lt
        | Rule::gt
        | Rule::in_op
        | Rule::add
        | Rule::sub
        | Rule::mul
        | Rule::div
        | Rule::rem => "operator",
        Rule::number => "number",
        Rule::string | Rule::single_quoted | Rule::double_quoted => "string",
        Rule::boolean => "boolean",
        Rule::null_lit => "null",
        Rule::list => "list",
        Rule::map | Rule::map_entry => "map",
        Rule::ident | Rule::keyword => "identifier",
        _ => "token",
    }
}

fn describe_found(source: &str, offset: usize) -> String {
    match source.get(offset..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}
