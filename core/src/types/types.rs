use core::fmt::Display;
use std::sync::Arc;

use serde::Serialize;

/// Static types of expressions.
///
/// `Dyn` is assignable to and from every type; its checks are deferred to
/// runtime. `Param` only appears in function signatures and never in the
/// type of a checked expression.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Bool,
    Number,
    String,
    Dyn,
    List(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Param(Arc<str>),
}

impl Type {
    pub fn list(element: Type) -> Type {
        Type::List(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn param(name: &str) -> Type {
        Type::Param(Arc::from(name))
    }

    pub fn is_dyn(&self) -> bool {
        matches!(self, Type::Dyn)
    }

    pub fn has_params(&self) -> bool {
        match self {
            Type::Param(_) => true,
            Type::List(element) => element.has_params(),
            Type::Map(key, value) => key.has_params() || value.has_params(),
            _ => false,
        }
    }

    /// Rename type parameters by order of first appearance across `types`.
    ///
    /// Two signatures with equal canonical forms accept exactly the same
    /// arguments.
    pub fn canonical_all(types: &[Type]) -> Vec<Type> {
        let mut names: Vec<Arc<str>> = Vec::new();
        types
            .iter()
            .map(|ty| ty.canonicalize(&mut names))
            .collect()
    }

    fn canonicalize(&self, names: &mut Vec<Arc<str>>) -> Type {
        match self {
            Type::Param(name) => {
                let index = match names.iter().position(|n| n == name) {
                    Some(index) => index,
                    None => {
                        names.push(name.clone());
                        names.len() - 1
                    }
                };
                Type::Param(Arc::from(format!("_{}", index)))
            }
            Type::List(element) => Type::list(element.canonicalize(names)),
            Type::Map(key, value) => Type::map(key.canonicalize(names), value.canonicalize(names)),
            other => other.clone(),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Type::Null => write!(f, "null"),
            Type::Bool => write!(f, "bool"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Dyn => write!(f, "dyn"),
            Type::List(element) => write!(f, "list({})", element),
            Type::Map(key, value) => write!(f, "map({}, {})", key, value),
            Type::Param(name) => write!(f, "{}", name),
        }
    }
}
