use hashbrown::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Type, found: Type },
}

/// Binds the type parameters of a single signature against argument types.
///
/// A fresh `Unification` is used per candidate overload. Parameters bind on
/// first use; later uses must agree with the binding, and a parameter seen
/// with `Dyn` widens to `Dyn`.
#[derive(Debug, Default)]
pub struct Unification {
    bindings: HashMap<Arc<str>, Type>,
}

impl Unification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    /// Check that a value of type `found` may be passed where `expected` is
    /// declared, recording parameter bindings.
    pub fn unify(&mut self, expected: &Type, found: &Type) -> Result<(), Error> {
        match (expected, found) {
            (Type::Param(name), _) => match self.bindings.get(name).cloned() {
                None => {
                    self.bindings.insert(name.clone(), found.clone());
                    Ok(())
                }
                Some(bound) => {
                    self.unify(&bound, found)?;
                    self.bindings.insert(name.clone(), join(&bound, found));
                    Ok(())
                }
            },
            (Type::Dyn, _) | (_, Type::Dyn) | (_, Type::Param(_)) => Ok(()),
            (Type::List(e1), Type::List(e2)) => self.unify(e1, e2),
            (Type::Map(k1, v1), Type::Map(k2, v2)) => {
                self.unify(k1, k2)?;
                self.unify(v1, v2)
            }
            (a, b) if a == b => Ok(()),
            _ => Err(Error::TypeMismatch {
                expected: self.finalize(expected),
                found: found.clone(),
            }),
        }
    }

    /// Substitute bindings into `ty`. Unbound parameters become `Dyn`.
    pub fn finalize(&self, ty: &Type) -> Type {
        match ty {
            Type::Param(name) => match self.bindings.get(name) {
                Some(bound) => self.finalize(bound),
                None => Type::Dyn,
            },
            Type::List(element) => Type::list(self.finalize(element)),
            Type::Map(key, value) => Type::map(self.finalize(key), self.finalize(value)),
            other => other.clone(),
        }
    }
}

/// Least common type of two types: equal types join to themselves,
/// containers join element-wise, anything else widens to `Dyn`.
pub fn join(a: &Type, b: &Type) -> Type {
    match (a, b) {
        (Type::List(e1), Type::List(e2)) => Type::list(join(e1, e2)),
        (Type::Map(k1, v1), Type::Map(k2, v2)) => Type::map(join(k1, k2), join(v1, v2)),
        _ if a == b => a.clone(),
        _ => Type::Dyn,
    }
}
