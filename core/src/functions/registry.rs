use core::fmt;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::api::EnvironmentError;
use crate::types::{Type, Unification};
use crate::values::Value;

/// Native implementation of an overload.
///
/// Implementations receive the evaluated arguments (the receiver first for
/// member calls) and never see `Value::Error` arguments. They must be pure:
/// a plain function pointer cannot capture shared state.
pub type NativeFn = fn(&[Value]) -> Value;

/// How an overload is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStyle {
    /// `f(a, b)`
    Global,
    /// `a.f(b)`; the receiver is the first parameter.
    Member,
}

#[derive(Debug, Clone)]
pub struct Overload {
    pub id: Arc<str>,
    pub style: CallStyle,
    pub params: Vec<Type>,
    pub result: Type,
    pub function: NativeFn,
}

impl Overload {
    pub fn global(id: &str, params: Vec<Type>, result: Type, function: NativeFn) -> Self {
        Self {
            id: Arc::from(id),
            style: CallStyle::Global,
            params,
            result,
            function,
        }
    }

    /// A member overload. `params[0]` is the receiver type.
    pub fn member(id: &str, params: Vec<Type>, result: Type, function: NativeFn) -> Self {
        Self {
            id: Arc::from(id),
            style: CallStyle::Member,
            params,
            result,
            function,
        }
    }

    /// Human-readable signature, e.g. `map(A, B).contains(A, B) -> bool`.
    pub fn signature(&self, name: &str) -> String {
        let render = |params: &[Type]| {
            params
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match (self.style, self.params.split_first()) {
            (CallStyle::Member, Some((receiver, rest))) => {
                format!("{}.{}({}) -> {}", receiver, name, render(rest), self.result)
            }
            _ => format!("{}({}) -> {}", name, render(&self.params), self.result),
        }
    }

    fn same_shape(&self, other: &Overload) -> bool {
        self.style == other.style
            && self.params.len() == other.params.len()
            && Type::canonical_all(&self.params) == Type::canonical_all(&other.params)
    }
}

/// The overload a call resolved to, with its result type finalized against
/// the call's argument types.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub overload_id: Arc<str>,
    pub result: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// No overload of any shape is registered under the name.
    UndeclaredFunction,
    /// Overloads exist but none accepts the argument types.
    NoMatch { candidates: Vec<String> },
    /// More than one overload accepts the argument types.
    Ambiguous { overload_ids: Vec<Arc<str>> },
}

/// Function name to ordered overload list.
///
/// Overload ids are unique across the whole registry.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Vec<Overload>>,
    ids: HashSet<Arc<str>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, overload: Overload) -> Result<(), EnvironmentError> {
        if self.ids.contains(&overload.id) {
            return Err(EnvironmentError::DuplicateOverloadId {
                overload_id: overload.id.to_string(),
            });
        }
        let overloads = self.functions.entry(name.to_string()).or_default();
        if overloads.iter().any(|existing| existing.same_shape(&overload)) {
            return Err(EnvironmentError::ConflictingOverload {
                function: name.to_string(),
                overload_id: overload.id.to_string(),
            });
        }
        self.ids.insert(overload.id.clone());
        overloads.push(overload);
        Ok(())
    }

    /// Overloads registered under `name`, in registration order.
    pub fn overloads(&self, name: &str) -> &[Overload] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn find(&self, name: &str, overload_id: &str) -> Option<&Overload> {
        self.overloads(name)
            .iter()
            .find(|overload| &*overload.id == overload_id)
    }

    /// Pick the single overload of `name` accepting `args`.
    ///
    /// For member calls `args[0]` is the receiver type. Candidates of the
    /// right style and arity are tried in registration order; each argument is
    /// unified left to right and a candidate is abandoned at its first
    /// mismatch.
    pub fn resolve(
        &self,
        name: &str,
        style: CallStyle,
        args: &[Type],
    ) -> Result<Resolution, ResolutionError> {
        let overloads = self.overloads(name);
        if overloads.is_empty() {
            return Err(ResolutionError::UndeclaredFunction);
        }

        let mut matches: Vec<Resolution> = Vec::new();
        for overload in overloads {
            if overload.style != style || overload.params.len() != args.len() {
                continue;
            }
            let mut unification = Unification::new();
            let accepted = overload
                .params
                .iter()
                .zip(args)
                .try_for_each(|(param, arg)| unification.unify(param, arg));
            match accepted {
                Ok(()) => {
                    tracing::trace!(function = name, overload = %overload.id, "overload matched");
                    matches.push(Resolution {
                        overload_id: overload.id.clone(),
                        result: unification.finalize(&overload.result),
                    });
                }
                Err(err) => {
                    tracing::trace!(function = name, overload = %overload.id, %err, "overload rejected");
                }
            }
        }

        match matches.len() {
            0 => Err(ResolutionError::NoMatch {
                candidates: overloads.iter().map(|o| o.signature(name)).collect(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(ResolutionError::Ambiguous {
                overload_ids: matches.into_iter().map(|m| m.overload_id).collect(),
            }),
        }
    }
}

impl fmt::Display for CallStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStyle::Global => write!(f, "global"),
            CallStyle::Member => write!(f, "member"),
        }
    }
}
