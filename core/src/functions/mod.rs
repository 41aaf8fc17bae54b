//! Function declarations and overload resolution.
//!
//! Every named call in an expression resolves, at check time, to exactly one
//! [`Overload`] registered under that name. Overload signatures may contain
//! type parameters (`Type::Param`), which are bound per resolution and never
//! escape into the checked tree.

mod registry;

pub use registry::{
    CallStyle, FunctionRegistry, NativeFn, Overload, Resolution, ResolutionError,
};
