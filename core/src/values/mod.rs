mod value;

pub use value::{ErrorKind, ErrorValue, KeyDomain, MapKey, MapValue, Value, format_number, quote_str};
pub(crate) use value::is_integral;

#[cfg(test)]
mod value_test;
