//! Runtime type system: scalar values and column data types.

pub mod value;

pub use value::{format, parse_literal, DataType, Value};
