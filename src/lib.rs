//! # NQL
//!
//! An interactive in-memory relational data store with a small SQL-like
//! query language: lex, parse, validate, execute, format, the same
//! pipeline shape as a full SQL engine, scoped to single-table statements
//! without joins, subqueries, or transactions.
//!
//! ## Quick start
//!
//! ```rust
//! use nql::catalog::{Catalog, EngineConfig};
//! use nql::parser::Parser;
//! use nql::exec;
//!
//! let mut catalog = Catalog::new(EngineConfig::default());
//! let stmt = Parser::new("CREATE TABLE users (id INT PRIMARY KEY, name STRING(40))")
//!     .parse_statement()
//!     .unwrap();
//! // exec::execute validates the statement before running it.
//! exec::execute(&stmt, &mut catalog).unwrap();
//! ```

pub mod ast;
pub mod catalog;
pub mod error;
pub mod exec;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod validator;

pub use error::{Error, ErrorKind, Result};
pub use exec::{execute, ExecResult};
pub use parser::Parser;
pub use types::{DataType, Value};
