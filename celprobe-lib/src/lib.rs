//! Core library for celprobe
//!
//! This library evaluates CEL fingerprint rules against captured HTTP requests and
//! responses, the way web vulnerability and asset fingerprinting scanners match targets.
//!
//! # Module Organization
//!
//! - [`model`]: The request, response, and URL objects visible to expressions
//! - [`functions`]: Builtin functions callable from expressions
//! - [`env`]: The environment declaring variables, object types, and functions
//! - [`eval`]: Compiling and evaluating expressions against bindings
//! - [`rules`]: Rule sets and capture files
//! - [`commands`]: Command-line interface and orchestration
//!
//! # Example
//!
//! ```
//! use celprobe_lib::env::Environment;
//! use celprobe_lib::eval::{Bindings, compile};
//! use celprobe_lib::model::{Response, UrlType};
//!
//! let env = Environment::new();
//! let rule = compile(&env, r#"response.status == 200 && bcontains(response.body, b"nginx")"#).unwrap();
//!
//! let url: UrlType = "http://example.com/".parse().unwrap();
//! let response = Response::new(200, url).with_body(b"welcome to nginx".to_vec());
//! let bindings = Bindings::new().with_response(response);
//!
//! assert!(rule.matches(&bindings).unwrap());
//! ```

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod env;
pub mod eval;
pub mod functions;
pub mod model;
pub mod rules;

pub use crate::commands::{Host, run};
