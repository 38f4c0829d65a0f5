//! Untyped lambda calculus with named terms, reduced one step at a time.
//!
//! ```
//! use lambda::Evaluator;
//!
//! let mut evaluator = Evaluator::new();
//! evaluator.define("I", "λx.x").unwrap();
//! let steps: Vec<String> = evaluator
//!     .evaluate("I a")
//!     .map(|term| term.unwrap().to_string())
//!     .collect();
//! assert_eq!(steps, ["I a", "(λx.x) a", "a"]);
//! ```

pub mod config;
pub mod eval;
pub mod lexer;
pub mod library;
pub mod normalize;
pub mod parser;
pub mod reduce;
pub mod store;
pub mod subst;
pub mod term;

pub use eval::{EvalError, Evaluator};
pub use normalize::Normalize;
pub use parser::ParseError;
pub use reduce::Step;
pub use term::{Term, TermRef};
