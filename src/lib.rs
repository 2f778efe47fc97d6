pub mod arith;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod line;
pub mod prelude;
pub mod script;
pub mod symbol;
pub mod syntax;
pub mod value;
