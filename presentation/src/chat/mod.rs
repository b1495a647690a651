//! Interactive chat console

mod repl;

pub use repl::ChatRepl;
