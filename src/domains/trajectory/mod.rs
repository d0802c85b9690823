pub mod builder;
pub mod facts;
pub mod parser;
pub mod term;
pub mod types;

pub use builder::*;
pub use facts::*;
pub use parser::*;
pub use types::*;
