pub mod solver_output;
pub mod trajectory_csv;

pub use solver_output::*;
pub use trajectory_csv::*;
