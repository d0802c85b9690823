pub mod console_logger;
pub mod file_logger;
pub mod generator;
pub mod multi_logger;
pub mod noop_logger;
pub mod params_file;
pub mod process_runner;
pub mod solver;
pub mod trajectory_csv;

pub use console_logger::*;
pub use file_logger::*;
pub use generator::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use params_file::*;
pub use process_runner::*;
pub use solver::*;
pub use trajectory_csv::*;
