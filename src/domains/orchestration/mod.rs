pub mod classify;
pub mod params;
pub mod ports;
pub mod process;
pub mod retry;

pub use classify::*;
pub use params::*;
pub use ports::*;
pub use process::*;
pub use retry::*;
