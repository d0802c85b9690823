pub mod logger;
pub mod orchestration;
pub mod rendering;
pub mod trajectory;

pub use logger::*;
pub use orchestration::*;
pub use rendering::*;
pub use trajectory::*;
