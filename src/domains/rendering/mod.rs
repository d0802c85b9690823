pub mod font;
pub mod grid;
pub mod palette;
pub mod renderer;
pub mod session;

pub use grid::*;
pub use palette::*;
pub use renderer::*;
pub use session::*;
