pub mod annotations;
pub mod project;
pub mod symbols;
pub mod util;

pub use annotations::*;
pub use project::*;
pub use symbols::*;
pub use util::*;
