// Modal rendering modules
mod utils;
mod comments;
mod composer;
mod options;
mod help;

pub use utils::centered_rect;
pub use comments::*;
pub use composer::*;
pub use options::*;
pub use help::*;
