mod index;
mod skyline;
mod storage;

pub use index::*;
pub use skyline::*;
pub use storage::*;
