mod diagonal;
pub(crate) mod product;
mod symmetric;
mod triangular;

pub use diagonal::*;
pub use symmetric::*;
pub use triangular::*;
