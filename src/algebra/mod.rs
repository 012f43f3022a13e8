//! __packedmat__ linear algebra module.
//!
//! Packed storage for symmetric and triangular matrices, skyline
//! storage, and the structure-aware arithmetic on top of them.  All
//! matrix types implement [`MatrixAccess`] and [`MatrixOps`], which
//! provide the generic dense algorithm for every operation that a
//! type does not specialize.

mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod operands;
mod packed;
mod scalarmath;
mod structured;
mod vecmath;

pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
pub use operands::*;
pub use packed::*;
pub(crate) use scalarmath::*;
pub use structured::*;
