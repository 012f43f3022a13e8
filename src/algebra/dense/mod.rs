mod core;
pub use self::core::*;
pub(crate) mod generic;
