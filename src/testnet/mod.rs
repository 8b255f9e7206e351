//! Fixtures shared by the unit tests: fast configurations and ledgers backed
//! by temporary directories.

pub mod test_utils;

pub use test_utils::*;
