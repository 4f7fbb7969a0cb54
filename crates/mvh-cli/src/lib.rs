//! Library components of the `mvh` binary: logging setup, the staged build
//! pipeline and the describe statistics.

#![allow(missing_docs)]

pub mod describe;
pub mod logging;
pub mod pipeline;
pub mod types;
