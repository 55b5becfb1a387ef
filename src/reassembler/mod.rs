//! Partial-result reassembly engine.
//!
//! The server splits a query's rows across partial result messages and may
//! split one column value across two consecutive messages when it reaches
//! the transport's message-size ceiling. [`Reassembler`] consumes those
//! messages in arrival order and emits complete, fixed-width rows without
//! ever buffering the full result set.
//!
//! The reassembly result is independent of fragmentation boundaries: any
//! re-chunking of the same logical value sequence yields identical rows.
//! The property tests in this module pin that law down.

pub mod error;
mod merge;
mod state;

pub use error::ReassemblyError;
pub use state::Reassembler;

#[cfg(test)]
mod merge_tests;
#[cfg(test)]
mod tests;
