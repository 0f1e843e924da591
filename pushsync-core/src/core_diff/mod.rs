//! Diff Engine - pure transition computation
//!
//! Given the old and new value of one field of the registration triple,
//! these functions name the transition that occurred. They never touch the
//! gateway; the reconciler turns transitions into calls.

pub mod channels;
pub mod token;

pub use channels::{diff_channels, ChannelTransition};
pub use token::{diff_token, TokenTransition};
