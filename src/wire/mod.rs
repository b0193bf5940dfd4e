//! Identifier, length and raw-TLV plumbing, ITU-T X.690 chapter 8.1.

pub(crate) mod length;
pub(crate) mod raw;
pub(crate) mod tag;

pub use tag::{Class, Tag};
