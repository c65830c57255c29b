//! Core data model: fragments, fragment tables, and block expansion.

pub mod fragment;
pub mod fragment_map;
pub mod tangle;

pub use fragment::{Fragment, FragmentKind};
pub use fragment_map::FragmentMap;
pub use tangle::tangle_all;
