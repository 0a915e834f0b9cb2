//! Indexed arena allocator for tree-shaped compiler data
//!
//! Re-exports `la-arena`, the arena used by rust-analyzer. Every table of
//! declarations and every IR unit allocates its nodes here and refers to
//! them through typed `Idx` handles.

pub use la_arena::{Arena, ArenaMap, Idx};
