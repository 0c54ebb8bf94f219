// src/store/mod.rs
pub mod archive;
pub mod cursor;

pub use archive::{ArchivedPage, PageArchive};
pub use cursor::CursorStore;
