//! Navigation logic for fpick.
//!
//! This module contains the path [`history::PathHistory`] anchored at the
//! base path, the selection [`cursor::Cursor`], and the keyboard
//! [`keys::transition`] table the browser applies.

pub mod cursor;
pub mod history;
pub mod keys;
