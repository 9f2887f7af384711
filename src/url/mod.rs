//! URL handling module for Domain-Scout
//!
//! Announcement pages wrap addresses in prose, emoji and full-width
//! punctuation. This module finds the first usable absolute URL in such text
//! and cleans it up.

mod normalize;

// Re-export main functions
pub use normalize::{find_first_url, is_absolute_http_url, trim_decorations};
