//! Media module for posts, media references and URL helpers.

pub mod item;
pub mod post;
pub mod url;

pub use item::{Media, MediaKind};
pub use post::{ImageSize, Post};
