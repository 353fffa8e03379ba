//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use post::{NewPost, Post, PostChanges};
pub use user::{ProfileChanges, User};

/// Maximum length for titles and names (posts, categories, locations).
pub const MAX_TITLE_LEN: usize = 256;
