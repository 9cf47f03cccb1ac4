#![doc(html_root_url = "https://docs.rs/comment-box/0.1.0")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod identity;
pub mod listeners;
pub mod widget;

pub use identity::{FixedIdentity, IdentityProvider, SessionIdentity};
pub use widget::{CommentBox, NESTING_LIMIT};
