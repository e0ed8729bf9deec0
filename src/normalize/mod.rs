/*! Text normalization.

Conversation texts are noisy: they carry (often doubly) escaped HTML, inline tags and links.
The [Normalizer] turns them into plain text where links are replaced by placeholder tokens.

Normalization is infallible: anything that can not be understood is kept as literal text.
!*/
pub mod entities;
pub mod markup;
mod normalizer;
pub mod urls;

pub use markup::tag_names;
pub use normalizer::{LinkText, Normalizer};
pub use urls::{UrlKind, IMAGE_PLACEHOLDER, URL_PLACEHOLDER};
