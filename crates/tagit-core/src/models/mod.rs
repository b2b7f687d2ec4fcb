//! Data models for tagit

mod tag;
mod tagged_file;

pub use tag::Tag;
pub use tagged_file::{decode_tag_names, encode_tags, FileEvent, TaggedFile, TAG_DELIMITER};
