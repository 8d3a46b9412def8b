//! Common utilities for the emblem favicon toolkit.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Typed Errors** - URL and transport failures shared across crates
//! - **URL Resolution** - effective-base computation and RFC 3986 joins
//! - **Fetch** - blocking HTTP, `data:` URL, and local file reads
//! - **Icon Data Types** - decoded sub-images and icon summaries
//! - **Warning System** - deduplicated colored terminal output

pub mod error;
pub mod icon;
pub mod net;
pub mod resolver;
pub mod warning;

pub use error::{FetchError, MalformedLocation};
pub use icon::{DecodedImage, Icon, ImageInfo};
