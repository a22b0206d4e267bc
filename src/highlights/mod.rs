//! Highlights: user-saved spans of article text.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.truepedia/
//! ├── highlights.json        # { "<title>_<lang>": [ {text, context, timestamp}, ... ] }
//! └── highlights.json.lock   # advisory lock held during each read/write
//! ```

pub mod markup;
pub mod review;
pub mod store;

pub use markup::apply_highlights;
pub use review::{mark_for_review, ReviewError};
pub use store::{Highlight, HighlightMap, HighlightStore, StoreError};
