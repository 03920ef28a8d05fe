//! Bidirectional (BiDi) text support built on `unicode-bidi`.
//!
//! - Paragraph-level direction detection
//! - Logical level runs for shaping
//! - Visual run order for line construction

pub mod levels;
pub mod reorder;

pub use levels::{BaseDirection, BidiRun, ParagraphBidi};
