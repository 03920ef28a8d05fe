//! Line breaking, line construction and line comparison.

pub mod line;
pub mod line_breaker;
pub mod line_differ;
pub mod paragraph;
pub mod search;
pub mod version;

pub use line::{Highlight, Line, Placement, RunArena};
pub use line_breaker::{FixedBreaks, LineBreaker, UaxLineBreaker};
pub use line_differ::{find_deltas, DeltaRange, DiffOptions, LineDeltas};
pub use paragraph::{LayoutOptions, Paragraph, Span, REMOVAL_HIGHLIGHT_COLOR};
pub use search::{find_bound, Bounded};
pub use version::{PerVersion, Version};
