/// Fatal errors that abort the layout of a paragraph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout width {0}")]
    InvalidWidth(f32),
    #[error("line canvas of {width}x{height} pixels is too large to compare")]
    CanvasTooLarge { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
