mod resize;
mod thumbnail;

pub use resize::{ImageResize, ResizeBounds, ResizeDimensions};
pub use thumbnail::{ThumbnailError, ThumbnailRenderer};
