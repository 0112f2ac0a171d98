pub mod gallery;
pub mod image;

pub use gallery::{
    CreateGalleryRequest, Gallery, GalleryDetail, GallerySummary, RenameGalleryRequest,
};
pub use image::{ExifData, Image};
