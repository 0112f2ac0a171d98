//! Test fixtures: in-process generated images and upload forms.

use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 90, 150])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// Multipart form with the file in the `image` field.
pub fn upload_form(filename: &str, content_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "image",
        Part::bytes(data)
            .file_name(filename.to_string())
            .mime_type(content_type.to_string()),
    )
}
