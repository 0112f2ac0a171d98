use image::{DynamicImage, GenericImageView};

/// Requested thumbnail dimensions. A missing side is derived from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDimensions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// True when neither side was requested.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Inclusive bounds for explicitly requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for ResizeBounds {
    fn default() -> Self {
        Self { min: 200, max: 2000 }
    }
}

impl ResizeBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Check every explicitly requested side, returning a message describing the first
    /// violation.
    pub fn check(&self, dimensions: ResizeDimensions) -> Result<(), String> {
        if dimensions.is_empty() {
            return Err("At least one of width or height must be specified".to_string());
        }

        for (label, value) in [("width", dimensions.width), ("height", dimensions.height)] {
            if let Some(v) = value {
                if !self.contains(v) {
                    return Err(format!(
                        "{} must be between {} and {}, got {}",
                        label, self.min, self.max, v
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions. With both sides given the result is exactly the
    /// request; with one side the other is `given * otherOrig / givenOrig`, rounded.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        dimensions: ResizeDimensions,
    ) -> (u32, u32) {
        match (dimensions.width, dimensions.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let h = (w as f64 * orig_height as f64 / orig_width as f64).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let w = (h as f64 * orig_width as f64 / orig_height as f64).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Fill resize: scale each axis independently to exactly `width` x `height`.
    pub fn resize_fill(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Resolve the request against the source and resize.
    pub fn apply(img: &DynamicImage, dimensions: ResizeDimensions) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::calculate_dimensions(orig_width, orig_height, dimensions);
        Self::resize_fill(img, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_calculate_dimensions_both_specified() {
        let (w, h) = ImageResize::calculate_dimensions(
            800,
            600,
            ResizeDimensions::new(Some(300), Some(300)),
        );
        assert_eq!((w, h), (300, 300));
    }

    #[test]
    fn test_calculate_dimensions_width_only() {
        let (w, h) =
            ImageResize::calculate_dimensions(800, 600, ResizeDimensions::new(Some(400), None));
        assert_eq!((w, h), (400, 300));
    }

    #[test]
    fn test_calculate_dimensions_height_only() {
        let (w, h) =
            ImageResize::calculate_dimensions(800, 600, ResizeDimensions::new(None, Some(300)));
        assert_eq!((w, h), (400, 300));
    }

    #[test]
    fn test_calculate_dimensions_rounds_to_nearest() {
        // 1000 * 333 / 1000 = 333; 500 * 333 / 1000 = 166.5 -> 167
        let (w, h) =
            ImageResize::calculate_dimensions(1000, 333, ResizeDimensions::new(Some(500), None));
        assert_eq!((w, h), (500, 167));
    }

    #[test]
    fn test_bounds_check() {
        let bounds = ResizeBounds::default();
        assert!(bounds.check(ResizeDimensions::new(Some(200), None)).is_ok());
        assert!(bounds.check(ResizeDimensions::new(None, Some(2000))).is_ok());
        assert!(bounds.check(ResizeDimensions::new(Some(199), None)).is_err());
        assert!(bounds
            .check(ResizeDimensions::new(Some(400), Some(2001)))
            .is_err());
        assert!(bounds.check(ResizeDimensions::default()).is_err());
    }

    #[test]
    fn test_resize_fill_distorts_aspect() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(800, 600, Rgba([255, 0, 0, 255])));
        let resized = ImageResize::apply(&img, ResizeDimensions::new(Some(300), Some(300)));
        assert_eq!(resized.dimensions(), (300, 300));
    }

    #[test]
    fn test_apply_preserves_aspect_with_one_side() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(800, 600, Rgba([0, 0, 255, 255])));
        let resized = ImageResize::apply(&img, ResizeDimensions::new(Some(400), None));
        assert_eq!(resized.dimensions(), (400, 300));
    }
}
