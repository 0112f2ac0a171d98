pub mod galleries;
pub mod health;
pub mod images;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use galerie_services::{ImageContent, ResizeDimensions, ViewRequest};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters shared by the preview and image endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// `false` returns JSON metadata instead of image bytes
    pub image: Option<bool>,
    /// Thumbnail width in pixels
    pub width: Option<u32>,
    /// Thumbnail height in pixels
    pub height: Option<u32>,
}

impl ViewQuery {
    pub fn into_view(self) -> ViewRequest {
        if self.image == Some(false) {
            return ViewRequest::metadata();
        }

        let dimensions = ResizeDimensions::new(self.width, self.height);
        if dimensions.is_empty() {
            ViewRequest::original()
        } else {
            ViewRequest::resized(dimensions)
        }
    }
}

pub(crate) fn image_response(content: ImageContent) -> Response {
    ([(header::CONTENT_TYPE, content.content_type)], content.bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_query_modes() {
        let view = ViewQuery::default().into_view();
        assert!(!view.metadata);
        assert!(view.dimensions.is_none());

        let view = ViewQuery {
            image: Some(false),
            width: Some(400),
            height: None,
        }
        .into_view();
        assert!(view.metadata);

        let view = ViewQuery {
            image: Some(true),
            width: None,
            height: Some(300),
        }
        .into_view();
        assert_eq!(view.dimensions, Some(ResizeDimensions::new(None, Some(300))));
    }
}
