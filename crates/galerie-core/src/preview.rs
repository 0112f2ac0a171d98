//! Preview consistency rules
//!
//! Which image becomes a gallery's preview as images are added and removed. The
//! decisions are pure; stores apply them to the live document inside the same write
//! that changes `images`, so a decision never outlives the state it was taken on.

use uuid::Uuid;

use crate::models::{Gallery, Image};

/// How a write should treat the gallery's `preview` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewUpdate {
    Keep,
    Set(Uuid),
    Clear,
}

impl PreviewUpdate {
    pub fn apply_to(self, preview: &mut Option<Uuid>) {
        match self {
            PreviewUpdate::Keep => {}
            PreviewUpdate::Set(id) => *preview = Some(id),
            PreviewUpdate::Clear => *preview = None,
        }
    }
}

/// Preview change after an append. `post_append_len` is the image count including
/// the new image.
pub fn after_insert(post_append_len: usize, image_id: Uuid) -> PreviewUpdate {
    if post_append_len == 1 {
        PreviewUpdate::Set(image_id)
    } else {
        PreviewUpdate::Keep
    }
}

/// What deleting one image from a gallery means, decided on the pre-delete document.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// Position of the removed image in the pre-delete sequence
    pub index: usize,
    pub image: Image,
    pub preview: PreviewUpdate,
}

/// Decide the outcome of removing `image_id` from `gallery`. Returns `None` when the
/// gallery holds no such image.
///
/// The preview is re-elected only when the removed image is the current preview and
/// other images remain: index 0 is chosen, or index 1 when index 0 is the one being
/// removed. Removing the sole image clears the preview.
pub fn after_delete(gallery: &Gallery, image_id: Uuid) -> Option<Removal> {
    let (index, image) = gallery.find_image(image_id)?;
    let len = gallery.images.len();

    let preview = if len == 1 {
        PreviewUpdate::Clear
    } else if gallery.preview == Some(image_id) {
        let replacement = if index == 0 { 1 } else { 0 };
        PreviewUpdate::Set(gallery.images[replacement].id)
    } else {
        PreviewUpdate::Keep
    };

    Some(Removal {
        index,
        image: image.clone(),
        preview,
    })
}

/// Append `image` and apply the insert rule. Returns the post-append image count.
pub fn append_image(gallery: &mut Gallery, image: Image) -> usize {
    let image_id = image.id;
    gallery.images.push(image);
    let len = gallery.images.len();
    after_insert(len, image_id).apply_to(&mut gallery.preview);
    len
}

/// Remove `image_id` and apply the delete rule.
pub fn remove_image(gallery: &mut Gallery, image_id: Uuid) -> Option<Removal> {
    let removal = after_delete(gallery, image_id)?;
    gallery.images.remove(removal.index);
    removal.preview.apply_to(&mut gallery.preview);
    Some(removal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_with(paths: &[&str]) -> Gallery {
        let mut gallery = Gallery::new("alpha".to_string());
        for path in paths {
            append_image(&mut gallery, Image::new("alpha", path, None));
        }
        gallery
    }

    #[test]
    fn test_preview_update_apply() {
        let id = Uuid::new_v4();
        let mut preview = Some(Uuid::new_v4());
        let original = preview;

        PreviewUpdate::Keep.apply_to(&mut preview);
        assert_eq!(preview, original);

        PreviewUpdate::Set(id).apply_to(&mut preview);
        assert_eq!(preview, Some(id));

        PreviewUpdate::Clear.apply_to(&mut preview);
        assert_eq!(preview, None);
    }

    #[test]
    fn test_first_insert_sets_preview() {
        let id = Uuid::new_v4();
        assert_eq!(after_insert(1, id), PreviewUpdate::Set(id));
        assert_eq!(after_insert(2, Uuid::new_v4()), PreviewUpdate::Keep);
        assert_eq!(after_insert(10, Uuid::new_v4()), PreviewUpdate::Keep);
    }

    #[test]
    fn test_append_keeps_existing_preview() {
        let mut gallery = gallery_with(&["a.jpg"]);
        let first = gallery.images[0].id;
        assert_eq!(gallery.preview, Some(first));

        let count = append_image(&mut gallery, Image::new("alpha", "b.jpg", None));
        assert_eq!(count, 2);
        assert_eq!(gallery.preview, Some(first));
    }

    #[test]
    fn test_delete_preview_of_two_elects_remaining() {
        let mut gallery = gallery_with(&["a.jpg", "b.jpg"]);
        let remaining = gallery.images[1].id;
        let image_id = gallery.images[0].id;
        let removal = remove_image(&mut gallery, image_id).unwrap();

        assert_eq!(removal.index, 0);
        assert_eq!(removal.preview, PreviewUpdate::Set(remaining));
        assert_eq!(gallery.preview, Some(remaining));
        assert!(gallery.preview_is_consistent());
    }

    #[test]
    fn test_delete_sole_image_clears_preview() {
        let mut gallery = gallery_with(&["a.jpg"]);
        let image_id = gallery.images[0].id;
        let removal = remove_image(&mut gallery, image_id).unwrap();

        assert_eq!(removal.preview, PreviewUpdate::Clear);
        assert!(gallery.images.is_empty());
        assert_eq!(gallery.preview, None);
    }

    #[test]
    fn test_delete_non_preview_keeps_preview() {
        let mut gallery = gallery_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let before = gallery.preview;
        let image_id = gallery.images[2].id;
        let removal = remove_image(&mut gallery, image_id).unwrap();

        assert_eq!(removal.preview, PreviewUpdate::Keep);
        assert_eq!(gallery.preview, before);
    }

    #[test]
    fn test_delete_preview_not_at_front_elects_first() {
        let mut gallery = gallery_with(&["a.jpg", "b.jpg", "c.jpg"]);
        gallery.preview = Some(gallery.images[2].id);
        let first = gallery.images[0].id;

        let removal = after_delete(&gallery, gallery.images[2].id).unwrap();
        assert_eq!(removal.preview, PreviewUpdate::Set(first));
    }

    #[test]
    fn test_repeated_front_deletes_stay_consistent() {
        let mut gallery = gallery_with(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        while !gallery.images.is_empty() {
            let front = gallery.images[0].id;
            remove_image(&mut gallery, front).unwrap();

            assert!(gallery.preview_is_consistent());
            assert_eq!(gallery.preview, gallery.images.first().map(|i| i.id));
        }
    }

    #[test]
    fn test_delete_unknown_image() {
        let mut gallery = gallery_with(&["a.jpg"]);
        assert!(remove_image(&mut gallery, Uuid::new_v4()).is_none());
        assert_eq!(gallery.images.len(), 1);
    }
}
