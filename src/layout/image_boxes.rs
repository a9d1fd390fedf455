//! Image box construction from structural image runs.

use crate::geometry::clamp;
use crate::model::{ImageBox, StructuralImageElement};

const DEFAULT_IMAGE_SIZE: f32 = 64.0;
const MIN_IMAGE_SIZE: f32 = 24.0;

/// Build the image box for one element.
///
/// Elements without image data produce `None`. Sizes default to 64 and are
/// at least 24 (capped by the page); `top` comes from an explicit top, else
/// the flipped `y`, else 0.
pub fn build_image_box(
    element: &StructuralImageElement,
    index: usize,
    page_width: f32,
    page_height: f32,
) -> Option<ImageBox> {
    let data_url = element.image_data.as_deref().filter(|d| !d.is_empty())?;

    let width = element.width.unwrap_or(DEFAULT_IMAGE_SIZE).max(MIN_IMAGE_SIZE).min(page_width);
    let height = element.height.unwrap_or(DEFAULT_IMAGE_SIZE).max(MIN_IMAGE_SIZE).min(page_height);
    let raw_top = element
        .top
        .or_else(|| element.y.map(|y| page_height - y - height))
        .filter(|t| t.is_finite())
        .unwrap_or(0.0);
    let raw_left = element.x.or(element.left).unwrap_or(0.0);

    Some(ImageBox {
        id: element.id.clone().unwrap_or_else(|| format!("image-{}", index)),
        data_url: Some(data_url.to_string()),
        left: clamp(raw_left, 0.0, page_width - width),
        top: clamp(raw_top, 0.0, page_height - height),
        width,
        height,
    })
}

/// Whether an image box covers the page like a background scan.
pub fn covers_page(image: &ImageBox, page_width: f32, page_height: f32, ratio: f32) -> bool {
    image.width >= page_width * ratio && image.height >= page_height * ratio
}

/// Build image boxes for a page, dropping page-covering scans.
pub fn build_image_boxes(
    elements: &[StructuralImageElement],
    page_width: f32,
    page_height: f32,
    cover_ratio: f32,
) -> Vec<ImageBox> {
    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| build_image_box(element, index, page_width, page_height))
        .filter(|image| {
            let cover = covers_page(image, page_width, page_height, cover_ratio);
            if cover {
                log::debug!("Dropping page-covering image {}", image.id);
            }
            !cover
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(x: f32, y: f32, width: f32, height: f32) -> StructuralImageElement {
        StructuralImageElement {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            image_data: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_flipped_top() {
        let b = build_image_box(&image(50.0, 600.0, 100.0, 80.0), 2, 612.0, 792.0).unwrap();
        assert_eq!(b.id, "image-2");
        assert_eq!(b.top, 112.0);
        assert_eq!(b.left, 50.0);
    }

    #[test]
    fn test_explicit_top_and_left() {
        let el = StructuralImageElement {
            left: Some(30.0),
            top: Some(40.0),
            image_data: Some("data:image/jpeg;base64,AAAA".to_string()),
            ..Default::default()
        };
        let b = build_image_box(&el, 0, 612.0, 792.0).unwrap();
        assert_eq!((b.left, b.top, b.width, b.height), (30.0, 40.0, 64.0, 64.0));
    }

    #[test]
    fn test_minimum_size_and_clamp() {
        let b = build_image_box(&image(700.0, 0.0, 4.0, 4.0), 0, 612.0, 792.0).unwrap();
        assert_eq!((b.width, b.height), (24.0, 24.0));
        assert_eq!(b.left, 588.0);
        assert_eq!(b.top, 768.0);
    }

    #[test]
    fn test_missing_data_dropped() {
        let mut el = image(0.0, 0.0, 100.0, 100.0);
        el.image_data = None;
        assert!(build_image_box(&el, 0, 612.0, 792.0).is_none());
    }

    #[test]
    fn test_page_cover_dropped() {
        let elements = vec![image(0.0, 0.0, 600.0, 780.0), image(0.0, 0.0, 600.0, 300.0)];
        let boxes = build_image_boxes(&elements, 612.0, 792.0, 0.9);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].id, "image-1");
    }
}
