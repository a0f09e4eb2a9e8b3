//! Image widget sizing.

use kurbo::Size;

/// Largest size an image widget gets when added from its natural size.
pub const MAX_IMAGE_SIZE: Size = Size::new(400.0, 300.0);
/// Size used when the natural size is unknown.
pub const FALLBACK_IMAGE_SIZE: Size = Size::new(300.0, 200.0);

/// Widget size for an image with the given natural size.
///
/// Images that fit within `max` keep their natural size. Larger ones are
/// scaled uniformly to fit and rounded to whole pixels.
pub fn fit_image_dimensions(natural: Option<Size>, max: Size) -> Size {
    let Some(natural) = natural.filter(|s| is_usable(*s)) else {
        return FALLBACK_IMAGE_SIZE;
    };
    if !exceeds(natural, max) {
        return natural;
    }
    let scale = (max.width / natural.width).min(max.height / natural.height);
    Size::new(
        (natural.width * scale).round().max(1.0),
        (natural.height * scale).round().max(1.0),
    )
}

/// Whether `natural` is larger than `max` on either axis.
pub fn exceeds(natural: Size, max: Size) -> bool {
    natural.width > max.width || natural.height > max.height
}

fn is_usable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}
