//! Coordinate conversion between PDF and display coordinate systems
//!
//! PDF coordinates: origin at the bottom-left corner, units are points
//! (1/72 inch), y increases upward. Display coordinates: origin at the
//! top-left corner, units are pixels, y increases downward.
//!
//! Everything here is a pure function of its arguments; there is no
//! hidden state and every function is safe to call from any context.

use serde::{Deserialize, Serialize};

use crate::field::{FormField, PdfBounds};

/// Scale factor applied when rasterizing a PDF page for display
pub const DEFAULT_DISPLAY_SCALE: f64 = 1.5;

/// Minimum rendered size of a field overlay, in pixels
///
/// [`sanitize_coordinates`] never shrinks a field below this, so an
/// overlay stays large enough to interact with.
pub const MIN_FIELD_SIZE: f64 = 10.0;

/// US Letter page size in points, the fallback when a document's native
/// page size cannot be determined
pub const US_LETTER: PageDimensions = PageDimensions {
    width: 612.0,
    height: 792.0,
};

/// Page or container dimensions
///
/// Pixels when describing a rendered page, points when describing a
/// native PDF page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// A field's position on a rendered page, in pixels, top-left origin
///
/// Always derived from [`PdfBounds`], never authored directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayCoordinates {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Display coordinates expressed as percentages of a container
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentCoordinates {
    pub x_percent: f64,
    pub y_percent: f64,
    pub width_percent: f64,
    pub height_percent: f64,
}

/// Convert a field's PDF bounds to display coordinates for overlay
/// positioning
///
/// Returns `None` when the field has no bounds or no page occurrences;
/// that is "no renderable position", not an error.
///
/// When `pdf_page_dimensions` is known, the bounds are scaled by
/// `display_scale` (the rasterization ratio) and flipped to a top-left
/// origin. When it is not, the same scale-and-flip is applied directly
/// against the rendered page height. The fallback is not dimensionally
/// rigorous when `display_scale` differs from the true render ratio, but
/// some rendering pipelines cannot report the native page size, so both
/// paths are kept.
pub fn pdf_bounds_to_display(
    field: &FormField,
    page_dimensions: PageDimensions,
    pdf_page_dimensions: Option<PageDimensions>,
    display_scale: f64,
) -> Option<DisplayCoordinates> {
    let bounds = field.bounds?;
    match &field.page_indices {
        Some(pages) if !pages.is_empty() => {}
        _ => return None,
    }

    Some(match pdf_page_dimensions {
        Some(pdf_dims) => {
            convert_with_pdf_dimensions(bounds, page_dimensions, pdf_dims, display_scale)
        }
        None => convert_direct_scaling(bounds, page_dimensions, display_scale),
    })
}

/// Conversion when the native PDF page size is known
fn convert_with_pdf_dimensions(
    bounds: PdfBounds,
    display_dimensions: PageDimensions,
    _pdf_dimensions: PageDimensions,
    display_scale: f64,
) -> DisplayCoordinates {
    let scaled = scale_bounds(bounds, display_scale);

    // Flip from bottom-left origin to top-left origin
    let display_y = display_dimensions.height - scaled.y - scaled.height;

    DisplayCoordinates {
        x: scaled.x,
        y: display_y,
        width: scaled.width,
        height: scaled.height,
    }
}

/// Direct-scaling fallback when the native page size is unavailable
fn convert_direct_scaling(
    bounds: PdfBounds,
    display_dimensions: PageDimensions,
    display_scale: f64,
) -> DisplayCoordinates {
    let scaled = scale_bounds(bounds, display_scale);

    let display_y = display_dimensions.height - scaled.y - scaled.height;

    DisplayCoordinates {
        x: scaled.x,
        y: display_y,
        width: scaled.width,
        height: scaled.height,
    }
}

fn scale_bounds(bounds: PdfBounds, display_scale: f64) -> PdfBounds {
    PdfBounds {
        x: bounds.x * display_scale,
        y: bounds.y * display_scale,
        width: bounds.width * display_scale,
        height: bounds.height * display_scale,
    }
}

/// Express display coordinates as percentages of a container
///
/// No clamping: values leave `[0, 100]` when the coordinates extend past
/// the container, which callers use for diagnostics.
pub fn display_to_percentages(
    coords: DisplayCoordinates,
    container: PageDimensions,
) -> PercentCoordinates {
    PercentCoordinates {
        x_percent: (coords.x / container.width) * 100.0,
        y_percent: (coords.y / container.height) * 100.0,
        width_percent: (coords.width / container.width) * 100.0,
        height_percent: (coords.height / container.height) * 100.0,
    }
}

/// Whether display coordinates lie fully within a container
pub fn validate_display_coordinates(
    coords: DisplayCoordinates,
    container: PageDimensions,
) -> bool {
    coords.x >= 0.0
        && coords.y >= 0.0
        && coords.width > 0.0
        && coords.height > 0.0
        && coords.x + coords.width <= container.width
        && coords.y + coords.height <= container.height
}

/// Clamp display coordinates into a container
///
/// Never fails and is idempotent: positions are clamped into
/// `[0, dimension − MIN_FIELD_SIZE]`, then sizes into
/// `[MIN_FIELD_SIZE, dimension − clamped position]`. Output satisfies
/// [`validate_display_coordinates`] unless the container itself is
/// smaller than [`MIN_FIELD_SIZE`].
pub fn sanitize_coordinates(
    coords: DisplayCoordinates,
    container: PageDimensions,
) -> DisplayCoordinates {
    let x = coords.x.min(container.width - MIN_FIELD_SIZE).max(0.0);
    let y = coords.y.min(container.height - MIN_FIELD_SIZE).max(0.0);

    DisplayCoordinates {
        x,
        y,
        width: coords.width.min(container.width - x).max(MIN_FIELD_SIZE),
        height: coords.height.min(container.height - y).max(MIN_FIELD_SIZE),
    }
}
