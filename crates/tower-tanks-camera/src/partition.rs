//! Subdivision of the engagement zone between active opponent regions.

use crate::geometry::NormRect;

/// Splits `zone` into `count` side-by-side rectangles, in slot order.
///
/// Each region gets an equal share of the zone width. Between two neighbours a
/// gap of `separator` (normalized units) is carved out, half from each side, so
/// the outer edges stay flush with the zone. A single region takes the whole
/// zone unmodified.
pub fn partition(zone: NormRect, count: usize, separator: f32) -> Vec<NormRect> {
    match count {
        0 => Vec::new(),
        1 => vec![zone],
        _ => {
            let base_width = zone.width / count as f32;
            let half_gap = (separator / 2.0).max(0.0);

            (0..count)
                .map(|index| {
                    let left_cut = if index > 0 { half_gap } else { 0.0 };
                    let right_cut = if index + 1 < count { half_gap } else { 0.0 };
                    NormRect::new(
                        zone.x + index as f32 * base_width + left_cut,
                        zone.y,
                        (base_width - left_cut - right_cut).max(0.0),
                        zone.height,
                    )
                })
                .collect()
        }
    }
}
