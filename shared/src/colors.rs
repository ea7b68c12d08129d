//! Fixed color policy for markers and customer-geography overlays.

pub type Rgba = [u8; 4];

const TRADE_AREA_FALLBACK: Rgba = [128, 128, 128, 180];

/// Seven-hue gradient for home-zipcode shading, coolest to hottest.
const HOME_ZIPCODE_HUES: [[u8; 3]; 7] = [
    [255, 235, 59],
    [255, 193, 7],
    [255, 152, 0],
    [255, 111, 0],
    [244, 109, 67],
    [215, 48, 39],
    [165, 0, 38],
];

/// Band colors encode "smaller band = more opaque = core customer area".
/// Unrecognized bands fall back to neutral gray rather than failing.
pub fn trade_area_color(band: u8) -> Rgba {
    match band {
        30 => [255, 67, 54, 220],
        50 => [76, 175, 80, 160],
        70 => [33, 150, 243, 120],
        _ => TRADE_AREA_FALLBACK,
    }
}

/// Heat-map color for a home-zipcode share. The bucket (`percentage / 15`,
/// clamped to the last hue) selects the hue; the raw percentage
/// independently scales alpha across [40, 220]. Saturating casts keep
/// out-of-range input from wrapping.
pub fn home_zipcode_color(percentage: f64) -> Rgba {
    let alpha = ((percentage / 100.0) * 180.0 + 40.0).floor().clamp(0.0, 255.0) as u8;
    let bucket = ((percentage / 15.0).floor().max(0.0) as usize).min(HOME_ZIPCODE_HUES.len() - 1);
    let [r, g, b] = HOME_ZIPCODE_HUES[bucket];
    [r, g, b, alpha]
}

/// Marker fill: the analyzed business is blue, competitors orange, each in
/// a resting and a hovered shade.
pub fn marker_color(is_my_place: bool, hovered: bool) -> Rgba {
    match (is_my_place, hovered) {
        (true, true) => [33, 150, 243, 255],
        (true, false) => [25, 118, 210, 255],
        (false, true) => [255, 152, 0, 255],
        (false, false) => [255, 111, 0, 255],
    }
}

/// Marker radius in pixels. Hover adds 2 px; the business is 2 px larger
/// than a competitor at each hover state.
pub fn marker_radius(is_my_place: bool, hovered: bool) -> f64 {
    match (is_my_place, hovered) {
        (true, true) => 12.0,
        (true, false) => 10.0,
        (false, true) => 10.0,
        (false, false) => 8.0,
    }
}
