use arealens_shared::colors::Rgba;

/// Format RGBA as a CSS color string; alpha maps 0–255 onto 0–1.
pub fn rgba_css(color: Rgba) -> String {
    let [r, g, b, a] = color;
    format!("rgba({r},{g},{b},{:.3})", f64::from(a) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::rgba_css;

    #[test]
    fn formats_full_and_partial_alpha() {
        assert_eq!(rgba_css([255, 67, 54, 255]), "rgba(255,67,54,1.000)");
        assert_eq!(rgba_css([33, 150, 243, 0]), "rgba(33,150,243,0.000)");
        assert_eq!(rgba_css([128, 128, 128, 51]), "rgba(128,128,128,0.200)");
    }
}
