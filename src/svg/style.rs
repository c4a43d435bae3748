/// Color used when a path has neither fill nor stroke paint
pub const DEFAULT_COLOR: &str = "#000000";

/// Color that marks a path as a cut-through path
const CUT_COLOR: &str = "#ff0000";

/// Format an sRGB color as lowercase `#rrggbb`
pub fn color_hex(color: usvg::Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

fn paint_hex(paint: &usvg::Paint) -> String {
    match paint {
        usvg::Paint::Color(c) => color_hex(*c),
        // Gradients and patterns have no single color
        _ => DEFAULT_COLOR.to_string(),
    }
}

/// Color deciding how a path is processed: fill, then stroke, then black
pub fn path_color(path: &usvg::Path) -> String {
    if let Some(fill) = path.fill() {
        return paint_hex(fill.paint());
    }
    path.stroke()
        .map(|s| paint_hex(s.paint()))
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

/// Fill color of a filled path
pub fn fill_color(path: &usvg::Path) -> Option<String> {
    path.fill().map(|f| paint_hex(f.paint()))
}

/// Red paths are cut, every other color is engraved
pub fn is_cut_color(color: &str) -> bool {
    color.trim().eq_ignore_ascii_case(CUT_COLOR)
}

/// NTSC grey value of a `#rrggbb` color: 0.299 R + 0.587 G + 0.114 B
pub fn color_to_grey(color: &str) -> Option<u8> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let grey = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    Some(grey as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(color_hex(usvg::Color::new_rgb(255, 0, 0)), "#ff0000");
        assert_eq!(color_hex(usvg::Color::new_rgb(0, 10, 171)), "#000aab");
    }

    #[test]
    fn test_cut_colors() {
        assert!(is_cut_color("#ff0000"));
        assert!(is_cut_color("#FF0000"));
        assert!(!is_cut_color("red"));
        assert!(!is_cut_color("#fe0000"));
        assert!(!is_cut_color(DEFAULT_COLOR));
    }

    #[test]
    fn test_color_to_grey() {
        assert_eq!(color_to_grey("#000000"), Some(0));
        assert_eq!(color_to_grey("#ffffff"), Some(255));
        // 0.299 * 255 = 76.2
        assert_eq!(color_to_grey("#ff0000"), Some(76));
        // 127.99999999999999 truncates
        assert_eq!(color_to_grey("#808080"), Some(127));
        assert_eq!(color_to_grey("red"), None);
    }
}
