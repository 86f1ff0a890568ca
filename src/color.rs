use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.7, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: genre tag → Color32
// ---------------------------------------------------------------------------

/// Maps the catalog's genre tags to distinct colours.
#[derive(Debug, Clone)]
pub struct GenreColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl GenreColors {
    /// Build a colour map from the catalog's genre index.
    pub fn new(tags: &BTreeSet<String>) -> Self {
        let palette = generate_palette(tags.len());
        let mapping: BTreeMap<String, Color32> = tags
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        GenreColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a genre tag.
    pub fn color_for(&self, tag: &str) -> Color32 {
        self.mapping
            .get(tag)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn small_palettes_are_distinct() {
        let palette = generate_palette(6);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_tags_fall_back_to_default() {
        let tags: BTreeSet<String> = ["Action".to_string()].into_iter().collect();
        let colors = GenreColors::new(&tags);
        assert_ne!(colors.color_for("Action"), Color32::GRAY);
        assert_eq!(colors.color_for("Unknown"), Color32::GRAY);
    }
}
