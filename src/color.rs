use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

const GOLDEN_ANGLE: f32 = 137.507_77;
const FIRST_HUE: f32 = 210.0;

/// Colour of the `i`-th series. Hues step by the golden angle so every new
/// series lands in the widest remaining gap, and lightness alternates so
/// neighbouring bars stay apart even when their hues are close. The colour
/// of a series never depends on how many series follow it.
pub fn series_color(i: usize) -> Color32 {
    let hue = (FIRST_HUE + i as f32 * GOLDEN_ANGLE) % 360.0;
    let lightness = if i % 2 == 0 { 0.50 } else { 0.62 };
    let rgb: Srgb = Hsl::new(hue, 0.65, lightness).into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// The first `n` series colours.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n).map(series_color).collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let values: Vec<Value> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        ColorMap {
            mapping: values.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(12);
        assert_eq!(colours.len(), 12);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn palette_prefix_is_stable() {
        assert_eq!(generate_palette(3), &generate_palette(8)[..3]);
        assert_eq!(generate_palette(4)[1], series_color(1));
    }

    #[test]
    fn unknown_category_falls_back_to_grey() {
        let map = ColorMap::new(["Awareness", "Retention"].map(|s| Value::Text(s.into())));
        assert_ne!(map.color_for(&Value::Text("Awareness".into())), Color32::GRAY);
        assert_eq!(map.color_for(&Value::Text("Conversion".into())), Color32::GRAY);
    }
}
