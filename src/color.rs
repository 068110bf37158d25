//! Colors used by the viewport buffers.
//!
//! Colors are RGBA with `f32` components in the range [0.0, 1.0]. Display
//! settings and color pickers usually speak hexadecimal (`#rrggbb`), so this
//! module also provides conversions from and to that notation.
//!
//! # Example
//! ```
//! # use meshview::color::{self, Color};
//! let c = color::from_hex("#ff0000").unwrap();
//! assert_eq!(c, color::RED);
//! assert_eq!(color::to_hex(color::NEUTRAL_GRAY), "#cccccc");
//! ```

pub use rgb::Rgba;

/// The color type used throughout meshview. RGBA with f32 components in [0.0, 1.0].
pub type Color = Rgba<f32>;

/// Black (0, 0, 0)
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// White (255, 255, 255)
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Red (255, 0, 0)
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Lime (0, 255, 0) - CSS "lime", pure green
pub const LIME: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Blue (0, 0, 255)
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Yellow (255, 255, 0)
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);

/// Cyan (0, 255, 255)
pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);

/// Gray (128, 128, 128)
pub const GRAY: Color = Color::new(0.5019608, 0.5019608, 0.5019608, 1.0);

/// Dark gray (169, 169, 169)
pub const DARK_GRAY: Color = Color::new(0.6627451, 0.6627451, 0.6627451, 1.0);

/// Light gray (211, 211, 211)
pub const LIGHT_GRAY: Color = Color::new(0.827451, 0.827451, 0.827451, 1.0);

/// Dim gray (105, 105, 105)
pub const DIM_GRAY: Color = Color::new(0.4117647, 0.4117647, 0.4117647, 1.0);

/// Neutral gray (204, 204, 204), the default base color of unselected objects.
pub const NEUTRAL_GRAY: Color = Color::new(0.8, 0.8, 0.8, 1.0);

/// Returns `color` with its alpha component replaced.
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, alpha)
}

/// Parses a `#rrggbb` or `#rrggbbaa` string (the leading `#` is optional).
///
/// Returns `None` if the string is not a valid hexadecimal color.
pub fn from_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if (digits.len() != 6 && digits.len() != 8) || !digits.is_ascii() {
        return None;
    }

    let component = |i: usize| -> Option<f32> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|c| c as f32 / 255.0)
    };

    let alpha = if digits.len() == 8 { component(6)? } else { 1.0 };

    Some(Color::new(component(0)?, component(2)?, component(4)?, alpha))
}

/// Formats the RGB components of `color` as `#rrggbb`.
pub fn to_hex(color: Color) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        byte(color.r),
        byte(color.g),
        byte(color.b)
    )
}

/// Packs a color into the layout uploaded to the color channels.
#[inline]
pub fn to_array(color: Color) -> [f32; 4] {
    [color.r, color.g, color.b, color.a]
}
