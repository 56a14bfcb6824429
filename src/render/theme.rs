/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1), rounded per channel
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Normalized RGBA as used by imgui
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_rgba(1.0)
    }
}

/// Palette used for the board canvas and the surrounding panels
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Window background
    pub background: Color,
    /// Cards and control bar
    pub panel: Color,
    /// Canvas background; trail dots fade from this color
    pub canvas: Color,
    pub board_fill: Color,
    pub grid: Color,
    pub board_outline: Color,
    /// Center-of-pressure cross, label and newest trail dots
    pub accent: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_dim: Color,
    pub highlight: Color,
    pub coordinates: Color,
    pub play: Color,
    pub pause: Color,
    /// One color per sensor, in sensor order
    pub sensors: [Color; 4],
}

pub const DARK: Theme = Theme {
    name: "dark",
    background: Color::rgb(0x0f, 0x17, 0x2a),
    panel: Color::rgb(0x1e, 0x29, 0x3b),
    canvas: Color::rgb(0x0f, 0x17, 0x2a),
    board_fill: Color::rgb(0x1e, 0x29, 0x3b),
    grid: Color::rgb(0x1e, 0x29, 0x3b),
    board_outline: Color::rgb(0x33, 0x41, 0x55),
    accent: Color::rgb(0xf8, 0x51, 0x49),
    text_primary: Color::rgb(0xf1, 0xf5, 0xf9),
    text_secondary: Color::rgb(0x94, 0xa3, 0xb8),
    text_dim: Color::rgb(0x47, 0x55, 0x69),
    highlight: Color::rgb(0x38, 0xbd, 0xf8),
    coordinates: Color::rgb(0x2d, 0xd4, 0xbf),
    play: Color::rgb(0x16, 0x65, 0x34),
    pause: Color::rgb(0xb4, 0x53, 0x09),
    sensors: [
        Color::rgb(0x38, 0xbd, 0xf8),
        Color::rgb(0xfb, 0x71, 0x85),
        Color::rgb(0x4a, 0xde, 0x80),
        Color::rgb(0xfb, 0xbf, 0x24),
    ],
};

pub const LIGHT: Theme = Theme {
    name: "light",
    background: Color::rgb(0xf1, 0xf5, 0xf9),
    panel: Color::rgb(0xff, 0xff, 0xff),
    canvas: Color::rgb(0xf8, 0xfa, 0xfc),
    board_fill: Color::rgb(0xff, 0xff, 0xff),
    grid: Color::rgb(0xe2, 0xe8, 0xf0),
    board_outline: Color::rgb(0x94, 0xa3, 0xb8),
    accent: Color::rgb(0xdc, 0x26, 0x26),
    text_primary: Color::rgb(0x0f, 0x17, 0x2a),
    text_secondary: Color::rgb(0x47, 0x55, 0x69),
    text_dim: Color::rgb(0x94, 0xa3, 0xb8),
    highlight: Color::rgb(0x25, 0x63, 0xeb),
    coordinates: Color::rgb(0x0d, 0x94, 0x88),
    play: Color::rgb(0x16, 0xa3, 0x4a),
    pause: Color::rgb(0xd9, 0x77, 0x06),
    sensors: [
        Color::rgb(0x25, 0x63, 0xeb),
        Color::rgb(0xdc, 0x26, 0x26),
        Color::rgb(0x16, 0xa3, 0x4a),
        Color::rgb(0xd9, 0x77, 0x06),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::rgb(0x0f, 0x17, 0x2a);
        let b = Color::rgb(0xf8, 0x51, 0x49);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
    }

    #[test]
    fn test_lerp_midpoint_rounds() {
        let a = Color::rgb(0, 100, 255);
        let b = Color::rgb(255, 101, 0);
        // 127.5 -> 128, 100.5 -> 101, 127.5 -> 128
        assert_eq!(a.lerp(b, 0.5), Color::rgb(128, 101, 128));
    }

    #[test]
    fn test_to_rgba() {
        assert_eq!(Color::WHITE.to_rgba(0.5), [1.0, 1.0, 1.0, 0.5]);
        let rgba: [f32; 4] = Color::rgb(0, 0, 0).into();
        assert_eq!(rgba, [0.0, 0.0, 0.0, 1.0]);
    }
}
