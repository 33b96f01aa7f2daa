use std::fmt::{Display, Formatter};

/// An sRGB colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// CSS colour keywords understood by [`Rgb::parse`].
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x00_0000),
    ("white", 0xff_ffff),
    ("red", 0xff_0000),
    ("green", 0x00_8000),
    ("lime", 0x00_ff00),
    ("blue", 0x00_00ff),
    ("yellow", 0xff_ff00),
    ("cyan", 0x00_ffff),
    ("aqua", 0x00_ffff),
    ("magenta", 0xff_00ff),
    ("fuchsia", 0xff_00ff),
    ("orange", 0xff_a500),
    ("purple", 0x80_0080),
    ("brown", 0xa5_2a2a),
    ("pink", 0xff_c0cb),
    ("gray", 0x80_8080),
    ("grey", 0x80_8080),
    ("silver", 0xc0_c0c0),
    ("maroon", 0x80_0000),
    ("olive", 0x80_8000),
    ("navy", 0x00_0080),
    ("teal", 0x00_8080),
    ("gold", 0xff_d700),
    ("indigo", 0x4b_0082),
    ("violet", 0xee_82ee),
    ("steelblue", 0x46_82b4),
    ("tomato", 0xff_6347),
    ("crimson", 0xdc_143c),
];

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from a `0xRRGGBB` literal.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parses `#rgb`, `#rrggbb` (the `#` is optional) or a CSS colour keyword.
    ///
    /// ```
    /// # use snapmap_core::style::Rgb;
    /// assert_eq!(Rgb::parse("#f80"), Some(Rgb::new(0xff, 0x88, 0x00)));
    /// assert_eq!(Rgb::parse("1F77B4"), Some(Rgb::new(0x1f, 0x77, 0xb4)));
    /// assert_eq!(Rgb::parse("Red"), Some(Rgb::new(0xff, 0, 0)));
    /// assert_eq!(Rgb::parse("Viridis"), None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Some(Self::from_u32(*rgb));
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let expand = |nibble: u32| (nibble & 0xf) * 0x11;
                Some(Self::from_u32(
                    (expand(v >> 8) << 16) | (expand(v >> 4) << 8) | expand(v),
                ))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_u32),
            _ => None,
        }
    }

    /// Linear interpolation in RGB space, `t` in `0..=1`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Lower-case `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
