use serde_json::Value;

use crate::style::Rgb;

const VIRIDIS: &[u32] = &[
    0x44_0154, 0x48_2878, 0x3e_4989, 0x31_688e, 0x26_828e, 0x1f_9e89, 0x35_b779, 0x6e_ce58,
    0xb5_de2b, 0xfd_e725,
];
const INFERNO: &[u32] = &[
    0x00_0004, 0x1b_0c41, 0x4a_0c6b, 0x78_1c6d, 0xa5_2c60, 0xcf_4446, 0xed_6925, 0xfb_9b06,
    0xf7_d13d, 0xfc_ffa4,
];
const MAGMA: &[u32] = &[
    0x00_0004, 0x18_0f3d, 0x44_0f76, 0x72_1f81, 0x9e_2f7f, 0xcd_4071, 0xf1_605d, 0xfd_9668,
    0xfe_ca8d, 0xfc_fdbf,
];
const PLASMA: &[u32] = &[
    0x0d_0887, 0x46_039f, 0x72_01a8, 0x9c_179e, 0xbd_3786, 0xd8_576b, 0xed_7953, 0xfb_9f3a,
    0xfd_ca26, 0xf0_f921,
];
const BLUES: &[u32] = &[
    0xf7_fbff, 0xde_ebf7, 0xc6_dbef, 0x9e_cae1, 0x6b_aed6, 0x42_92c6, 0x21_71b5, 0x08_519c,
    0x08_306b,
];
const GREENS: &[u32] = &[
    0xf7_fcf5, 0xe5_f5e0, 0xc7_e9c0, 0xa1_d99b, 0x74_c476, 0x41_ab5d, 0x23_8b45, 0x00_6d2c,
    0x00_441b,
];
const REDS: &[u32] = &[
    0xff_f5f0, 0xfe_e0d2, 0xfc_bba1, 0xfc_9272, 0xfb_6a4a, 0xef_3b2c, 0xcb_181d, 0xa5_0f15,
    0x67_000d,
];
const GREYS: &[u32] = &[
    0xff_ffff, 0xf0_f0f0, 0xd9_d9d9, 0xbd_bdbd, 0x96_9696, 0x73_7373, 0x52_5252, 0x25_2525,
    0x00_0000,
];
const YL_OR_RD: &[u32] = &[
    0xff_ffcc, 0xff_eda0, 0xfe_d976, 0xfe_b24c, 0xfd_8d3c, 0xfc_4e2a, 0xe3_1a1c, 0xbd_0026,
    0x80_0026,
];
const SPECTRAL: &[u32] = &[
    0x9e_0142, 0xd5_3e4f, 0xf4_6d43, 0xfd_ae61, 0xfe_e08b, 0xff_ffbf, 0xe6_f598, 0xab_dda4,
    0x66_c2a5, 0x32_88bd, 0x5e_4fa2,
];
const RD_YL_BU: &[u32] = &[
    0xa5_0026, 0xd7_3027, 0xf4_6d43, 0xfd_ae61, 0xfe_e090, 0xff_ffbf, 0xe0_f3f8, 0xab_d9e9,
    0x74_add1, 0x45_75b4, 0x31_3695,
];
const RD_BU: &[u32] = &[
    0x67_001f, 0xb2_182b, 0xd6_604d, 0xf4_a582, 0xfd_dbc7, 0xf7_f7f7, 0xd1_e5f0, 0x92_c5de,
    0x43_93c3, 0x21_66ac, 0x05_3061,
];

/// Blue, pale yellow, red. Used when a colormap cannot be resolved.
const FALLBACK: &[u32] = &[0x45_75b4, 0xff_ffbf, 0xd7_3027];

/// Ramp names accepted by [`ColorRamp::named`], in their canonical spelling.
pub const RAMP_NAMES: &[&str] = &[
    "Viridis", "Inferno", "Magma", "Plasma", "Blues", "Greens", "Reds", "Greys", "YlOrRd",
    "Spectral", "RdYlBu", "RdBu",
];

fn named_stops(name: &str) -> Option<&'static [u32]> {
    Some(match name {
        "Viridis" => VIRIDIS,
        "Inferno" => INFERNO,
        "Magma" => MAGMA,
        "Plasma" => PLASMA,
        "Blues" => BLUES,
        "Greens" => GREENS,
        "Reds" => REDS,
        "Greys" => GREYS,
        "YlOrRd" => YL_OR_RD,
        "Spectral" => SPECTRAL,
        "RdYlBu" => RD_YL_BU,
        "RdBu" => RD_BU,
        _ => return None,
    })
}

/// A continuous colour scale over `0..=1`, linearly interpolated between evenly spaced stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::from_hex(FALLBACK)
    }
}

impl ColorRamp {
    fn from_hex(stops: &[u32]) -> Self {
        Self {
            stops: stops.iter().copied().map(Rgb::from_u32).collect(),
        }
    }

    /// A ramp through the given colours. Returns `None` when `stops` is empty.
    #[must_use]
    pub fn new(stops: Vec<Rgb>) -> Option<Self> {
        (!stops.is_empty()).then_some(Self { stops })
    }

    /// Looks up a built-in ramp, first by exact name, then case-insensitively.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let stops = named_stops(name).or_else(|| {
            RAMP_NAMES
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(name))
                .and_then(|canonical| named_stops(canonical))
        })?;
        Some(Self::from_hex(stops))
    }

    /// Resolves a `cmap` property.
    ///
    /// An array of colours becomes a custom ramp, a ramp name selects a built-in ramp,
    /// a single colour becomes a ramp from black to that colour. Anything else falls back
    /// to the default diverging ramp.
    #[must_use]
    pub fn from_cmap(cmap: &Value) -> Self {
        match cmap {
            Value::Array(items) => {
                let stops = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(Rgb::parse)
                    .collect();
                Self::new(stops).unwrap_or_default()
            }
            Value::String(name) => Self::named(name)
                .or_else(|| {
                    Rgb::parse(name).map(|color| Self {
                        stops: vec![Rgb::new(0, 0, 0), color],
                    })
                })
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// The colour at position `t`, clamped to `0..=1`. `NaN` maps to the first stop.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(&self, t: f64) -> Rgb {
        let (first, rest) = match self.stops.split_first() {
            Some(split) => split,
            None => return Rgb::new(0, 0, 0),
        };
        if rest.is_empty() || t.is_nan() || t <= 0.0 {
            return *first;
        }
        let segments = rest.len();
        let scaled = t.min(1.0) * segments as f64;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - index as f64;
        self.stops[index].mix(self.stops[index + 1], local)
    }

    /// Maps `value` from the domain `[min, max]` onto the ramp.
    ///
    /// A degenerate domain (`min == max`) maps every value to the first stop.
    #[must_use]
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgb {
        let span = max - min;
        if span == 0.0 || !span.is_finite() {
            return self.sample(0.0);
        }
        self.sample((value - min) / span)
    }
}
