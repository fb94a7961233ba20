#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::variant::Variant;

/// Image parameters, ranging from -1.0 to 1.0. Values outside of that range
/// are clamped when the filter is built. Actual internal values are shown in
/// parenthesis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Setup {
    /// -1 = -180 degrees, +1 = +180 degrees
    pub hue: f64,
    /// -1 = grayscale (0.0), +1 = oversaturated colors (2.0)
    pub saturation: f64,
    /// -1 = dark (0.5), +1 = light (1.5)
    pub contrast: f64,
    /// -1 = dark (0.5), +1 = light (1.5)
    pub brightness: f64,
    /// edge contrast enhancement/blurring
    pub sharpness: f64,

    /// -1 = dark (1.5), +1 = light (0.5)
    pub gamma: f64,
    /// image resolution
    pub resolution: f64,
    /// artifacts caused by color changes
    pub artifacts: f64,
    /// color artifacts caused by brightness changes
    pub fringing: f64,
    /// color bleed (color resolution reduction)
    pub bleed: f64,
    /// if set, merges even and odd fields together to reduce flicker
    pub merge_fields: bool,
    /// optional RGB decoder matrix, the I and Q weights of red, green and blue
    pub decoder_matrix: Option<[f32; 6]>,

    /// Replaces the console's color generation. Entries past the end of the
    /// list fall back to the generated colors.
    pub palette: Option<Vec<[u8; 3]>>,
    /// Replaces only the 64 base colors of the NES while still applying
    /// color emphasis. Ignored by other consoles.
    pub base_palette: Option<Vec<[u8; 3]>>,
}

impl Default for Setup {
    fn default() -> Self {
        Setup::COMPOSITE
    }
}

impl Setup {
    /// color bleeding + artifacts
    pub const COMPOSITE: Setup = Setup::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, true);
    /// color bleeding only
    pub const SVIDEO: Setup = Setup::new(0.2, 0.2, -1.0, -1.0, 0.0, 0.0, true);
    /// crisp image
    pub const RGB: Setup = Setup::new(0.2, 0.7, -1.0, -1.0, -1.0, 0.0, true);
    /// desaturated + artifacts
    pub const MONOCHROME: Setup = Setup::new(0.2, 0.2, -0.2, -0.2, -1.0, -1.0, true);

    const fn new(
        sharpness: f64,
        resolution: f64,
        artifacts: f64,
        fringing: f64,
        bleed: f64,
        saturation: f64,
        merge_fields: bool,
    ) -> Setup {
        Setup {
            hue: 0.0,
            saturation,
            contrast: 0.0,
            brightness: 0.0,
            sharpness,
            gamma: 0.0,
            resolution,
            artifacts,
            fringing,
            bleed,
            merge_fields,
            decoder_matrix: None,
            palette: None,
            base_palette: None,
        }
    }

    pub(crate) const fn with_resolution(mut self, resolution: f64) -> Setup {
        self.resolution = resolution;
        self
    }

    pub(crate) const fn with_sharpness(mut self, sharpness: f64) -> Setup {
        self.sharpness = sharpness;
        self
    }

    pub(crate) const fn with_merge_fields(mut self, merge_fields: bool) -> Setup {
        self.merge_fields = merge_fields;
        self
    }

    /// Overwrites every field, overrides included, with the values of
    /// `preset` for console `V`.
    pub fn apply_preset<V: Variant>(&mut self, preset: Preset) {
        *self = preset.setup::<V>();
    }

    /// Copy of the setup with every parameter limited to -1.0..=1.0.
    pub fn clamped(&self) -> Setup {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };

        Setup {
            hue: clamp(self.hue),
            saturation: clamp(self.saturation),
            contrast: clamp(self.contrast),
            brightness: clamp(self.brightness),
            sharpness: clamp(self.sharpness),
            gamma: clamp(self.gamma),
            resolution: clamp(self.resolution),
            artifacts: clamp(self.artifacts),
            fringing: clamp(self.fringing),
            bleed: clamp(self.bleed),
            ..self.clone()
        }
    }

    /// Field merging is forced on when both artifacts and fringing are
    /// disabled since there is nothing left to flicker.
    pub(crate) fn merges_fields(&self) -> bool {
        self.merge_fields || (self.artifacts <= -1.0 && self.fringing <= -1.0)
    }

    /// An RGB palette can be generated for use in a normal blitter, one color
    /// per table entry of console `V`.
    pub fn generate_palette<V: Variant>(&self) -> Result<Vec<[u8; 3]>, Error> {
        crate::kernel::palette::<V>(self)
    }
}

/// Converts a 3x3 YIQ to RGB matrix, one row per output channel with columns
/// Y, I and Q, into decoder coefficients. The luma column is implied to be 1.
pub fn decoder_from_matrix(matrix: [[f32; 3]; 3]) -> [f32; 6] {
    let [r, g, b] = matrix;
    [r[1], r[2], g[1], g[2], b[1], b[2]]
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    Composite,
    SVideo,
    Rgb,
    Monochrome,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Composite,
        Preset::SVideo,
        Preset::Rgb,
        Preset::Monochrome,
    ];

    pub fn setup<V: Variant>(self) -> Setup {
        V::preset(self)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Preset::Composite => "composite",
            Preset::SVideo => "svideo",
            Preset::Rgb => "rgb",
            Preset::Monochrome => "monochrome",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

/// Either a named preset or a fully custom setup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Profile {
    Preset(Preset),
    Custom(Setup),
}

impl Profile {
    /// Custom setups are returned as given, range checking is left to the
    /// filter.
    pub fn resolve<V: Variant>(self) -> Setup {
        match self {
            Profile::Preset(preset) => preset.setup::<V>(),
            Profile::Custom(setup) => setup,
        }
    }
}

impl From<Preset> for Profile {
    fn from(preset: Preset) -> Self {
        Profile::Preset(preset)
    }
}

impl From<Setup> for Profile {
    fn from(setup: Setup) -> Self {
        Profile::Custom(setup)
    }
}
