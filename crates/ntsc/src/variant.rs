use crate::setup::{Preset, Setup};

/// Compile-time description of a console's video signal. Every console is a
/// distinct instantiation of the same compiler and blitter.
pub trait Variant:
    Copy + Clone + Default + std::fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Element type of the input framebuffer.
    type Pixel: Copy + Default + Send + Sync + 'static;
    /// Per-frame argument used to seed the burst phase.
    type Field: Field;
    /// Generates the analog color of every palette entry.
    type Colors: Colors;

    const NAME: &'static str;
    /// Number of entries in the compiled table.
    const PALETTE_SIZE: usize;
    /// Number of distinct burst phases a scanline can start on.
    const BURST_COUNT: usize;
    /// Table entry used to pad the edges of a row.
    const BLACK: usize;
    const LEAD: Lead;
    /// Precision of each packed channel.
    const RGB_BITS: u32;
    const GAMMA_SIZE: usize;
    const ARTIFACTS_MID: f32;
    const ARTIFACTS_MAX: f32;
    const FRINGING_MID: f32;
    const FRINGING_MAX: f32;
    /// Decoder hue offset in degrees.
    const STD_DECODER_HUE: f32;
    /// Whether even and odd fields can be blended together.
    const MERGE_FIELDS: bool;
    /// Whether rounding errors are spread over several kernel taps.
    const SPREAD_ERRORS: bool;
    /// Upper limit applied to the blue channel of the reference color.
    const BLUE_LIMIT: i32 = i32::MAX;
    /// Whether front-ends alternate fields between frames unless told
    /// otherwise.
    const FLICKER: bool = false;

    /// Table entry for an input pixel.
    fn entry(pixel: Self::Pixel) -> usize;

    fn preset(preset: Preset) -> Setup;

    /// Whether the standard decoder hue offset applies to this setup.
    fn standard_hue(_setup: &Setup) -> bool {
        true
    }
}

/// How the leading pixels of a row are placed ahead of the first full chunk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lead {
    /// The first pixel primes the row; pixels that don't fill a whole chunk at
    /// the end of the row are dropped.
    Single,
    /// `width % 3` pixels prime the row so every pixel is drawn.
    Remainder,
}

impl Lead {
    pub const fn count(self, in_width: usize) -> usize {
        match self {
            Lead::Single => {
                if in_width == 0 {
                    0
                } else {
                    1
                }
            }
            Lead::Remainder => in_width % crate::IN_CHUNK,
        }
    }
}

/// Field flag passed to the blitter each frame.
pub trait Field: Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    fn seed(self) -> usize;
    /// The field of the following frame.
    fn next(self) -> Self;
}

/// Consoles whose sub-pixel rendering alternates between frames.
impl Field for bool {
    fn seed(self) -> usize {
        self as usize
    }

    fn next(self) -> Self {
        !self
    }
}

/// Consoles without modelled flicker.
impl Field for () {
    fn seed(self) -> usize {
        0
    }

    fn next(self) -> Self {}
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Yiq {
    pub y: f32,
    pub i: f32,
    pub q: f32,
}

impl Yiq {
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let y = r * 0.299 + g * 0.587 + b * 0.114;
        let i = r * 0.596 - g * 0.275 - b * 0.321;
        let q = r * 0.212 - g * 0.523 + b * 0.311;

        Yiq { y, i, q }
    }

    pub(crate) fn to_rgb<T: FromFloat>(self, to_rgb: &[f32; 6]) -> (T, T, T) {
        let r = self.y + to_rgb[0] * self.i + to_rgb[1] * self.q;
        let g = self.y + to_rgb[2] * self.i + to_rgb[3] * self.q;
        let b = self.y + to_rgb[4] * self.i + to_rgb[5] * self.q;

        (T::from_f32(r), T::from_f32(g), T::from_f32(b))
    }
}

pub(crate) trait FromFloat {
    fn from_f32(value: f32) -> Self;
}

impl FromFloat for i32 {
    fn from_f32(value: f32) -> Self {
        value as i32
    }
}

impl FromFloat for f32 {
    fn from_f32(value: f32) -> Self {
        value
    }
}

/// Brightness, contrast and gamma in table units.
#[derive(Debug, Clone)]
pub struct Levels {
    /// Scale of one full channel, `1 << RGB_BITS`.
    pub unit: f32,
    /// Bias added to luma so packed channels stay positive.
    pub offset: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub gamma: f32,
    /// `GAMMA_SIZE` evenly spaced intensities through `level`.
    pub to_float: Vec<f32>,
}

impl Levels {
    pub(crate) fn new<V: Variant>(setup: &Setup) -> Self {
        let unit = (1u32 << V::RGB_BITS) as f32;
        let offset = unit * 2.0 + 0.5;

        let mut levels = Levels {
            unit,
            offset,
            contrast: setup.contrast as f32 * (0.5 * unit) + unit,
            brightness: setup.brightness as f32 * (0.5 * unit) + offset,
            gamma: 1.1333 - setup.gamma as f32 * 0.5,
            to_float: Vec::with_capacity(V::GAMMA_SIZE),
        };

        if V::GAMMA_SIZE > 1 {
            let to_float = 1.0 / (V::GAMMA_SIZE - 1) as f32;
            for idx in 0..V::GAMMA_SIZE {
                let level = levels.level(idx as f32 * to_float);
                levels.to_float.push(level);
            }
        }

        levels
    }

    /// Maps a linear intensity in `0.0..=1.0` through gamma, contrast and
    /// brightness.
    pub fn level(&self, value: f32) -> f32 {
        value.powf(self.gamma) * self.contrast + self.brightness
    }

    /// Analog color of a 24-bit RGB palette entry.
    pub fn rgb(&self, rgb: [u8; 3]) -> Yiq {
        const TO_FLOAT: f32 = 1.0 / 0xff as f32;
        let [r, g, b] = rgb.map(|c| self.level(c as f32 * TO_FLOAT));
        Yiq::from_rgb(r, g, b)
    }
}

/// Color generation for a console's table entries.
pub trait Colors: Sized {
    fn new(setup: &Setup, levels: &Levels) -> Self;

    /// YIQ of `entry` in table units, with `Levels::offset` included in luma.
    fn yiq(&self, entry: usize) -> Yiq;
}
