use crate::setup::{Preset, Setup};
use crate::variant::{Colors, Lead, Levels, Variant, Yiq};

/// Super Nintendo. Pixels are 16-bit RGB565, reduced to 13 significant bits
/// when looked up in the table.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Snes;

impl Variant for Snes {
    type Pixel = u16;
    type Field = bool;
    type Colors = SnesColors;

    const NAME: &'static str = "snes";
    const PALETTE_SIZE: usize = 0x2000;
    const BURST_COUNT: usize = 3;
    const BLACK: usize = 0;
    const LEAD: Lead = Lead::Single;
    // half normal range to allow for doubled hires pixels
    const RGB_BITS: u32 = 7;
    const GAMMA_SIZE: usize = 32;
    const ARTIFACTS_MID: f32 = 1.0;
    const ARTIFACTS_MAX: f32 = Self::ARTIFACTS_MID * 1.5;
    const FRINGING_MID: f32 = 1.0;
    const FRINGING_MAX: f32 = Self::FRINGING_MID * 2.0;
    const STD_DECODER_HUE: f32 = 0.0;
    const MERGE_FIELDS: bool = true;
    const SPREAD_ERRORS: bool = true;
    const FLICKER: bool = true;

    fn entry(pixel: u16) -> usize {
        let n = pixel as usize;
        ((n & 0x001e) | (n >> 1 & 0x03e0) | (n >> 2 & 0x3c00)) >> 1
    }

    fn preset(preset: Preset) -> Setup {
        match preset {
            Preset::Composite => Setup::COMPOSITE,
            Preset::SVideo => Setup::SVIDEO,
            Preset::Rgb => Setup::RGB,
            Preset::Monochrome => Setup::MONOCHROME,
        }
    }
}

/// Colors expanded from 4-bit red and blue and 5-bit green through the
/// gamma table.
pub struct SnesColors {
    to_float: Vec<f32>,
    palette: Option<Vec<Yiq>>,
}

impl Colors for SnesColors {
    fn new(setup: &Setup, levels: &Levels) -> Self {
        SnesColors {
            to_float: levels.to_float.clone(),
            palette: setup
                .palette
                .as_ref()
                .map(|p| p.iter().map(|&rgb| levels.rgb(rgb)).collect()),
        }
    }

    fn yiq(&self, entry: usize) -> Yiq {
        if let Some(&yiq) = self.palette.as_ref().and_then(|p| p.get(entry)) {
            return yiq;
        }

        // the low bits of red and blue are the least noticeable
        let ir = entry >> 8 & 0x1e;
        let ig = entry >> 4 & 0x1f;
        let ib = entry << 1 & 0x1e;

        Yiq::from_rgb(self.to_float[ir], self.to_float[ig], self.to_float[ib])
    }
}
