use crate::kernel::DEFAULT_DECODER;
use crate::setup::{Preset, Setup};
use crate::variant::{Colors, Lead, Levels, Variant, Yiq};

/// Nintendo Entertainment System. Pixels are 6-bit palette indices with the
/// red and green emphasis bits above them. The table covers all three
/// emphasis bits, entries `0x100..0x200` are only reachable through
/// [`Ntsc::palette`](crate::Ntsc::palette) and [`Ntsc::kernel`](crate::Ntsc::kernel).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Nes;

impl Variant for Nes {
    type Pixel = u8;
    type Field = bool;
    type Colors = NesColors;

    const NAME: &'static str = "nes";
    const PALETTE_SIZE: usize = 64 * 8;
    const BURST_COUNT: usize = 3;
    const BLACK: usize = 0x0f;
    const LEAD: Lead = Lead::Single;
    const RGB_BITS: u32 = 8;
    const GAMMA_SIZE: usize = 1;
    const ARTIFACTS_MID: f32 = 1.0;
    const ARTIFACTS_MAX: f32 = Self::ARTIFACTS_MID * 1.5;
    const FRINGING_MID: f32 = 1.0;
    const FRINGING_MAX: f32 = Self::FRINGING_MID * 2.0;
    const STD_DECODER_HUE: f32 = -15.0;
    const MERGE_FIELDS: bool = true;
    const SPREAD_ERRORS: bool = true;
    const BLUE_LIMIT: i32 = 0x3e0;

    fn entry(pixel: u8) -> usize {
        pixel as usize
    }

    fn preset(preset: Preset) -> Setup {
        match preset {
            Preset::Composite => Setup::COMPOSITE,
            Preset::SVideo => Setup::SVIDEO,
            Preset::Rgb => Setup::RGB,
            Preset::Monochrome => Setup::MONOCHROME,
        }
    }

    fn standard_hue(setup: &Setup) -> bool {
        !(setup.base_palette.is_some() || setup.palette.is_some())
    }
}

const LO_LEVELS: [f32; 4] = [-0.12, 0.0, 0.31, 0.72];
const HI_LEVELS: [f32; 4] = [0.4, 0.68, 1.0, 1.0];

const PHASES: [f32; 0x10 + 3] = [
    -1.0, -0.866025, -0.5, 0.0, 0.5, 0.866025, 1.0, 0.866025, 0.5, 0.0, -0.5, -0.866025, -1.0,
    -0.866025, -0.5, 0.0, 0.5, 0.866025, 1.0,
];

const ATTEN_MUL: f32 = 0.79399;
const ATTEN_SUB: f32 = 0.0782838;
const TINTS: [u8; 8] = [0, 6, 10, 8, 2, 4, 0, 0];

fn to_angle_sin(color: u8) -> f32 {
    PHASES[color as usize]
}

fn to_angle_cos(color: u8) -> f32 {
    PHASES[color as usize + 3]
}

/// Colors generated from the PPU's composite waveform levels.
pub struct NesColors {
    palette: Option<Vec<[u8; 3]>>,
    base_palette: Option<Vec<[u8; 3]>>,
    contrast: f32,
    brightness: f32,
    gamma_factor: f32,
    unit: f32,
    offset: f32,
}

impl NesColors {
    /// Composite waveform of a 9-bit palette entry, before any adjustment.
    fn waveform(&self, entry: usize) -> Yiq {
        let level = entry >> 4 & 0x03;
        let mut lo = LO_LEVELS[level];
        let mut hi = HI_LEVELS[level];

        let color = (entry & 0x0f) as u8;
        if color == 0 {
            lo = hi;
        } else if color == 0x0d {
            hi = lo;
        } else if color > 0x0d {
            hi = 0.0;
            lo = 0.0;
        }

        let mut yiq = match self.base_palette.as_ref().and_then(|p| p.get(entry & 0x3f)) {
            Some(&rgb) => rgb_to_yiq(rgb),
            None => {
                let sat = (hi - lo) * 0.5;
                Yiq {
                    y: (hi + lo) * 0.5,
                    i: to_angle_sin(color) * sat,
                    q: to_angle_cos(color) * sat,
                }
            }
        };

        let tint = entry >> 6 & 7;
        if tint != 0 && color <= 0x0d {
            if tint == 7 {
                yiq.y = yiq.y * (ATTEN_MUL * 1.13) - (ATTEN_SUB * 1.13);
            } else {
                let tint_color = TINTS[tint];
                let mut sat = hi * (0.5 - ATTEN_MUL * 0.5) + ATTEN_SUB * 0.5;
                yiq.y -= sat * 0.5;
                if tint >= 3 && tint != 4 {
                    // combined tint bits
                    sat *= 0.6;
                    yiq.y -= sat;
                }
                yiq.i += to_angle_sin(tint_color) * sat;
                yiq.q += to_angle_cos(tint_color) * sat;
            }
        }

        yiq
    }
}

fn rgb_to_yiq(rgb: [u8; 3]) -> Yiq {
    const TO_FLOAT: f32 = 1.0 / 0xff as f32;
    let [r, g, b] = rgb.map(|c| c as f32 * TO_FLOAT);
    Yiq::from_rgb(r, g, b)
}

impl Colors for NesColors {
    fn new(setup: &Setup, levels: &Levels) -> Self {
        let mut gamma = setup.gamma as f32 * -0.5;
        if Nes::standard_hue(setup) {
            gamma += 0.1333;
        }

        let mut gamma_factor = gamma.abs().powf(0.73);
        if gamma < 0.0 {
            gamma_factor = -gamma_factor;
        }

        NesColors {
            palette: setup.palette.clone(),
            base_palette: setup.base_palette.clone(),
            contrast: setup.contrast as f32,
            brightness: setup.brightness as f32,
            gamma_factor,
            unit: levels.unit,
            offset: levels.offset,
        }
    }

    fn yiq(&self, entry: usize) -> Yiq {
        let mut yiq = match self.palette.as_ref().and_then(|p| p.get(entry)) {
            Some(&rgb) => rgb_to_yiq(rgb),
            None => self.waveform(entry),
        };

        yiq.y *= self.contrast * 0.5 + 1.0;
        yiq.y += self.brightness * 0.5 - 0.5 / 256.0;

        // fast approximation of gamma
        let fast_gamma = |c: f32| (c * self.gamma_factor - self.gamma_factor) * c + c;
        let (r, g, b) = yiq.to_rgb::<f32>(&DEFAULT_DECODER);
        let yiq = Yiq::from_rgb(fast_gamma(r), fast_gamma(g), fast_gamma(b));

        Yiq {
            y: yiq.y * self.unit + self.offset,
            i: yiq.i * self.unit,
            q: yiq.q * self.unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ntsc;

    fn palette(setup: &Setup) -> Vec<[u8; 3]> {
        setup.generate_palette::<Nes>().unwrap()
    }

    #[test]
    fn unused_colors_are_black() {
        let palette = palette(&Setup::default());
        for entry in [0x0e, 0x0f, 0x1e, 0x1f, 0x2e, 0x3f] {
            assert_eq!(palette[entry], [0, 0, 0], "entry {entry:#04x}");
        }
    }

    #[test]
    fn grays_have_no_chroma() {
        let palette = palette(&Setup::default());
        for entry in [0x00, 0x10, 0x20, 0x30, 0x2d] {
            let [r, g, b] = palette[entry];
            assert_eq!(r, g, "entry {entry:#04x}");
            assert_eq!(g, b, "entry {entry:#04x}");
        }
        assert!(palette[0x30][0] > 240);
        assert!(palette[0x00][0] < palette[0x10][0]);
    }

    #[test]
    fn full_emphasis_darkens() {
        let palette = palette(&Setup::default());
        for color in 0..0x0d {
            let plain = palette[0x20 | color];
            let dark = palette[0x1c0 | 0x20 | color];
            let sum = |c: [u8; 3]| c.iter().map(|&v| v as u32).sum::<u32>();
            assert!(sum(dark) < sum(plain), "color {color:#04x}");
        }
    }

    #[test]
    fn custom_palette_is_reproduced() {
        let colors = vec![[200, 100, 50], [10, 220, 130]];
        let setup = Setup {
            palette: Some(colors.clone()),
            ..Setup::default()
        };
        let palette = palette(&setup);

        for (expected, actual) in colors.iter().zip(&palette) {
            for (e, a) in expected.iter().zip(actual) {
                assert!(e.abs_diff(*a) <= 6, "{expected:?} vs {actual:?}");
            }
        }
        assert_eq!(palette[0x0f], [0, 0, 0]);
    }

    #[test]
    fn base_palette_keeps_emphasis() {
        let setup = Setup {
            base_palette: Some(vec![[128, 128, 128]; 64]),
            ..Setup::default()
        };
        let palette = palette(&setup);

        assert_eq!(palette[0x01], palette[0x21]);
        assert_ne!(palette[0x01], palette[0x41]);
    }

    #[test]
    fn brightness_raises_every_color() {
        let normal = palette(&Setup::default());
        let bright = palette(&Setup {
            brightness: 0.5,
            ..Setup::default()
        });

        for entry in [0x00, 0x16, 0x2a] {
            assert!(bright[entry][1] > normal[entry][1]);
        }
    }

    #[test]
    fn table_covers_emphasis() {
        let ntsc = Ntsc::<Nes>::new(&Setup::default()).unwrap();
        assert_eq!(ntsc.palette().len(), 512);
        assert_eq!(Nes::entry(u8::MAX), 0xff);
        assert!(ntsc.kernel(511).is_some());
        assert!(ntsc.kernel(512).is_none());
    }
}
