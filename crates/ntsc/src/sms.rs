use crate::setup::{Preset, Setup};
use crate::variant::{Colors, Lead, Levels, Variant, Yiq};

/// Sega Master System. Pixels are 12-bit BGR with four bits per channel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Sms;

impl Variant for Sms {
    type Pixel = u16;
    type Field = ();
    type Colors = SmsColors;

    const NAME: &'static str = "sms";
    const PALETTE_SIZE: usize = 0x1000;
    const BURST_COUNT: usize = 1;
    const BLACK: usize = 0;
    const LEAD: Lead = Lead::Remainder;
    const RGB_BITS: u32 = 8;
    const GAMMA_SIZE: usize = 16;
    const ARTIFACTS_MID: f32 = 0.4;
    const ARTIFACTS_MAX: f32 = Self::ARTIFACTS_MID * 3.0;
    const FRINGING_MID: f32 = 0.8;
    const FRINGING_MAX: f32 = Self::FRINGING_MID * 2.0;
    const STD_DECODER_HUE: f32 = 0.0;
    const MERGE_FIELDS: bool = false;
    const SPREAD_ERRORS: bool = false;

    fn entry(pixel: u16) -> usize {
        pixel as usize & 0x0fff
    }

    fn preset(preset: Preset) -> Setup {
        let setup = match preset {
            Preset::Composite => Setup::COMPOSITE.with_resolution(0.25),
            Preset::SVideo => Setup::SVIDEO.with_sharpness(0.0).with_resolution(0.25),
            Preset::Rgb => Setup::RGB,
            Preset::Monochrome => Setup::MONOCHROME,
        };

        setup.with_merge_fields(false)
    }
}

/// Colors expanded from four bits per channel through the gamma table.
pub struct SmsColors {
    to_float: Vec<f32>,
    palette: Option<Vec<Yiq>>,
}

impl Colors for SmsColors {
    fn new(setup: &Setup, levels: &Levels) -> Self {
        SmsColors {
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

        let bb = self.to_float[entry >> 8 & 0x0f];
        let gg = self.to_float[entry >> 4 & 0x0f];
        let rr = self.to_float[entry & 0x0f];

        Yiq::from_rgb(rr, gg, bb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ntsc;

    #[test]
    fn bgr12_channels() {
        let palette = Setup::default().generate_palette::<Sms>().unwrap();
        let [r, g, b] = palette[0x00f];
        assert!(r > g && r > b, "{r} {g} {b}");
        let [r, g, b] = palette[0xf00];
        assert!(b > r && b > g, "{r} {g} {b}");
        assert_eq!(palette[0x000], [0, 0, 0]);
    }

    #[test]
    fn upper_bits_are_ignored() {
        assert_eq!(Sms::entry(0xf123), 0x123);
    }

    #[test]
    fn every_pixel_is_drawn() {
        for width in [1, 2, 3, 4, 5, 256] {
            let out_width = Ntsc::<Sms>::out_width(width);
            assert_eq!(out_width, (width / 3 + 1) * 7);
            assert!(!Ntsc::<Sms>::output_span(width, width - 1).is_empty());
        }
    }

    #[test]
    fn table_has_a_single_burst() {
        let ntsc = Ntsc::<Sms>::new(&Preset::Composite.setup::<Sms>()).unwrap();
        assert_eq!(ntsc.kernel(0x123).map(<[_]>::len), Some(42));
    }
}
