//! Three 10-bit color channels packed into a single integer so that a pixel's
//! contributions can be summed with one add. Channels are stored with an
//! offset and may borrow from each other while intermediate sums are
//! negative; only the final sum is clamped and unpacked.

/// Packed red, green and blue at bits 21, 11 and 1.
pub type PackedRgb = u32;

pub(crate) const RGB_BUILDER: PackedRgb = 1 << 21 | 1 << 11 | 1 << 1;
const CLAMP_MASK: PackedRgb = RGB_BUILDER * 3 / 2;
const CLAMP_ADD: PackedRgb = RGB_BUILDER * 0x101;

pub(crate) fn pack_rgb(r: i32, g: i32, b: i32) -> PackedRgb {
    let r = r as PackedRgb;
    let g = g as PackedRgb;
    let b = b as PackedRgb;

    r << 21 | g << 11 | b << 1
}

/// Saturates each channel to its low 8 bits. `shift` is the number of bits
/// the channels were reduced by when the table was compiled.
pub(crate) fn clamp(mut io: PackedRgb, shift: u32) -> PackedRgb {
    let sub = io >> (9 - shift) & CLAMP_MASK;
    let mut clamp = CLAMP_ADD.wrapping_sub(sub);
    io |= clamp;
    clamp = clamp.wrapping_sub(sub);
    io &= clamp;

    io
}

/// Converts a clamped value to `0x00RRGGBB`.
pub(crate) fn to_rgb32(raw: PackedRgb, shift: u32) -> u32 {
    (raw >> (5 - shift) & 0xff0000) | (raw >> (3 - shift) & 0xff00) | (raw >> (1 - shift) & 0xff)
}

/// Averages two biased values channel by channel without losing the low bit.
pub(crate) fn average(a: PackedRgb, b: PackedRgb) -> PackedRgb {
    a.wrapping_add(b).wrapping_sub((a ^ b) & RGB_BUILDER) >> 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(rgb: u32) -> (u32, u32, u32) {
        (rgb >> 16 & 0xff, rgb >> 8 & 0xff, rgb & 0xff)
    }

    #[test]
    fn in_range_channels_pass_through() {
        let raw = pack_rgb(512 + 200, 512 + 10, 512 + 128);
        assert_eq!(channels(to_rgb32(clamp(raw, 0), 0)), (200, 10, 128));
    }

    #[test]
    fn channels_saturate_independently() {
        let raw = pack_rgb(512 + 300, 512 - 40, 512 + 64);
        let (r, g, b) = channels(to_rgb32(clamp(raw, 0), 0));
        assert!(r >= 254);
        assert_eq!(g, 0);
        assert_eq!(b, 64);
    }

    #[test]
    fn reduced_precision_is_scaled_up() {
        let raw = pack_rgb(256 + 100, 256 + 50, 256);
        assert_eq!(channels(to_rgb32(clamp(raw, 1), 1)), (200, 100, 0));
    }

    #[test]
    fn average_of_biased_values() {
        let a = pack_rgb(600, 520, 700);
        let b = pack_rgb(610, 530, 702);
        assert_eq!(average(a, b), pack_rgb(605, 525, 701));
    }
}
