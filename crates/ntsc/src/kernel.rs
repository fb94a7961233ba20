// Derived from nes_ntsc, snes_ntsc and sms_ntsc 0.2.2
/* http://www.slack.net/~ant/ */

/* Copyright (C) 2006-2007 Shay Green. This module is free software; you
can redistribute it and/or modify it under the terms of the GNU Lesser
General Public License as published by the Free Software Foundation; either
version 2.1 of the License, or (at your option) any later version. This
module is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
FOR A PARTICULAR PURPOSE. See the GNU Lesser General Public License for more
details. You should have received a copy of the GNU Lesser General Public
License along with this module; if not, write to the Free Software Foundation,
Inc., 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA */

use std::marker::PhantomData;

use crate::KERNEL_WIDTH;
use crate::error::{Error, try_filled};
use crate::packed::{self, PackedRgb, RGB_BUILDER};
use crate::setup::Setup;
use crate::variant::{Colors, Levels, Variant, Yiq};

const ALIGNMENT_COUNT: usize = 3;
const RESCALE_IN: i32 = 8;
const RESCALE_OUT: i32 = 7;

/// Packed contributions of one entry at one burst phase, all alignments.
pub(crate) const BURST_SIZE: usize = ALIGNMENT_COUNT * KERNEL_WIDTH;

const KERNEL_HALF: i32 = 16;
const KERNEL_SIZE: i32 = KERNEL_HALF * 2 + 1;
const LUMA_CUTOFF: f32 = 0.2;

pub(crate) const DEFAULT_DECODER: [f32; 6] = [0.956, 0.621, -0.272, -0.647, -1.105, 1.702];

const PI: f32 = std::f32::consts::PI;

/// Compiled table of a console's palette encoded at every burst phase and
/// pixel alignment.
#[derive(Clone, PartialEq)]
pub struct Ntsc<V: Variant> {
    table: Box<[PackedRgb]>,
    palette: Box<[[u8; 3]]>,
    variant: PhantomData<V>,
}

impl<V: Variant> std::fmt::Debug for Ntsc<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ntsc")
            .field("variant", &V::NAME)
            .field("entries", &V::PALETTE_SIZE)
            .field("entry_size", &Self::ENTRY_SIZE)
            .finish()
    }
}

impl<V: Variant> Ntsc<V> {
    /// Number of packed values stored for each table entry.
    pub const ENTRY_SIZE: usize = V::BURST_COUNT * BURST_SIZE;

    /// Initializes and adjusts parameters. Out of range parameters are
    /// clamped rather than rejected.
    pub fn new(setup: &Setup) -> Result<Self, Error> {
        let compiler = Compiler::<V>::new(setup);

        let mut table = try_filled(V::PALETTE_SIZE * Self::ENTRY_SIZE, 0)?;
        let mut palette = try_filled(V::PALETTE_SIZE, [0; 3])?;

        for (entry, (kernel, palette_out)) in table
            .chunks_exact_mut(Self::ENTRY_SIZE)
            .zip(palette.iter_mut())
            .enumerate()
        {
            let (yiq, rgb) = compiler.reference(entry);
            *palette_out = compiler.palette_out(rgb);

            compiler.gen_kernel(yiq, kernel);
            if compiler.merge_fields {
                merge_kernel_fields(kernel, compiler.bias);
            }
            compiler.correct_errors(rgb, kernel);
        }

        tracing::debug!(
            variant = V::NAME,
            entries = V::PALETTE_SIZE,
            merge_fields = compiler.merge_fields,
            "compiled ntsc table"
        );

        Ok(Ntsc {
            table: table.into_boxed_slice(),
            palette: palette.into_boxed_slice(),
            variant: PhantomData,
        })
    }

    /// Resolved RGB color of every table entry, converted the same way as
    /// blitted pixels.
    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    pub(crate) fn entry(&self, entry: usize) -> &[PackedRgb] {
        let start = entry * Self::ENTRY_SIZE;
        &self.table[start..start + Self::ENTRY_SIZE]
    }

    /// Raw packed contributions of `entry`, grouped by burst phase and then
    /// alignment.
    pub fn kernel(&self, entry: usize) -> Option<&[PackedRgb]> {
        (entry < V::PALETTE_SIZE).then(|| self.entry(entry))
    }

    /// Number of output pixels written by the blitter for the given input
    /// width. Guaranteed not to round 256 down at all.
    pub const fn out_width(in_width: usize) -> usize {
        let lead = V::LEAD.count(in_width);
        ((in_width - lead) / crate::IN_CHUNK + 1) * crate::OUT_CHUNK
    }

    /// Number of input pixels that will fit within the given output width.
    /// Might be rounded down slightly.
    pub const fn in_width(out_width: usize) -> usize {
        let chunks = (out_width / crate::OUT_CHUNK).saturating_sub(1);
        let lead = match V::LEAD {
            crate::Lead::Single => 1,
            crate::Lead::Remainder => 2,
        };
        chunks * crate::IN_CHUNK + lead
    }
}

/// Generates only the resolved palette of `setup`, skipping the kernels.
pub(crate) fn palette<V: Variant>(setup: &Setup) -> Result<Vec<[u8; 3]>, Error> {
    let compiler = Compiler::<V>::new(setup);
    let mut palette = try_filled(V::PALETTE_SIZE, [0; 3])?;
    for (entry, out) in palette.iter_mut().enumerate() {
        let (_, rgb) = compiler.reference(entry);
        *out = compiler.palette_out(rgb);
    }

    Ok(palette)
}

struct Compiler<V: Variant> {
    to_rgb: [[f32; 6]; 3],
    artifacts: f32,
    fringing: f32,
    kernel: [f32; (RESCALE_OUT * KERNEL_SIZE * 2) as usize],
    offset: f32,
    bias: PackedRgb,
    merge_fields: bool,
    colors: V::Colors,
}

impl<V: Variant> Compiler<V> {
    fn new(setup: &Setup) -> Self {
        let setup = setup.clamped();
        let levels = Levels::new::<V>(&setup);

        let artifacts = adjust(setup.artifacts as f32, V::ARTIFACTS_MID, V::ARTIFACTS_MAX);
        let fringing = adjust(setup.fringing as f32, V::FRINGING_MID, V::FRINGING_MAX);

        let mut hue = setup.hue as f32 * PI + PI / 180.0 * (V::STD_DECODER_HUE + 15.0);
        let sat = setup.saturation as f32 + 1.0;
        let decoder = match setup.decoder_matrix.as_ref() {
            Some(decoder) => decoder,
            None => {
                if V::standard_hue(&setup) {
                    hue += PI / 180.0 * -15.0;
                }
                &DEFAULT_DECODER
            }
        };

        let mut to_rgb = [[0.0; 6]; 3];
        let mut s = hue.sin() * sat;
        let mut c = hue.cos() * sat;
        for burst in to_rgb.iter_mut().take(V::BURST_COUNT) {
            for (out, iq) in burst.chunks_exact_mut(2).zip(decoder.chunks_exact(2)) {
                let (i, q) = (iq[0], iq[1]);
                out[0] = i * c - q * s;
                out[1] = i * s + q * c;
            }
            (s, c) = rotate_iq(s, c, 0.866025, -0.5);
        }

        let bias = levels.unit as PackedRgb * 2 * RGB_BUILDER;

        Compiler {
            to_rgb,
            artifacts,
            fringing,
            kernel: init_filters(&setup),
            offset: levels.offset,
            bias,
            merge_fields: V::MERGE_FIELDS && V::BURST_COUNT == 3 && setup.merges_fields(),
            colors: V::Colors::new(&setup, &levels),
        }
    }

    /// Analog color of `entry` and the packed color its kernels must sum to.
    fn reference(&self, entry: usize) -> (Yiq, PackedRgb) {
        let yiq = self.colors.yiq(entry);
        let (r, g, b) = yiq.to_rgb::<i32>(&self.to_rgb[0]);

        (yiq, packed::pack_rgb(r, g, b.min(V::BLUE_LIMIT)))
    }

    fn palette_out(&self, rgb: PackedRgb) -> [u8; 3] {
        let shift = 8 - V::RGB_BITS;
        let rgb = packed::to_rgb32(packed::clamp(rgb, shift), shift);
        [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
    }

    fn gen_kernel(&self, yiq: Yiq, out: &mut [PackedRgb]) {
        let Yiq { mut y, mut i, mut q } = yiq;
        y -= self.offset;

        let mut out = out.chunks_exact_mut(KERNEL_WIDTH);
        for to_rgb in self.to_rgb.iter().take(V::BURST_COUNT) {
            for (pixel, out) in PIXELS.iter().zip(&mut out) {
                let yy = y * self.fringing * pixel.negate;
                let ic0 = (i + yy) * pixel.kernel[0];
                let qc1 = (q + yy) * pixel.kernel[1];
                let ic2 = (i - yy) * pixel.kernel[2];
                let qc3 = (q - yy) * pixel.kernel[3];

                let factor = self.artifacts * pixel.negate;
                let ii = i * factor;
                let yc0 = (y + ii) * pixel.kernel[0];
                let yc2 = (y - ii) * pixel.kernel[2];

                let qq = q * factor;
                let yc1 = (y + qq) * pixel.kernel[1];
                let yc3 = (y - qq) * pixel.kernel[3];

                let kernel_size = KERNEL_SIZE as usize;
                let mut k_idx = pixel.offset as usize;
                for out in out.iter_mut() {
                    let k = &self.kernel[k_idx..];
                    let yiq = Yiq {
                        i: k[0] * ic0 + k[2] * ic2,
                        q: k[1] * qc1 + k[3] * qc3,
                        y: k[kernel_size] * yc0
                            + k[kernel_size + 1] * yc1
                            + k[kernel_size + 2] * yc2
                            + k[kernel_size + 3] * yc3
                            + self.offset,
                    };

                    if k_idx < kernel_size * 2 * (RESCALE_OUT as usize - 1) {
                        k_idx += kernel_size * 2 - 1;
                    } else {
                        k_idx -= kernel_size * 2 * (RESCALE_OUT as usize - 1) + 2;
                    }

                    let (r, g, b) = yiq.to_rgb::<i32>(to_rgb);
                    *out = packed::pack_rgb(r, g, b).wrapping_sub(self.bias);
                }
            }

            (i, q) = rotate_iq(i, q, -0.866025, -0.5);
        }
    }

    /// Adjusts the kernels so a uniform row sums to `color` exactly.
    fn correct_errors(&self, color: PackedRgb, kernel: &mut [PackedRgb]) {
        for out in kernel.chunks_exact_mut(BURST_SIZE) {
            for i in 0..KERNEL_WIDTH / 2 {
                let error = color
                    .wrapping_sub(out[i])
                    .wrapping_sub(out[(i + 12) % 14 + 14])
                    .wrapping_sub(out[(i + 10) % 14 + 28])
                    .wrapping_sub(out[i + 7])
                    .wrapping_sub(out[i + 5 + 14])
                    .wrapping_sub(out[i + 3 + 28]);

                if V::SPREAD_ERRORS {
                    self.distribute_error([i + 3 + 28, i + 5 + 14, i + 7], i, error, out);
                } else {
                    out[i + 3 + 28] = out[i + 3 + 28].wrapping_add(error);
                }
            }
        }
    }

    fn distribute_error(
        &self,
        taps: [usize; 3],
        i: usize,
        error: PackedRgb,
        out: &mut [PackedRgb],
    ) {
        let mut fourth = error.wrapping_add(2 * RGB_BUILDER) >> 2;
        fourth &= (self.bias >> 1) - RGB_BUILDER;
        fourth = fourth.wrapping_sub(self.bias >> 2);
        for tap in taps {
            out[tap] = out[tap].wrapping_add(fourth);
        }
        out[i] = out[i].wrapping_add(error.wrapping_sub(fourth.wrapping_mul(3)));
    }
}

fn adjust(value: f32, mid: f32, max: f32) -> f32 {
    let value = if value > 0.0 { value * (max - mid) } else { value };
    value * mid + mid
}

fn rotate_iq(i: f32, q: f32, sin_b: f32, cos_b: f32) -> (f32, f32) {
    (i * cos_b - q * sin_b, i * sin_b + q * cos_b)
}

/// Luma and chroma filters, interleaved and rescaled from 8 to 7 pixels.
fn init_filters(setup: &Setup) -> [f32; (RESCALE_OUT * KERNEL_SIZE * 2) as usize] {
    let mut kernels = [0.0; KERNEL_SIZE as usize * 2];
    let luma = KERNEL_SIZE as usize * 3 / 2 - KERNEL_HALF as usize;

    let rolloff = 1.0 + setup.sharpness as f32 * 0.032;
    let maxh = 32.0;
    let pow_a_n = rolloff.powf(maxh);

    let mut to_angle = setup.resolution as f32 + 1.0;
    to_angle = PI / maxh * LUMA_CUTOFF * (to_angle * to_angle + 1.0);
    kernels[KERNEL_SIZE as usize * 3 / 2] = maxh;
    for i in 0..KERNEL_SIZE {
        let x = i - KERNEL_HALF;
        let angle = x as f32 * to_angle;

        // instability occurs at center point with rolloff very close to 1.0
        if x != 0 || pow_a_n > 1.056 || pow_a_n < 0.981 {
            let rolloff_cos_a = rolloff * angle.cos();
            let num = 1.0 - rolloff_cos_a - pow_a_n * (maxh * angle).cos()
                + pow_a_n * rolloff * ((maxh - 1.0) * angle).cos();
            let den = 1.0 - rolloff_cos_a - rolloff_cos_a + rolloff * rolloff;
            kernels[luma + i as usize] = num / den - 0.5;
        }
    }

    let mut sum = 0.0;
    for (i, k) in kernels[luma..].iter_mut().enumerate() {
        let x = PI * 2.0 / (KERNEL_HALF * 2) as f32 * i as f32;
        let blackman = 0.42 - 0.5 * x.cos() + 0.08 * (x * 2.0).cos();
        *k *= blackman;
        sum += *k;
    }

    let sum = 1.0 / sum;
    for k in &mut kernels[luma..] {
        *k *= sum;
    }

    let cutoff_factor = -0.03125;
    let mut cutoff = setup.bleed as f32;
    if cutoff < 0.0 {
        // keep extreme value accessible only near upper end of scale (1.0)
        cutoff *= cutoff;
        cutoff *= cutoff;
        cutoff *= cutoff;
        cutoff *= -30.0 / 0.65;
    }
    cutoff = cutoff_factor - 0.65 * cutoff_factor * cutoff;

    for i in -KERNEL_HALF..=KERNEL_HALF {
        let x = i as f32;
        kernels[(KERNEL_SIZE / 2 + i) as usize] = (x * x * cutoff).exp();
    }

    // normalize even and odd phases separately
    for phase in 0..2 {
        let chroma = &mut kernels[..KERNEL_SIZE as usize];
        let sum: f32 = chroma.iter().skip(phase).step_by(2).sum();
        let sum = 1.0 / sum;
        for k in chroma.iter_mut().skip(phase).step_by(2) {
            *k *= sum;
        }
    }

    let mut out = [0.0; (RESCALE_OUT * KERNEL_SIZE * 2) as usize];
    let mut weight = 1.0;
    for phase in out.chunks_exact_mut(KERNEL_SIZE as usize * 2) {
        let mut remain = 0.0;
        weight -= 1.0 / RESCALE_IN as f32;
        for (out, &cur) in phase.iter_mut().zip(&kernels) {
            let m = cur * weight;
            *out = m + remain;
            remain = cur - m;
        }
    }

    out
}

struct PixelInfo {
    offset: i32,
    negate: f32,
    kernel: [f32; 4],
}

const PIXELS: [PixelInfo; ALIGNMENT_COUNT] = [
    pixel_info(-4, -9, [1.0, 1.0, 0.6667, 0.0]),
    pixel_info(-2, -7, [0.3333, 1.0, 1.0, 0.3333]),
    pixel_info(0, -5, [0.0, 0.6667, 1.0, 1.0]),
];

const fn pixel_info(ntsc: i32, scaled: i32, kernel: [f32; 4]) -> PixelInfo {
    let shifted = ntsc - scaled / RESCALE_OUT * RESCALE_IN;
    let scaled = (scaled + RESCALE_OUT * 10) % RESCALE_OUT;
    let offset = KERNEL_SIZE / 2
        + shifted
        + (scaled != 0) as i32
        + (RESCALE_OUT - scaled) % RESCALE_OUT
        + (KERNEL_SIZE * 2 * scaled);

    PixelInfo {
        offset,
        negate: (1 - ((ntsc + 100) & 2)) as f32,
        kernel,
    }
}

fn merge_kernel_fields(io: &mut [PackedRgb], bias: PackedRgb) {
    let (b0, rest) = io.split_at_mut(BURST_SIZE);
    let (b1, b2) = rest.split_at_mut(BURST_SIZE);

    for ((p0, p1), p2) in b0.iter_mut().zip(b1.iter_mut()).zip(b2.iter_mut()) {
        let (a, b, c) = (
            p0.wrapping_add(bias),
            p1.wrapping_add(bias),
            p2.wrapping_add(bias),
        );
        *p0 = packed::average(a, b).wrapping_sub(bias);
        *p1 = packed::average(b, c).wrapping_sub(bias);
        *p2 = packed::average(c, a).wrapping_sub(bias);
    }
}
