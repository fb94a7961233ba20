use std::ops::Range;

use crate::kernel::{BURST_SIZE, Ntsc};
use crate::packed::{self, PackedRgb};
use crate::variant::{Field, Variant};
use crate::{IN_CHUNK, KERNEL_WIDTH, OUT_CHUNK};

/// Sliding window over the table entries of the last six pixels of a row.
struct Row<'a, V: Variant> {
    ntsc: &'a Ntsc<V>,
    burst_offset: usize,
    kernel: [&'a [PackedRgb]; 3],
    kernelx: [&'a [PackedRgb]; 3],
    shift: u32,
}

impl<'a, V: Variant> Row<'a, V> {
    fn new(ntsc: &'a Ntsc<V>, burst: usize, pixels: [usize; 3]) -> Self {
        let black = ntsc.entry(V::BLACK);
        Row {
            ntsc,
            burst_offset: burst % V::BURST_COUNT * BURST_SIZE,
            kernel: pixels.map(|entry| ntsc.entry(entry)),
            kernelx: [black; 3],
            shift: 8 - V::RGB_BITS,
        }
    }

    fn color_in(&mut self, index: usize, entry: usize) {
        self.kernelx[index] = self.kernel[index];
        self.kernel[index] = self.ntsc.entry(entry);
    }

    fn rgb_out(&self, index: usize) -> u32 {
        let k = |kernel: &[PackedRgb], x: usize| kernel[x + self.burst_offset];
        let raw = k(self.kernel[0], index)
            .wrapping_add(k(self.kernel[1], (index + 12) % 7 + 14))
            .wrapping_add(k(self.kernel[2], (index + 10) % 7 + 28))
            .wrapping_add(k(self.kernelx[0], (index + 7) % 14))
            .wrapping_add(k(self.kernelx[1], (index + 5) % 7 + 21))
            .wrapping_add(k(self.kernelx[2], (index + 3) % 7 + 35));

        packed::to_rgb32(packed::clamp(raw, self.shift), self.shift)
    }

    /// Feeds three pixels and writes seven outputs.
    fn chunk(&mut self, entries: [usize; 3], out: &mut [u32]) {
        self.color_in(0, entries[0]);
        out[0] = self.rgb_out(0);
        out[1] = self.rgb_out(1);

        self.color_in(1, entries[1]);
        out[2] = self.rgb_out(2);
        out[3] = self.rgb_out(3);

        self.color_in(2, entries[2]);
        out[4] = self.rgb_out(4);
        out[5] = self.rgb_out(5);
        out[6] = self.rgb_out(6);
    }
}

impl<V: Variant> Ntsc<V> {
    /// Filters a single row of pixels starting on burst phase `burst`. At most
    /// `out_width(input.len())` pixels are written, fewer if `output` is
    /// shorter.
    pub fn blit_row(&self, burst: usize, input: &[V::Pixel], output: &mut [u32]) {
        let lead = V::LEAD.count(input.len());
        let black = V::BLACK;
        let pixel = |n: usize| V::entry(input[n]);

        let mut row = Row::new(
            self,
            burst,
            [
                black,
                if lead == 2 { pixel(0) } else { black },
                if lead >= 1 { pixel(lead - 1) } else { black },
            ],
        );

        let mut output = output.chunks_exact_mut(OUT_CHUNK);
        for (chunk, out) in input[lead..].chunks_exact(IN_CHUNK).zip(&mut output) {
            let entries = [chunk[0], chunk[1], chunk[2]].map(V::entry);
            row.chunk(entries, out);
        }

        if let Some(out) = output.next() {
            row.chunk([black; 3], out);
        }
    }

    /// Filters one or more rows of pixels. `in_width` is the number of pixels
    /// to get to the next input row, `out_pitch` the number of *bytes* to get
    /// to the next output row. Row `r` starts on burst phase
    /// `(field.seed() + r) % BURST_COUNT`.
    pub fn blit(
        &self,
        in_width: usize,
        input: &[V::Pixel],
        field: V::Field,
        output: &mut [u32],
        out_pitch: usize,
    ) {
        let pitch = out_pitch / std::mem::size_of::<u32>();
        if in_width == 0 || pitch == 0 {
            return;
        }

        let out_width = Self::out_width(in_width).min(pitch);
        let seed = field.seed();
        let row = |(r, (out, input)): (usize, (&mut [u32], &[V::Pixel]))| {
            let width = out_width.min(out.len());
            self.blit_row(seed + r, input, &mut out[..width]);
        };

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            output
                .par_chunks_mut(pitch)
                .zip(input.par_chunks_exact(in_width))
                .enumerate()
                .for_each(row);
        }

        #[cfg(not(feature = "rayon"))]
        output
            .chunks_mut(pitch)
            .zip(input.chunks_exact(in_width))
            .enumerate()
            .for_each(row);
    }

    /// Range of output pixels that input `column` of a row `in_width` pixels
    /// wide contributes to. Empty for pixels the blitter drops.
    pub fn output_span(in_width: usize, column: usize) -> Range<usize> {
        let lead = V::LEAD.count(in_width);
        let drawn = lead + (in_width - lead) / IN_CHUNK * IN_CHUNK;
        if column >= drawn {
            return 0..0;
        }

        let q = column + IN_CHUNK - lead;
        let start = (OUT_CHUNK * (q / IN_CHUNK) + 2 * (q % IN_CHUNK)) as isize - OUT_CHUNK as isize;
        let end = (start + KERNEL_WIDTH as isize).min(Self::out_width(in_width) as isize);

        start.max(0) as usize..end as usize
    }
}
