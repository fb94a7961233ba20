//! Owned, fixed size NTSC filters for a single console screen. A filter holds
//! the compiled table along with the input and output frames, and tracks the
//! field flag between frames.
//!
//! ```no_run
//! use ntsc_filter::{NesFilter, Preset};
//!
//! let mut filter = NesFilter::new(Preset::Rgb).unwrap();
//! filter.set_flicker(true);
//! filter.input_mut().fill(0x21);
//! filter.process();
//! let rgb = filter.output_bytes();
//! ```

mod error;

pub use error::Error;
pub use ntsc::{Nes, Preset, Profile, Setup, Sms, Snes, Variant};

use ntsc::{Field, Ntsc};

/// Number of scanlines in a frame.
pub const HEIGHT: usize = 240;
/// Number of pixels in an input scanline.
pub const WIDTH_INPUT: usize = 256;

pub type NesFilter = Filter<Nes>;
pub type SnesFilter = Filter<Snes>;
pub type SmsFilter = Filter<Sms>;

pub struct Filter<V: Variant> {
    ntsc: Ntsc<V>,
    setup: Setup,
    flicker: bool,
    field: V::Field,
    input: Vec<V::Pixel>,
    output: Vec<u32>,
}

impl<V: Variant> Filter<V> {
    /// Number of pixels in an output scanline.
    pub const WIDTH_OUTPUT: usize = Ntsc::<V>::out_width(WIDTH_INPUT);
    /// Number of bytes in an output scanline.
    pub const PITCH: usize = Self::WIDTH_OUTPUT * std::mem::size_of::<u32>();

    pub fn new(profile: impl Into<Profile>) -> Result<Self, Error> {
        let setup = profile.into().resolve::<V>();
        let ntsc = Ntsc::new(&setup)?;

        let input = ntsc::try_filled(HEIGHT * WIDTH_INPUT, V::Pixel::default())?;
        let output = ntsc::try_filled(HEIGHT * Self::WIDTH_OUTPUT, 0)?;

        tracing::debug!(variant = V::NAME, "created ntsc filter");

        Ok(Filter {
            ntsc,
            setup,
            flicker: V::FLICKER,
            field: V::Field::default(),
            input,
            output,
        })
    }

    /// Recompiles the table for `profile`. The current table is kept if
    /// compiling fails.
    pub fn configure(&mut self, profile: impl Into<Profile>) -> Result<(), Error> {
        let setup = profile.into().resolve::<V>();
        self.ntsc = Ntsc::new(&setup)?;
        tracing::debug!(variant = V::NAME, ?setup, "configured ntsc filter");
        self.setup = setup;

        Ok(())
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    pub fn ntsc(&self) -> &Ntsc<V> {
        &self.ntsc
    }

    /// Alternates the field every processed frame when enabled. Starts out as
    /// [`Variant::FLICKER`].
    pub fn set_flicker(&mut self, flicker: bool) {
        self.flicker = flicker;
    }

    pub fn flicker(&self) -> bool {
        self.flicker
    }

    /// Field used by the most recent frame.
    pub fn field(&self) -> V::Field {
        self.field
    }

    pub fn input(&self) -> &[V::Pixel] {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut [V::Pixel] {
        &mut self.input
    }

    /// Copies a full `HEIGHT * WIDTH_INPUT` frame into the input buffer.
    pub fn load(&mut self, frame: &[V::Pixel]) -> Result<(), Error> {
        if frame.len() != self.input.len() {
            return Err(Error::FrameSize {
                expected: self.input.len(),
                actual: frame.len(),
            });
        }

        self.input.copy_from_slice(frame);
        Ok(())
    }

    /// `0x00RRGGBB` pixels, `WIDTH_OUTPUT` per row.
    pub fn output(&self) -> &[u32] {
        &self.output
    }

    pub fn output_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.output)
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        self.ntsc.palette()
    }

    /// Filters the input frame, advancing the field first if flicker is
    /// enabled.
    #[tracing::instrument(skip_all)]
    pub fn process(&mut self) {
        if self.flicker {
            self.field = self.field.next();
        }
        self.blit();
    }

    /// Filters the input frame on an explicit field.
    pub fn process_field(&mut self, field: V::Field) {
        self.field = field;
        self.blit();
    }

    fn blit(&mut self) {
        self.ntsc.blit(
            WIDTH_INPUT,
            &self.input,
            self.field,
            &mut self.output,
            Self::PITCH,
        );
    }
}

impl<V: Variant> std::fmt::Debug for Filter<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("ntsc", &self.ntsc)
            .field("setup", &self.setup)
            .field("flicker", &self.flicker)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
