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

//! NTSC composite video filters for palette based consoles. Pixel artifacts,
//! color bleed and dot crawl are produced by encoding every palette entry into
//! a composite signal once, ahead of time, and then summing precomputed
//! contributions while walking each scanline.
//!
//! Three consoles are provided as [`Variant`]s: [`Nes`], [`Snes`] and [`Sms`].
//!
//! ```no_run
//! use ntsc::{Nes, Ntsc, Preset};
//!
//! let ntsc = Ntsc::<Nes>::new(&Preset::Composite.setup::<Nes>()).unwrap();
//! let input = vec![0x0fu8; 256 * 240];
//! let width = Ntsc::<Nes>::out_width(256);
//! let mut output = vec![0u32; width * 240];
//! ntsc.blit(256, &input, false, &mut output, width * 4);
//! ```

mod blit;
mod error;
mod kernel;
mod nes;
mod packed;
mod setup;
mod sms;
mod snes;
mod variant;

pub use error::{Error, try_filled};
pub use kernel::Ntsc;
pub use nes::{Nes, NesColors};
pub use packed::PackedRgb;
pub use setup::{Preset, Profile, Setup, decoder_from_matrix};
pub use sms::{Sms, SmsColors};
pub use snes::{Snes, SnesColors};
pub use variant::{Colors, Field, Lead, Levels, Variant, Yiq};

/// Number of input pixels read per chunk.
pub const IN_CHUNK: usize = 3;
/// Number of output pixels generated per chunk.
pub const OUT_CHUNK: usize = 7;
/// Number of output pixels a single input pixel contributes to.
pub const KERNEL_WIDTH: usize = 14;
