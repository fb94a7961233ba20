
use helper::rgb32;
use ntsc::{Nes, Ntsc, Preset, Setup, Sms, Snes, Variant};

fn widths<V: Variant>() {
    for width in 1..600 {
        assert!(Ntsc::<V>::out_width(width) > width, "{} {width}", V::NAME);
    }
    assert_eq!(Ntsc::<V>::out_width(256), 602);
}

#[test]
fn output_is_wider_than_input() {
    widths::<Nes>();
    widths::<Snes>();
    widths::<Sms>();
}

fn uniform_rows<V: Variant>(pixels: &[V::Pixel]) {
    for preset in Preset::ALL {
        let setup = preset.setup::<V>();
        let ntsc = Ntsc::<V>::new(&setup).unwrap();

        for &pixel in pixels {
            let frame = helper::frame::<V>(setup.clone())
                .fill(pixel)
                .size(256, 3)
                .run_with(&ntsc);
            let expected = rgb32(ntsc.palette()[V::entry(pixel)]);

            for y in 0..3 {
                let row = frame.row(y);
                for (x, &p) in row.iter().enumerate().take(row.len() - 14).skip(14) {
                    assert_eq!(p, expected, "{} {preset} row {y} column {x}", V::NAME);
                }
            }
        }
    }
}

#[test]
fn uniform_rows_match_palette() {
    uniform_rows::<Nes>(&[0x00, 0x0f, 0x16, 0x21, 0x30, 0x3d, 0x5a, 0xff]);
    uniform_rows::<Snes>(&[0x0000, 0xffff, 0xf800, 0x07e0, 0x001f, 0x8410]);
    uniform_rows::<Sms>(&[0x000, 0xfff, 0x00f, 0x0f0, 0xf00, 0x555]);
}

const NES_ZERO_HEAD: [u32; 14] = [
    0x020202, 0x000000, 0x080808, 0x414141, 0x5a5a5a, 0x585858, 0x585858, 0x585858, 0x585858,
    0x585858, 0x585858, 0x585858, 0x585858, 0x585858,
];
const NES_ZERO_TAIL: [u32; 14] = [
    0x585858, 0x585858, 0x585858, 0x585858, 0x585858, 0x585858, 0x585858, 0x575757, 0x585858,
    0x595959, 0x575757, 0x5d5d5d, 0x2c2c2c, 0x000000,
];

fn zero_row<V: Variant>(head: &[u32; 14], interior: u32, tail: &[u32; 14]) {
    let ntsc = Ntsc::<V>::new(&Preset::Rgb.setup::<V>()).unwrap();
    let input = [V::Pixel::default(); 256];

    for burst in 0..V::BURST_COUNT {
        let mut row = vec![0xdead_beef; 602];
        ntsc.blit_row(burst, &input, &mut row);

        assert_eq!(&row[..14], head, "{} burst {burst}", V::NAME);
        assert_eq!(&row[602 - 14..], tail, "{} burst {burst}", V::NAME);
        for (x, &p) in row.iter().enumerate().take(602 - 14).skip(14) {
            assert_eq!(p, interior, "{} burst {burst} column {x}", V::NAME);
        }
    }
}

#[test]
fn zero_row_fixture() {
    zero_row::<Nes>(&NES_ZERO_HEAD, 0x585858, &NES_ZERO_TAIL);
    // index zero is black on both
    zero_row::<Snes>(&[0; 14], 0, &[0; 14]);
    zero_row::<Sms>(&[0; 14], 0, &[0; 14]);
}

#[test]
fn burst_phase_repeats_every_three_rows() {
    let setup = Setup {
        merge_fields: false,
        ..Setup::COMPOSITE
    };
    let frame = helper::frame::<Nes>(setup)
        .columns(&[0x16, 0x2a, 0x30, 0x0f, 0x12])
        .run();

    assert_eq!(frame.row(0), frame.row(3));
    assert_eq!(frame.row(1), frame.row(4));
    assert_ne!(frame.row(0), frame.row(1));
    assert_ne!(frame.row(1), frame.row(2));
}

#[test]
fn field_shifts_burst_phase() {
    let (even, odd) = helper::frame::<Snes>(Setup {
        merge_fields: false,
        ..Setup::COMPOSITE
    })
    .columns(&[0xf800, 0x07e0, 0x001f, 0xffff])
    .field(false)
    .run_fields();

    assert_ne!(even, odd);
    for y in 0..5 {
        assert_eq!(odd.row(y), even.row(y + 1));
    }
}

#[test]
fn sms_has_no_dot_crawl() {
    let frame = helper::frame::<Sms>(Preset::Composite.setup::<Sms>())
        .columns(&[0x00f, 0x0f0, 0xf00, 0xfff])
        .run();

    for y in 1..6 {
        assert_eq!(frame.row(0), frame.row(y));
    }
}

#[test]
fn monochrome_is_gray() {
    let frame = helper::frame::<Nes>(Preset::Monochrome.setup::<Nes>())
        .columns(&[0x16, 0x2a, 0x12, 0x30, 0x0f, 0x27, 0x1c])
        .run();
    for y in 0..6 {
        for x in 0..frame.width {
            let [r, g, b] = frame.rgb(x, y);
            assert!(r == g && g == b, "({x}, {y})");
        }
    }

    let frame = helper::frame::<Snes>(Preset::Monochrome.setup::<Snes>())
        .columns(&[0xf800, 0x07e0, 0x001f])
        .run();
    assert!(frame.pixels.iter().all(|&p| is_gray(p)));

    for width in [64, 65, 66] {
        let frame = helper::frame::<Sms>(Preset::Monochrome.setup::<Sms>())
            .size(width, 2)
            .columns(&[0x00f, 0x0f0, 0xf00, 0x555, 0xfff])
            .run();
        assert!(frame.pixels.iter().all(|&p| is_gray(p)), "width {width}");
    }
}

fn is_gray(p: u32) -> bool {
    let [_, r, g, b] = p.to_be_bytes();
    r == g && g == b
}

#[test]
fn changes_stay_within_output_span() {
    let builder = || {
        helper::frame::<Snes>(Setup::default())
            .size(64, 3)
            .columns(&[0x8410, 0x4208])
    };
    let before = builder().run();

    for column in [0, 1, 2, 30, 62, 63] {
        let after = builder().pixel(column, 1, 0xf81f).run();
        let span = Ntsc::<Snes>::output_span(64, column);

        assert_eq!(before.row(0), after.row(0));
        assert_eq!(before.row(2), after.row(2));
        for (x, (a, b)) in before.row(1).iter().zip(after.row(1)).enumerate() {
            if !span.contains(&x) {
                assert_eq!(a, b, "column {column} reached {x}");
            }
        }
        assert_ne!(before.row(1)[span.clone()], after.row(1)[span]);
    }
}

#[test]
fn sms_leading_pixels_stay_within_output_span() {
    for width in [63, 64, 65] {
        let builder = || {
            helper::frame::<Sms>(Setup::default())
                .size(width, 3)
                .columns(&[0x555, 0x0a0])
        };
        let before = builder().run();

        for column in [0, 1, 2, 3, width / 2, width - 2, width - 1] {
            let after = builder().pixel(column, 1, 0xf0f).run();
            let span = Ntsc::<Sms>::output_span(width, column);

            assert_eq!(before.row(0), after.row(0));
            assert_eq!(before.row(2), after.row(2));
            for (x, (a, b)) in before.row(1).iter().zip(after.row(1)).enumerate() {
                if !span.contains(&x) {
                    assert_eq!(a, b, "width {width} column {column} reached {x}");
                }
            }
            assert_ne!(before.row(1)[span.clone()], after.row(1)[span]);
        }
    }
}

#[test]
fn blitting_twice_is_identical() {
    let builder = || {
        helper::frame::<Nes>(Setup::default())
            .columns(&[0x01, 0x11, 0x21, 0x31, 0x0d])
            .field(true)
    };
    assert_eq!(builder().run(), builder().run());
}

#[test]
fn pitch_leaves_padding_untouched() {
    let ntsc = Ntsc::<Nes>::new(&Setup::default()).unwrap();
    let out_width = Ntsc::<Nes>::out_width(256);
    let pitch = out_width + 10;
    let mut output = vec![0x00ab_cdef; pitch * 2];

    ntsc.blit(256, &[0x30; 512], false, &mut output, pitch * 4);

    for row in output.chunks(pitch) {
        assert!(row[out_width..].iter().all(|&p| p == 0x00ab_cdef));
        assert!(row[..out_width].iter().all(|&p| p != 0x00ab_cdef));
    }
}
