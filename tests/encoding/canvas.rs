use simple_png_encoder::{
    ColorMode, DynamicCanvas, Encoder, EncoderOptions, Error, FixedCanvas, Rect,
};

use crate::support::{decode, diagonal_5x5, noise};

#[test]
fn full_extent_push_matches_direct_encode() -> anyhow::Result<()> {
    for (mode, depth, bpp) in [
        (ColorMode::Rgb, 8, 3),
        (ColorMode::Rgba, 8, 4),
        (ColorMode::Gray, 8, 1),
        (ColorMode::Gray, 16, 2),
        (ColorMode::BlackWhite, 1, 1),
    ] {
        let pixels = noise(40 * 30 * bpp, 31);
        let mut canvas = FixedCanvas::with_depth(40, 30, mode, depth)?;
        canvas.push(&pixels, 0, 0, 40, 30)?;
        let direct = Encoder::new(&pixels, 40, 30, mode, depth).encode_blocking()?;
        assert_eq!(canvas.encode_blocking()?, direct, "{mode:?}/{depth}");
    }
    Ok(())
}

#[test]
fn diagonal_pushed_pixel_by_pixel() -> anyhow::Result<()> {
    let mut canvas = FixedCanvas::new(5, 5, ColorMode::Rgba)?;
    for i in 0..5 {
        canvas.push(&[0xff, 0, 0, 0xff], i, i, 1, 1)?;
    }
    let png = canvas.encode_blocking()?;
    assert_eq!(png, Encoder::rgba(&diagonal_5x5(), 5, 5).encode_blocking()?);
    let (_, decoded) = decode(&png)?;
    assert_eq!(decoded, diagonal_5x5());
    Ok(())
}

#[test]
fn overflowing_push_is_rejected_and_leaves_canvas_alone() -> anyhow::Result<()> {
    let mut canvas = FixedCanvas::new(10, 10, ColorMode::Rgb)?;
    canvas.push(&[9; 3 * 4], 2, 2, 2, 2)?;
    let before = canvas.as_bytes().to_vec();
    let encoded_before = canvas.encode_blocking()?;

    let err = canvas.push(&[1; 3 * 3 * 2], 8, 0, 3, 2).unwrap_err();
    assert!(matches!(
        err,
        Error::BoundsError {
            x: 8,
            w: 3,
            width: 10,
            ..
        }
    ));
    assert!(matches!(
        canvas.push(&[1; 3 * 2 * 3], 0, 8, 2, 3),
        Err(Error::BoundsError { .. })
    ));
    assert_eq!(canvas.as_bytes(), &before[..]);
    assert_eq!(canvas.encode_blocking()?, encoded_before);
    Ok(())
}

#[test]
fn uncovered_regions_decode_as_zero() -> anyhow::Result<()> {
    let mut canvas = FixedCanvas::new(4, 2, ColorMode::Rgba)?;
    canvas.push(&[10, 20, 30, 40, 50, 60, 70, 80], 2, 1, 2, 1)?;
    let (_, decoded) = decode(&canvas.encode_blocking()?)?;
    let mut expected = vec![0; 4 * 2 * 4];
    expected[24..].copy_from_slice(&[10, 20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(decoded, expected);
    Ok(())
}

#[test]
fn tiles_compose_into_one_image() -> anyhow::Result<()> {
    let (width, height) = (720u32, 400u32);
    let mut canvas = FixedCanvas::new(width, height, ColorMode::Rgba)?
        .with_options(EncoderOptions::default().max_idat_size(16 * 1024));
    let mut expected = vec![0u8; (width * height * 4) as usize];
    for (i, (x, y, w, h)) in [(0, 0, 720, 200), (0, 200, 360, 200), (300, 150, 120, 100)]
        .into_iter()
        .enumerate()
    {
        let tile = noise((w * h * 4) as usize, i as u32);
        canvas.push(&tile, x, y, w, h)?;
        for (row, line) in tile.chunks((w * 4) as usize).enumerate() {
            let start = ((y as usize + row) * width as usize + x as usize) * 4;
            expected[start..start + line.len()].copy_from_slice(line);
        }
    }
    assert_eq!(canvas.as_bytes(), &expected[..]);

    let mut streamed = vec![];
    let mut finished = false;
    canvas.encode_streaming(
        |bytes| streamed.extend_from_slice(bytes),
        || finished = true,
        |e| panic!("canvas encode failed: {e}"),
    );
    assert!(finished);
    let (_, decoded) = decode(&streamed)?;
    assert_eq!(decoded, expected);
    Ok(())
}

#[test]
fn dynamic_canvas_encodes_its_bounding_box() -> anyhow::Result<()> {
    let mut canvas = DynamicCanvas::new(ColorMode::Rgb)?;
    canvas.push(&[255; 3 * 4], -3, 10, 2, 2)?;
    canvas.push(&[128; 3 * 6], 1, 12, 3, 2)?;
    assert_eq!(
        canvas.dimensions(),
        Some(Rect {
            x: -3,
            y: 10,
            w: 7,
            h: 4
        })
    );

    let (info, decoded) = decode(&canvas.encode_blocking()?)?;
    assert_eq!((info.width, info.height), (7, 4));
    let row = |y: usize| &decoded[y * 7 * 3..(y + 1) * 7 * 3];
    assert_eq!(row(0), [&[255u8; 6][..], &[0; 15]].concat());
    assert_eq!(row(1), [&[255u8; 6][..], &[0; 15]].concat());
    assert_eq!(row(2), [&[0u8; 12][..], &[128; 9]].concat());
    assert_eq!(row(3), [&[0u8; 12][..], &[128; 9]].concat());
    Ok(())
}

#[test]
fn dynamic_canvas_streams_errors_when_empty() {
    let canvas = DynamicCanvas::new(ColorMode::Gray).expect("gray is supported");
    let mut error = None;
    canvas.encode_streaming(
        |_| panic!("no output expected"),
        || panic!("empty stack cannot finish"),
        |e| error = Some(e),
    );
    assert!(matches!(error, Some(Error::InvalidDimensions { .. })));
}
