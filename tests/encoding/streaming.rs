use simple_png_encoder::{ColorMode, Encoder, EncoderOptions, Error, SessionState};

use crate::support::{decode, diagonal_5x5, noise};

struct Collected {
    blocks: Vec<Vec<u8>>,
    done: usize,
    error: Option<Error>,
}

fn collect_streamed(encoder: &Encoder<'_>) -> Collected {
    let mut blocks = vec![];
    let mut done = 0;
    let mut error = None;
    encoder.encode_streaming(
        |bytes| blocks.push(bytes.to_vec()),
        || done += 1,
        |e| error = Some(e),
    );
    Collected {
        blocks,
        done,
        error,
    }
}

#[test]
fn streaming_matches_blocking_for_every_mode() -> anyhow::Result<()> {
    for (mode, depth, bpp) in [
        (ColorMode::Rgb, 8, 3),
        (ColorMode::Rgba, 8, 4),
        (ColorMode::Gray, 8, 1),
        (ColorMode::Gray, 16, 2),
        (ColorMode::BlackWhite, 1, 1),
    ] {
        let pixels = noise(90 * 70 * bpp, 17);
        let encoder = Encoder::new(&pixels, 90, 70, mode, depth)
            .with_options(EncoderOptions::default().max_idat_size(512));
        let streamed = collect_streamed(&encoder);
        assert_eq!(streamed.done, 1);
        assert!(streamed.error.is_none());
        assert_eq!(streamed.blocks.concat(), encoder.encode_blocking()?, "{mode:?}/{depth}");
    }
    Ok(())
}

#[test]
fn blocks_arrive_one_chunk_at_a_time() -> anyhow::Result<()> {
    let pixels = noise(64 * 64 * 4, 23);
    let encoder = Encoder::rgba(&pixels, 64, 64)
        .with_options(EncoderOptions::default().max_idat_size(1024));
    let streamed = collect_streamed(&encoder);
    let blocks = &streamed.blocks;
    assert!(blocks.len() > 3);
    // Signature and IHDR arrive together, then one IDAT per block, then IEND.
    assert_eq!(blocks[0].len(), 8 + 25);
    for block in &blocks[1..blocks.len() - 1] {
        assert_eq!(&block[4..8], b"IDAT");
        assert!(block.len() <= 1024 + 12);
    }
    assert_eq!(blocks[blocks.len() - 1].len(), 12);
    let (_, decoded) = decode(&blocks.concat())?;
    assert_eq!(decoded, pixels);
    Ok(())
}

#[test]
fn short_buffer_is_rejected_before_any_output() {
    let pixels = diagonal_5x5();
    let short = &pixels[..96];
    let encoder = Encoder::rgba(short, 5, 5);
    assert!(matches!(
        encoder.encode_blocking(),
        Err(Error::BufferSizeMismatch {
            expected: 100,
            actual: 96
        })
    ));

    let streamed = collect_streamed(&encoder);
    assert!(streamed.blocks.is_empty());
    assert_eq!(streamed.done, 0);
    assert!(matches!(
        streamed.error,
        Some(Error::BufferSizeMismatch { .. })
    ));
}

#[test]
fn unsupported_mode_is_reported() {
    let pixels = [0u8; 12];
    let err = Encoder::new(&pixels, 2, 2, ColorMode::Rgb, 16)
        .encode_blocking()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedMode {
            mode: ColorMode::Rgb,
            depth: 16
        }
    ));
}

#[test]
fn consumer_can_stop_early() {
    let pixels = noise(128 * 128 * 4, 29);
    let encoder = Encoder::rgba(&pixels, 128, 128)
        .with_options(EncoderOptions::default().max_idat_size(256));
    let mut session = encoder.stream();
    let first_two: usize = session
        .by_ref()
        .take(2)
        .map(|block| block.map(|b| b.len()))
        .sum::<Result<usize, _>>()
        .expect("first blocks");
    assert_eq!(session.bytes_emitted(), first_two);
    assert_eq!(session.state(), SessionState::Compressing);
    drop(session);

    // A fresh session over the same buffer is unaffected.
    let full: Vec<u8> = encoder
        .stream()
        .collect::<Result<Vec<_>, _>>()
        .expect("full encode")
        .concat();
    assert_eq!(full, encoder.encode_blocking().expect("blocking encode"));
}

#[test]
fn independent_encodes_run_concurrently() {
    let images: Vec<Vec<u8>> = (0..4).map(|seed| noise(100 * 100 * 3, seed)).collect();
    let expected: Vec<Vec<u8>> = images
        .iter()
        .map(|pixels| {
            Encoder::new(pixels, 100, 100, ColorMode::Rgb, 8)
                .encode_blocking()
                .expect("encode")
        })
        .collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = images
            .iter()
            .map(|pixels| {
                scope.spawn(move || {
                    Encoder::new(pixels, 100, 100, ColorMode::Rgb, 8)
                        .encode_blocking()
                        .expect("encode")
                })
            })
            .collect();
        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().expect("encoder thread"), expected);
        }
    });
}
