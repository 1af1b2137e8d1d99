use anyhow::Context;
use simple_png_encoder::{ColorMode, DynamicCanvas, Encoder, FixedCanvas};
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

struct Sample {
    name: &'static str,
    width: u32,
    height: u32,
    mode: ColorMode,
    depth: u8,
    pixels: Vec<u8>,
}

fn diagonal() -> Sample {
    let (x, o) = ([0xff, 0, 0, 0xff], [0, 0, 0, 0]);
    let pixels = (0..5)
        .flat_map(|row| (0..5).map(move |col| if row == col { x } else { o }))
        .flatten()
        .collect();
    Sample {
        name: "diagonal-5x5",
        width: 5,
        height: 5,
        mode: ColorMode::Rgba,
        depth: 8,
        pixels,
    }
}

fn rgb_gradient() -> Sample {
    let (width, height) = (400, 300);
    let pixels = (0..height)
        .flat_map(|i| {
            (0..width).flat_map(move |j| {
                [(255 * j / width) as u8, (255 * i / height) as u8, 0x7f]
            })
        })
        .collect();
    Sample {
        name: "gradient-rgb",
        width,
        height,
        mode: ColorMode::Rgb,
        depth: 8,
        pixels,
    }
}

fn rgba_gradient() -> Sample {
    let (width, height) = (400, 300);
    let pixels = (0..height)
        .flat_map(|i| {
            (0..width).flat_map(move |j| {
                [
                    (255 * j / width) as u8,
                    0x40,
                    (255 * i / height) as u8,
                    (255 * (width - j) / width) as u8,
                ]
            })
        })
        .collect();
    Sample {
        name: "gradient-rgba",
        width,
        height,
        mode: ColorMode::Rgba,
        depth: 8,
        pixels,
    }
}

fn grey_gradient_16() -> Sample {
    let (width, height) = (300u32, 300u32);
    let pixels = (0..height)
        .flat_map(|i| {
            let value = (65535 * i / height) as u16;
            (0..width).flat_map(move |_| value.to_be_bytes())
        })
        .collect();
    Sample {
        name: "gradient-gray-16",
        width,
        height,
        mode: ColorMode::Gray,
        depth: 16,
        pixels,
    }
}

fn checkerboard_bw() -> Sample {
    let (width, height) = (551, 779);
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x / 16 + y / 16) % 2) as u8))
        .collect();
    Sample {
        name: "checkerboard-bw",
        width,
        height,
        mode: ColorMode::BlackWhite,
        depth: 1,
        pixels,
    }
}

/// Tiles of different colors pushed onto a fixed canvas, the way a terminal
/// renderer would push updated regions.
fn composed_tiles() -> anyhow::Result<Sample> {
    let (width, height) = (720, 400);
    let mut canvas = FixedCanvas::new(width, height, ColorMode::Rgba)?;
    for (i, (x, y)) in [(0, 0), (360, 0), (0, 200), (360, 200), (180, 100)]
        .into_iter()
        .enumerate()
    {
        let shade = 50 * i as u8;
        let tile = [shade, 255 - shade, 128, 255].repeat(360 * 200);
        canvas.push(&tile, x, y, 360, 200)?;
    }
    Ok(Sample {
        name: "composed-tiles",
        width,
        height,
        mode: ColorMode::Rgba,
        depth: 8,
        pixels: canvas.as_bytes().to_vec(),
    })
}

/// Overlapping tiles pushed at arbitrary, partly negative, offsets. The
/// output is cropped to the area they cover.
fn stacked_tiles() -> anyhow::Result<Sample> {
    let mut canvas = DynamicCanvas::new(ColorMode::Rgb)?;
    for (i, (x, y)) in [(-120, -80), (40, -20), (-60, 60), (100, 90)]
        .into_iter()
        .enumerate()
    {
        let shade = 60 * i as u8;
        let tile = [255 - shade, shade, 200].repeat(160 * 120);
        canvas.push(&tile, x, y, 160, 120)?;
    }
    let composed = canvas.compose()?;
    Ok(Sample {
        name: "stacked-tiles",
        width: composed.width(),
        height: composed.height(),
        mode: ColorMode::Rgb,
        depth: 8,
        pixels: composed.as_bytes().to_vec(),
    })
}

fn write_streamed(sample: &Sample, path: &Path) -> anyhow::Result<usize> {
    let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    let mut written = 0;
    let mut io_result = Ok(());
    let mut failure = None;
    Encoder::new(
        &sample.pixels,
        sample.width,
        sample.height,
        sample.mode,
        sample.depth,
    )
    .encode_streaming(
        |block| {
            if io_result.is_ok() {
                io_result = file.write_all(block);
                written += block.len();
            }
        },
        || log::debug!("finished streaming {}", sample.name),
        |e| failure = Some(e),
    );
    if let Some(e) = failure {
        return Err(e).context(format!("Failed to encode {}", sample.name));
    }
    io_result.context(format!("Failed to write {}", path.display()))?;
    Ok(written)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let output_dir = Path::new("samples");
    fs::create_dir_all(output_dir).context("Failed to create samples folder")?;

    let samples = [
        diagonal(),
        rgb_gradient(),
        rgba_gradient(),
        grey_gradient_16(),
        checkerboard_bw(),
        composed_tiles()?,
        stacked_tiles()?,
    ];
    let mut rendered = Vec::with_capacity(samples.len());
    for sample in &samples {
        let path = output_dir.join(format!("{}.png", sample.name));
        let bytes = write_streamed(sample, &path)?;
        log::info!("{} -> {} bytes", sample.name, bytes);
        rendered.push(serde_json::json!({
            "name": sample.name,
            "width": sample.width,
            "height": sample.height,
            "mode": format!("{:?}", sample.mode),
            "depth": sample.depth,
            "bytes": bytes,
        }));
    }
    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    let results = serde_json::json!({
        "date": now,
        "samples": rendered,
    });
    fs::write(output_dir.join("samples.json"), results.to_string())?;
    Ok(())
}
