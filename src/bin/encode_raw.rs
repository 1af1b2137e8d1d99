use anyhow::{anyhow, bail, Context};
use simple_png_encoder::{ColorMode, Encoder, EncoderOptions};

const USAGE: &str =
    "usage: encode-raw [-v] <input.raw> <width> <height> [rgb|rgba|gray|bw] [depth] [output.png]";

fn main() -> anyhow::Result<()> {
    let mut args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().map(String::as_str) == Some("-v") {
        args.remove(0);
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    let [input, width, height, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };
    let width: u32 = width.parse().context("width must be an integer")?;
    let height: u32 = height.parse().context("height must be an integer")?;
    let mode = match rest.first() {
        Some(mode) => parse_mode(mode)?,
        None => ColorMode::default(),
    };
    let depth = match rest.get(1) {
        Some(depth) => depth.parse().context("depth must be an integer")?,
        None => mode.default_depth(),
    };
    let output = rest.get(2).map_or("output.png", String::as_str);

    let pixels = std::fs::read(input).with_context(|| format!("Failed to read {input}"))?;
    let png = Encoder::new(&pixels, width, height, mode, depth)
        .with_options(EncoderOptions::default())
        .encode_blocking()
        .with_context(|| format!("Failed to encode {input}"))?;
    std::fs::write(output, &png).with_context(|| format!("Failed to write {output}"))?;
    log::info!("wrote {} bytes to {output}", png.len());
    Ok(())
}

fn parse_mode(name: &str) -> anyhow::Result<ColorMode> {
    match name {
        "rgb" => Ok(ColorMode::Rgb),
        "rgba" => Ok(ColorMode::Rgba),
        "gray" => Ok(ColorMode::Gray),
        "bw" => Ok(ColorMode::BlackWhite),
        other => Err(anyhow!("unknown color mode {other:?}\n{USAGE}")),
    }
}
