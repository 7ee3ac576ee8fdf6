//! Image output for finished aggregates: a grayscale PNG of the final grid
//! and an animated GIF replaying the commit log.

use crate::error::Error;
use crate::grid::Grid;
use crate::settings::RenderSettings;
use crate::simulation::Attachment;
use image::{GrayImage, Luma};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Map occupied cells to the foreground level and empty cells to the
/// background level. Pixel `(x, y)` is cell `(x, y)`.
pub fn to_image(grid: &Grid, settings: &RenderSettings) -> GrayImage {
    let size = grid.size() as u32;
    let mut img = GrayImage::from_pixel(size, size, Luma([settings.background]));
    for pos in grid.occupied_positions() {
        img.put_pixel(pos.x as u32, pos.y as u32, Luma([settings.foreground]));
    }
    img
}

/// Write the grid as an 8-bit grayscale PNG
pub fn save_png(grid: &Grid, path: &Path, settings: &RenderSettings) -> Result<(), Error> {
    to_image(grid, settings).save(path)?;
    debug!(path = %path.display(), "Wrote PNG");
    Ok(())
}

/// Write an animated GIF of the aggregate growing from its seed to `path`.
///
/// The first frame shows the seed alone, then one frame is emitted every
/// `frame_stride` attachments, and the last frame is the finished grid.
pub fn save_growth_gif(
    size: usize,
    attachments: &[Attachment],
    path: &Path,
    settings: &RenderSettings,
) -> Result<(), Error> {
    let side = gif_side(size)?;
    let file = BufWriter::new(File::create(path)?);
    let frames = write_growth_gif(file, side, attachments, settings)?;
    debug!(path = %path.display(), frames, "Wrote growth GIF");
    Ok(())
}

fn gif_side(size: usize) -> Result<u16, Error> {
    let side = u16::try_from(size)
        .map_err(|_| Error::InvalidSettings(format!("grid size {size} too large for GIF")))?;
    if side == 0 {
        return Err(Error::InvalidSize { size });
    }
    Ok(side)
}

/// Encode the growth animation into `writer`, finishing with the trailer and
/// a flush. Returns the number of frames written.
fn write_growth_gif<W: Write>(
    writer: W,
    side: u16,
    attachments: &[Attachment],
    settings: &RenderSettings,
) -> Result<usize, Error> {
    let size = side as usize;

    // palette index 0 = background, 1 = foreground
    let (bg, fg) = (settings.background, settings.foreground);
    let palette = [bg, bg, bg, fg, fg, fg];

    let mut encoder = gif::Encoder::new(writer, side, side, &palette)?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    let mut indices = vec![0u8; size * size];
    let center = size / 2;
    indices[center * size + center] = 1;

    let stride = settings.frame_stride.max(1);
    let mut frames = 0usize;

    write_frame(&mut encoder, side, settings.frame_delay, &indices)?;
    frames += 1;
    for (i, attachment) in attachments.iter().enumerate() {
        let (x, y) = (attachment.position.x, attachment.position.y);
        if x >= 0 && y >= 0 && (x as usize) < size && (y as usize) < size {
            indices[y as usize * size + x as usize] = 1;
        }
        let last = i + 1 == attachments.len();
        if (i + 1) % stride == 0 || last {
            write_frame(&mut encoder, side, settings.frame_delay, &indices)?;
            frames += 1;
        }
    }

    // into_inner writes the trailer and reports its errors, unlike Drop
    let mut writer = encoder.into_inner()?;
    writer.flush()?;
    Ok(frames)
}

fn write_frame<W: Write>(
    encoder: &mut gif::Encoder<W>,
    side: u16,
    delay: u16,
    indices: &[u8],
) -> Result<(), Error> {
    let frame = gif::Frame {
        width: side,
        height: side,
        delay,
        buffer: Cow::Borrowed(indices),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame)?;
    Ok(())
}
