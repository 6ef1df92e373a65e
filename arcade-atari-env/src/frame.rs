//! Conversion of raw color frames into normalized grayscale observations.
use crate::AtariEnvError;
use anyhow::Result;
use image::{imageops::grayscale, ImageBuffer, Rgb};
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// A raw frame as emitted by a simulator: `height` rows of `width` pixels
/// with `channels` interleaved 8-bit channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// The number of interleaved channels per pixel.
    pub channels: usize,

    /// Pixel data in row-major order.
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Constructs an RGB frame.
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels: 3,
            data,
        }
    }
}

/// Configuration of [`FrameProcessor`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct FrameProcessorConfig {
    /// First row kept after cropping.
    pub crop_top: usize,

    /// Row after the last row kept after cropping.
    pub crop_bottom: usize,

    /// Height of the output frame.
    pub out_height: usize,

    /// Width of the output frame.
    pub out_width: usize,
}

impl Default for FrameProcessorConfig {
    /// Removes the score band and the bottom border of a 210x160 Pong screen.
    fn default() -> Self {
        Self {
            crop_top: 34,
            crop_bottom: 194,
            out_height: 84,
            out_width: 84,
        }
    }
}

impl FrameProcessorConfig {
    /// Sets the vertical band kept after cropping.
    pub fn crop(mut self, top: usize, bottom: usize) -> Self {
        self.crop_top = top;
        self.crop_bottom = bottom;
        self
    }

    /// Sets the output resolution.
    pub fn out_size(mut self, height: usize, width: usize) -> Self {
        self.out_height = height;
        self.out_width = width;
        self
    }
}

/// Deterministic frame preprocessing.
///
/// In this order: grayscale conversion, cropping of a vertical band,
/// area-averaging resize and scaling into `[0, 1]`.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    config: FrameProcessorConfig,
}

impl FrameProcessor {
    /// Constructs the processor.
    pub fn new(config: FrameProcessorConfig) -> Result<Self> {
        if config.crop_top >= config.crop_bottom {
            return Err(AtariEnvError::InvalidConfig(format!(
                "empty crop band {}..{}",
                config.crop_top, config.crop_bottom
            ))
            .into());
        }
        if config.out_height == 0 || config.out_width == 0 {
            return Err(AtariEnvError::InvalidConfig("output size must be positive".into()).into());
        }
        Ok(Self { config })
    }

    /// Shape `(height, width)` of processed frames.
    pub fn out_shape(&self) -> (usize, usize) {
        (self.config.out_height, self.config.out_width)
    }

    fn validate(&self, frame: &RawFrame) -> Result<(), AtariEnvError> {
        if frame.channels != 3 {
            return Err(AtariEnvError::InvalidFrame(format!(
                "expected 3 channels, got {}",
                frame.channels
            )));
        }
        let expected = frame.width as usize * frame.height as usize * frame.channels;
        if frame.data.len() != expected {
            return Err(AtariEnvError::InvalidFrame(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                frame.height,
                frame.width,
                frame.channels,
                frame.data.len()
            )));
        }
        if frame.width == 0 || (frame.height as usize) < self.config.crop_bottom {
            return Err(AtariEnvError::InvalidFrame(format!(
                "frame of {}x{} does not contain rows {}..{}",
                frame.height, frame.width, self.config.crop_top, self.config.crop_bottom
            )));
        }
        Ok(())
    }

    /// Processes a raw frame.
    ///
    /// Fails with [`AtariEnvError::InvalidFrame`] if the frame is not an RGB
    /// frame containing the crop band.
    pub fn process(&self, frame: &RawFrame) -> Result<Array2<f32>> {
        self.validate(frame)?;
        let (w, h) = (frame.width, frame.height);

        let img = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(w, h, &frame.data[..])
            .ok_or_else(|| AtariEnvError::InvalidFrame("buffer too small".into()))?;
        let luma = grayscale(&img).into_raw();
        let luma = Array2::from_shape_vec(
            (h as usize, w as usize),
            luma.into_iter().map(f32::from).collect(),
        )?;

        let cropped = luma.slice(s![self.config.crop_top..self.config.crop_bottom, ..]);
        let resized = resize_area(cropped, self.config.out_height, self.config.out_width);

        Ok(resized.mapv(|v| (v / 255.0).max(0.0).min(1.0)))
    }
}

// For each output index, the input indices it covers and their weights.
fn area_weights(n_in: usize, n_out: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = n_in as f64 / n_out as f64;
    (0..n_out)
        .map(|i| {
            let start = i as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(n_in);
            (first..last)
                .filter_map(|p| {
                    let overlap = end.min((p + 1) as f64) - start.max(p as f64);
                    if overlap > 1e-9 {
                        Some((p, (overlap / scale) as f32))
                    } else {
                        None
                    }
                })
                .collect()
        })
        .collect()
}

/// Resizes a single-channel image by area averaging.
///
/// Every output pixel is the mean of the input area it covers, with
/// fractionally covered pixels weighted by their overlap. Resizing to the
/// same size is the identity up to rounding.
pub fn resize_area(input: ArrayView2<f32>, out_height: usize, out_width: usize) -> Array2<f32> {
    let (in_height, in_width) = input.dim();
    let wy = area_weights(in_height, out_height);
    let wx = area_weights(in_width, out_width);

    // Rows first, then columns.
    let mut rows = Array2::<f32>::zeros((out_height, in_width));
    for (i, ws) in wy.iter().enumerate() {
        for &(p, w) in ws.iter() {
            rows.row_mut(i).scaled_add(w, &input.row(p));
        }
    }

    let mut out = Array2::<f32>::zeros((out_height, out_width));
    for (j, ws) in wx.iter().enumerate() {
        for &(q, w) in ws.iter() {
            out.column_mut(j).scaled_add(w, &rows.column(q));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn processor() -> FrameProcessor {
        FrameProcessor::new(FrameProcessorConfig::default()).unwrap()
    }

    fn random_frame(rng: &mut StdRng) -> RawFrame {
        let data = (0..210 * 160 * 3).map(|_| rng.gen::<u8>()).collect();
        RawFrame::rgb(160, 210, data)
    }

    #[test]
    fn test_output_shape_and_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let p = processor();
        for _ in 0..5 {
            let out = p.process(&random_frame(&mut rng))?;
            assert_eq!(out.dim(), (84, 84));
            assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        for value in [0u8, 255].iter() {
            let out = p.process(&RawFrame::rgb(160, 210, vec![*value; 210 * 160 * 3]))?;
            let expected = *value as f32 / 255.0;
            assert!(out.iter().all(|v| (v - expected).abs() < 1.5 / 255.0));
        }
        Ok(())
    }

    #[test]
    fn test_crop_removes_score_band() -> Result<()> {
        // White score band and bottom border, black playfield.
        let mut data = vec![0u8; 210 * 160 * 3];
        for row in (0..34).chain(194..210) {
            for b in data[row * 160 * 3..(row + 1) * 160 * 3].iter_mut() {
                *b = 255;
            }
        }
        let out = processor().process(&RawFrame::rgb(160, 210, data))?;
        assert!(out.iter().all(|v| *v == 0.0));
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let frame = random_frame(&mut rng);
        let p = processor();
        assert_eq!(p.process(&frame)?, p.process(&frame)?);
        Ok(())
    }

    #[test]
    fn test_invalid_frames() {
        let p = processor();
        let cases = vec![
            RawFrame {
                width: 160,
                height: 210,
                channels: 4,
                data: vec![0; 210 * 160 * 4],
            },
            RawFrame::rgb(160, 210, vec![0; 100]),
            RawFrame::rgb(160, 100, vec![0; 100 * 160 * 3]),
        ];
        for frame in cases.iter() {
            let err = p.process(frame).unwrap_err();
            match err.downcast_ref::<AtariEnvError>() {
                Some(AtariEnvError::InvalidFrame(_)) => {}
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_resize_area_is_approximately_idempotent() {
        // Reprocessing an 84x84 frame in [0, 1] changes values only by rounding.
        let mut rng = StdRng::seed_from_u64(0);
        let input = Array2::from_shape_fn((84, 84), |_| rng.gen::<f32>());
        let out = resize_area(input.view(), 84, 84);
        assert_eq!(out.dim(), (84, 84));
        for (a, b) in input.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_resize_area_averages_blocks() {
        let input = Array2::from_shape_vec((2, 4), vec![0., 2., 4., 6., 2., 4., 6., 8.]).unwrap();
        let out = resize_area(input.view(), 1, 2);
        assert_eq!(out, Array2::from_shape_vec((1, 2), vec![2.0, 6.0]).unwrap());

        // 3 -> 2 splits the middle pixel between both outputs.
        let input = Array2::from_shape_vec((1, 3), vec![0., 3., 6.]).unwrap();
        let out = resize_area(input.view(), 1, 2);
        assert!((out[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((out[[0, 1]] - 5.0).abs() < 1e-6);
    }
}
