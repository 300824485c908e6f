//! One-dimensional lookup tables and the `.spi1d` text reader.
//!
//! The file layout is a short header followed by the samples between
//! braces:
//!
//! ```text
//! Version 1
//! From 0.0 1.0
//! Components 1
//! Length 4096
//! {
//!     0.031525
//!     ...
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A sampled 1D curve per channel, mapped over `[from_min, from_max]`.
#[derive(Debug, Clone)]
pub struct Lut1d {
    pub from_min: f32,
    pub from_max: f32,
    pub channels: [Vec<f32>; 3],
}

impl Lut1d {
    pub fn from_spi1d_file(path: &Path) -> Result<Arc<Lut1d>> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path.display().to_string();
        Ok(Arc::new(Self::parse_spi1d(&text, &name)?))
    }

    /// Parses the `.spi1d` text format. One, two or three values per
    /// sample line; a single value fans out to all three channels, two
    /// values leave the third channel at zero.
    pub fn parse_spi1d(text: &str, file: &str) -> Result<Lut1d> {
        let err = |line: usize, message: &str| Error::LutParse {
            file: file.to_string(),
            line,
            message: message.to_string(),
        };

        let mut version: Option<i64> = None;
        let mut length: Option<usize> = None;
        let mut components: Option<usize> = None;
        let mut from = (0.0f32, 1.0f32);

        let mut lines = text.lines().enumerate();

        // Header, up to the opening brace.
        for (idx, raw) in lines.by_ref() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.starts_with('{') {
                break;
            }
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("Version") => {
                    let v = fields
                        .next()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| err(line_no, "invalid Version tag"))?;
                    if v != 1 {
                        return Err(err(line_no, "only format version 1 is supported"));
                    }
                    version = Some(v);
                }
                Some("From") => {
                    let lo = fields.next().and_then(|s| s.parse().ok());
                    let hi = fields.next().and_then(|s| s.parse().ok());
                    match (lo, hi) {
                        (Some(lo), Some(hi)) => from = (lo, hi),
                        _ => return Err(err(line_no, "invalid From tag")),
                    }
                }
                Some("Components") => {
                    components = Some(
                        fields
                            .next()
                            .and_then(|s| s.parse().ok())
                            .ok_or_else(|| err(line_no, "invalid Components tag"))?,
                    );
                }
                Some("Length") => {
                    length = Some(
                        fields
                            .next()
                            .and_then(|s| s.parse().ok())
                            .ok_or_else(|| err(line_no, "invalid Length tag"))?,
                    );
                }
                _ => {}
            }
        }

        if version.is_none() {
            return Err(err(0, "missing Version tag"));
        }
        let length = length.ok_or_else(|| err(0, "missing Length tag"))?;
        let components = components.ok_or_else(|| err(0, "missing Components tag"))?;
        if !(1..=3).contains(&components) {
            return Err(err(0, "Components must be 1, 2 or 3"));
        }

        let mut channels = [
            Vec::with_capacity(length),
            Vec::with_capacity(length),
            Vec::with_capacity(length),
        ];

        for (idx, raw) in lines {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('}') {
                continue;
            }
            let values: Vec<f32> = line
                .split_whitespace()
                .take(components)
                .filter_map(|s| s.parse().ok())
                .collect();
            if values.len() != components {
                return Err(err(line_no, "malformed sample line"));
            }
            match components {
                1 => {
                    channels[0].push(values[0]);
                    channels[1].push(values[0]);
                    channels[2].push(values[0]);
                }
                2 => {
                    channels[0].push(values[0]);
                    channels[1].push(values[1]);
                    channels[2].push(0.0);
                }
                _ => {
                    channels[0].push(values[0]);
                    channels[1].push(values[1]);
                    channels[2].push(values[2]);
                }
            }
            if channels[0].len() == length {
                break;
            }
        }

        if channels[0].len() != length {
            return Err(err(0, "not enough sample lines"));
        }

        Ok(Lut1d {
            from_min: from.0,
            from_max: from.1,
            channels,
        })
    }

    /// Looks up `v` on the given channel with linear interpolation,
    /// clamping outside the input domain.
    pub fn evaluate(&self, channel: usize, v: f32) -> f32 {
        let samples = &self.channels[channel];
        if samples.is_empty() {
            return v;
        }
        if samples.len() == 1 {
            return samples[0];
        }
        let span = self.from_max - self.from_min;
        let t = if span.abs() < f32::EPSILON {
            0.0
        } else {
            ((v - self.from_min) / span).clamp(0.0, 1.0)
        };
        let pos = t * (samples.len() - 1) as f32;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(samples.len() - 1);
        let frac = pos - lo as f32;
        samples[lo] + (samples[hi] - samples[lo]) * frac
    }

    /// Finds the input that maps to `v`, assuming the channel is
    /// monotonic. Values outside the output range clamp to the ends.
    pub fn evaluate_inverse(&self, channel: usize, v: f32) -> f32 {
        let samples = &self.channels[channel];
        if samples.len() < 2 {
            return v;
        }
        let n = samples.len() - 1;
        let increasing = samples[n] >= samples[0];
        let step = (self.from_max - self.from_min) / n as f32;

        for i in 0..n {
            let (a, b) = (samples[i], samples[i + 1]);
            let inside = if increasing {
                v >= a && v <= b
            } else {
                v <= a && v >= b
            };
            if inside {
                let frac = if (b - a).abs() < f32::EPSILON {
                    0.0
                } else {
                    (v - a) / (b - a)
                };
                return self.from_min + (i as f32 + frac) * step;
            }
        }
        let past_end = if increasing { v > samples[n] } else { v < samples[n] };
        if past_end {
            self.from_max
        } else {
            self.from_min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RAMP: &str = "\
Version 1
From 0.0 1.0
Components 1
Length 3
{
    0.0
    0.5
    1.0
}
";

    #[test]
    fn parses_a_single_component_ramp() {
        let lut = Lut1d::parse_spi1d(RAMP, "ramp.spi1d").unwrap();
        assert_eq!(lut.channels[0].len(), 3);
        assert_eq!(lut.channels[0], lut.channels[2]);
        assert_relative_eq!(lut.evaluate(0, 0.25), 0.25, epsilon = 1e-6);
        assert_relative_eq!(lut.evaluate(1, 2.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn honors_the_from_range() {
        let text = "Version 1\nFrom -1.0 1.0\nComponents 1\nLength 2\n{\n0.0\n10.0\n}\n";
        let lut = Lut1d::parse_spi1d(text, "t.spi1d").unwrap();
        assert_relative_eq!(lut.evaluate(0, 0.0), 5.0, epsilon = 1e-5);
        assert_relative_eq!(lut.evaluate(0, -1.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn inverse_finds_the_matching_input() {
        let lut = Lut1d::parse_spi1d(RAMP, "ramp.spi1d").unwrap();
        assert_relative_eq!(lut.evaluate_inverse(0, 0.75), 0.75, epsilon = 1e-5);
        assert_relative_eq!(lut.evaluate_inverse(0, 2.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn header_without_length_is_rejected() {
        let text = "Version 1\nComponents 1\n{\n0.0\n}\n";
        let e = Lut1d::parse_spi1d(text, "bad.spi1d").unwrap_err();
        assert!(e.to_string().contains("Length"));
    }

    #[test]
    fn short_tables_are_rejected() {
        let text = "Version 1\nComponents 1\nLength 4\n{\n0.0\n1.0\n}\n";
        assert!(Lut1d::parse_spi1d(text, "short.spi1d").is_err());
    }
}
