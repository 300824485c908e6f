//! Baked transform pipelines applied to packed float pixels.
//!
//! A processor is an ordered list of ops produced from a transform by
//! [`crate::Config::processor`]. Building collapses adjacent matrices
//! and drops identities, so per-pixel work is what remains.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::lut::Lut1d;

// ============================================================================
// Ops
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) enum Op {
    /// y = M x + o, row-major 3x3.
    Matrix { m: [f64; 9], offset: [f64; 3] },
    /// y = max(x, 0) ^ e per channel.
    Exponent { e: [f64; 3] },
    Lut1d { lut: Arc<Lut1d>, inverse: bool },
}

const IDENTITY_M: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

fn mat_mul(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut out = [0.0; 9];
    for r in 0..3 {
        for c in 0..3 {
            out[r * 3 + c] =
                a[r * 3] * b[c] + a[r * 3 + 1] * b[3 + c] + a[r * 3 + 2] * b[6 + c];
        }
    }
    out
}

fn mat_apply(m: &[f64; 9], v: [f64; 3]) -> [f64; 3] {
    [
        m[0] * v[0] + m[1] * v[1] + m[2] * v[2],
        m[3] * v[0] + m[4] * v[1] + m[5] * v[2],
        m[6] * v[0] + m[7] * v[1] + m[8] * v[2],
    ]
}

fn mat_invert(m: &[f64; 9]) -> Result<[f64; 9]> {
    let det = m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6]);
    if det.abs() < 1e-12 {
        return Err(Error::SingularMatrix);
    }
    let inv_det = 1.0 / det;
    Ok([
        (m[4] * m[8] - m[5] * m[7]) * inv_det,
        (m[2] * m[7] - m[1] * m[8]) * inv_det,
        (m[1] * m[5] - m[2] * m[4]) * inv_det,
        (m[5] * m[6] - m[3] * m[8]) * inv_det,
        (m[0] * m[8] - m[2] * m[6]) * inv_det,
        (m[2] * m[3] - m[0] * m[5]) * inv_det,
        (m[3] * m[7] - m[4] * m[6]) * inv_det,
        (m[1] * m[6] - m[0] * m[7]) * inv_det,
        (m[0] * m[4] - m[1] * m[3]) * inv_det,
    ])
}

impl Op {
    pub(crate) fn inverted(&self) -> Result<Op> {
        match self {
            Op::Matrix { m, offset } => {
                // y = Mx + o inverts to x = M'y - M'o.
                let inv = mat_invert(m)?;
                let neg = mat_apply(&inv, *offset);
                Ok(Op::Matrix {
                    m: inv,
                    offset: [-neg[0], -neg[1], -neg[2]],
                })
            }
            Op::Exponent { e } => {
                if e.iter().any(|v| v.abs() < 1e-12) {
                    return Err(Error::SingularMatrix);
                }
                Ok(Op::Exponent {
                    e: [1.0 / e[0], 1.0 / e[1], 1.0 / e[2]],
                })
            }
            Op::Lut1d { lut, inverse } => Ok(Op::Lut1d {
                lut: Arc::clone(lut),
                inverse: !inverse,
            }),
        }
    }

    fn is_identity(&self) -> bool {
        match self {
            Op::Matrix { m, offset } => *m == IDENTITY_M && *offset == [0.0; 3],
            Op::Exponent { e } => *e == [1.0; 3],
            Op::Lut1d { .. } => false,
        }
    }

    fn apply(&self, rgb: &mut [f32; 3]) {
        match self {
            Op::Matrix { m, offset } => {
                let v = mat_apply(m, [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]);
                rgb[0] = (v[0] + offset[0]) as f32;
                rgb[1] = (v[1] + offset[1]) as f32;
                rgb[2] = (v[2] + offset[2]) as f32;
            }
            Op::Exponent { e } => {
                for c in 0..3 {
                    rgb[c] = rgb[c].max(0.0).powf(e[c] as f32);
                }
            }
            Op::Lut1d { lut, inverse } => {
                for c in 0..3 {
                    rgb[c] = if *inverse {
                        lut.evaluate_inverse(c, rgb[c])
                    } else {
                        lut.evaluate(c, rgb[c])
                    };
                }
            }
        }
    }
}

// ============================================================================
// Processor
// ============================================================================

/// A finalized pipeline. Cheap to clone and safe to share across render
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    ops: Vec<Op>,
}

impl Processor {
    pub(crate) fn from_ops(ops: Vec<Op>) -> Processor {
        Processor {
            ops: finalize(ops),
        }
    }

    /// True when the pipeline changes nothing; callers can skip work.
    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn apply_rgb(&self, rgb: &mut [f32; 3]) {
        for op in &self.ops {
            op.apply(rgb);
        }
    }

    /// Applies the pipeline in place over packed pixels, 3 or 4 floats
    /// each. Alpha is passed through untouched.
    pub fn apply(&self, pixels: &mut [f32], channels: usize) -> Result<()> {
        if channels != 3 && channels != 4 {
            return Err(Error::BadPixelLayout(channels));
        }
        if self.is_noop() {
            return Ok(());
        }
        for px in pixels.chunks_exact_mut(channels) {
            let mut rgb = [px[0], px[1], px[2]];
            self.apply_rgb(&mut rgb);
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
        }
        Ok(())
    }
}

/// Drops identity ops and fuses runs of matrices into one.
fn finalize(ops: Vec<Op>) -> Vec<Op> {
    let mut out: Vec<Op> = Vec::with_capacity(ops.len());
    for op in ops {
        if op.is_identity() {
            continue;
        }
        if let (Some(Op::Matrix { m: pm, offset: po }), Op::Matrix { m, offset }) =
            (out.last_mut(), &op)
        {
            // Second matrix applied after the first: y = M2 (M1 x + o1) + o2.
            let fused = mat_mul(m, pm);
            let o = mat_apply(m, *po);
            *pm = fused;
            *po = [o[0] + offset[0], o[1] + offset[1], o[2] + offset[2]];
            if out.last().map(Op::is_identity) == Some(true) {
                out.pop();
            }
            continue;
        }
        out.push(op);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scale(s: f64) -> Op {
        Op::Matrix {
            m: [s, 0.0, 0.0, 0.0, s, 0.0, 0.0, 0.0, s],
            offset: [0.0; 3],
        }
    }

    #[test]
    fn adjacent_matrices_fuse_into_one_op() {
        let p = Processor::from_ops(vec![scale(2.0), scale(3.0)]);
        assert_eq!(p.ops.len(), 1);
        let mut rgb = [1.0f32, 0.5, 0.25];
        p.apply_rgb(&mut rgb);
        assert_relative_eq!(rgb[0], 6.0, epsilon = 1e-6);
        assert_relative_eq!(rgb[2], 1.5, epsilon = 1e-6);
    }

    #[test]
    fn inverse_scale_round_trips() {
        let inv = scale(2.0).inverted().unwrap();
        let p = Processor::from_ops(vec![scale(2.0), inv]);
        assert!(p.is_noop());
    }

    #[test]
    fn matrix_with_offset_inverts_exactly() {
        let op = Op::Matrix {
            m: [2.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 8.0],
            offset: [0.1, 0.2, 0.3],
        };
        let p = Processor::from_ops(vec![op.clone(), op.inverted().unwrap()]);
        let mut rgb = [0.7f32, 0.6, 0.5];
        p.apply_rgb(&mut rgb);
        assert_relative_eq!(rgb[0], 0.7, epsilon = 1e-6);
        assert_relative_eq!(rgb[1], 0.6, epsilon = 1e-6);
        assert_relative_eq!(rgb[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn exponent_clamps_negatives() {
        let p = Processor::from_ops(vec![Op::Exponent { e: [2.0; 3] }]);
        let mut rgb = [-1.0f32, 0.5, 2.0];
        p.apply_rgb(&mut rgb);
        assert_eq!(rgb[0], 0.0);
        assert_relative_eq!(rgb[1], 0.25, epsilon = 1e-6);
        assert_relative_eq!(rgb[2], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn apply_leaves_alpha_alone() {
        let p = Processor::from_ops(vec![scale(2.0)]);
        let mut pixels = vec![0.5f32, 0.5, 0.5, 0.9, 1.0, 1.0, 1.0, 0.1];
        p.apply(&mut pixels, 4).unwrap();
        assert_eq!(pixels[3], 0.9);
        assert_eq!(pixels[7], 0.1);
        assert_relative_eq!(pixels[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(pixels[4], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn odd_channel_counts_are_rejected() {
        let p = Processor::default();
        let mut pixels = vec![0.0f32; 10];
        assert!(matches!(
            p.apply(&mut pixels, 2),
            Err(Error::BadPixelLayout(2))
        ));
    }

    #[test]
    fn singular_matrices_refuse_to_invert() {
        let op = Op::Matrix {
            m: [0.0; 9],
            offset: [0.0; 3],
        };
        assert!(matches!(op.inverted(), Err(Error::SingularMatrix)));
    }
}
