//! Transform building blocks: affine maps, piecewise warps and steps.

use serde::Serialize;

use super::SpaceError;
use crate::coord::Vec3;

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// A single affine map `p' = M·p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AffineMap {
    /// Row-major 3×3 matrix.
    pub matrix: [[f64; 3]; 3],
    /// Translation applied after the matrix.
    pub translation: Vec3,
}

impl AffineMap {
    pub const IDENTITY: AffineMap = AffineMap {
        matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: Vec3::ZERO,
    };

    pub fn new(matrix: [[f64; 3]; 3], translation: Vec3) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    /// Pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(Self::IDENTITY.matrix, Vec3::new(dx, dy, dz))
    }

    /// Diagonal scaling about the origin.
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(
            [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, sz]],
            Vec3::ZERO,
        )
    }

    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let m = &self.matrix;
        Vec3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + self.translation.x,
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + self.translation.y,
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + self.translation.z,
        )
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Exact inverse; fails when the matrix is singular.
    pub fn inverse(&self) -> Result<AffineMap, SpaceError> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON || !det.is_finite() {
            return Err(SpaceError::SingularMatrix { determinant: det });
        }

        let m = &self.matrix;
        let inv_det = 1.0 / det;
        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];

        let linear = AffineMap::new(inv, Vec3::ZERO);
        let translation = -linear.apply(self.translation);
        Ok(AffineMap::new(inv, translation))
    }
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One partition of a piecewise-affine warp.
///
/// `bot` and `top` bound the partition inclusively. The forward map is
/// selected when its *output* falls inside the box, the backward map when the
/// *input* does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WarpPiece {
    pub forward: AffineMap,
    pub backward: AffineMap,
    pub bot: Vec3,
    pub top: Vec3,
}

impl WarpPiece {
    pub fn new(forward: AffineMap, backward: AffineMap, bot: Vec3, top: Vec3) -> Self {
        Self {
            forward,
            backward,
            bot,
            top,
        }
    }

    /// Builds a piece whose backward map is the exact inverse of `forward`.
    pub fn invertible(forward: AffineMap, bot: Vec3, top: Vec3) -> Result<Self, SpaceError> {
        Ok(Self::new(forward, forward.inverse()?, bot, top))
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.bot.x
            && p.y >= self.bot.y
            && p.z >= self.bot.z
            && p.x <= self.top.x
            && p.y <= self.top.y
            && p.z <= self.top.z
    }
}

/// One step of a transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TransformStep {
    /// A single affine map with its backward counterpart.
    Affine {
        forward: AffineMap,
        backward: AffineMap,
    },
    /// Ordered partitions; first matching partition wins, the last one is the
    /// fallback.
    Piecewise(Vec<WarpPiece>),
}

impl TransformStep {
    /// Affine step whose backward map is the inverse of `forward`.
    pub fn affine(forward: AffineMap) -> Result<Self, SpaceError> {
        Ok(TransformStep::Affine {
            forward,
            backward: forward.inverse()?,
        })
    }

    /// Constant offset in RAI millimetres.
    pub fn shift(dx: f64, dy: f64, dz: f64) -> Self {
        TransformStep::Affine {
            forward: AffineMap::translation(dx, dy, dz),
            backward: AffineMap::translation(-dx, -dy, -dz),
        }
    }

    pub fn piecewise(pieces: Vec<WarpPiece>) -> Self {
        TransformStep::Piecewise(pieces)
    }

    /// Forward application.
    ///
    /// Returns `None` only for a piecewise step without partitions.
    pub fn forward(&self, p: Vec3) -> Option<Vec3> {
        match self {
            TransformStep::Affine { forward, .. } => Some(forward.apply(p)),
            TransformStep::Piecewise(pieces) => {
                let mut last = None;
                for piece in pieces {
                    let out = piece.forward.apply(p);
                    if piece.contains(out) {
                        return Some(out);
                    }
                    last = Some(out);
                }
                last
            }
        }
    }

    /// Backward application.
    ///
    /// Selection is by membership of the input, so for piecewise steps this
    /// is not guaranteed to undo [`forward`](Self::forward) exactly.
    pub fn backward(&self, p: Vec3) -> Option<Vec3> {
        match self {
            TransformStep::Affine { backward, .. } => Some(backward.apply(p)),
            TransformStep::Piecewise(pieces) => pieces
                .iter()
                .find(|piece| piece.contains(p))
                .or_else(|| pieces.last())
                .map(|piece| piece.backward.apply(p)),
        }
    }

    pub fn is_piecewise(&self) -> bool {
        matches!(self, TransformStep::Piecewise(_))
    }
}

/// Ordered composition of one or more steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transform {
    steps: Vec<TransformStep>,
}

impl Transform {
    /// Creates a transform; at least one step is required.
    pub fn new(steps: Vec<TransformStep>) -> Result<Self, SpaceError> {
        if steps.is_empty() {
            return Err(SpaceError::EmptyTransform);
        }
        Ok(Self { steps })
    }

    pub fn single(step: TransformStep) -> Self {
        Self { steps: vec![step] }
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    /// True when any step is piecewise (round trips are then approximate).
    pub fn has_piecewise(&self) -> bool {
        self.steps.iter().any(TransformStep::is_piecewise)
    }

    /// Applies every step forward, in order.
    pub fn forward(&self, p: Vec3) -> Option<Vec3> {
        self.steps.iter().try_fold(p, |acc, step| step.forward(acc))
    }

    /// Applies every step backward, last step first.
    pub fn backward(&self, p: Vec3) -> Option<Vec3> {
        self.steps
            .iter()
            .rev()
            .try_fold(p, |acc, step| step.backward(acc))
    }
}

impl From<TransformStep> for Transform {
    fn from(step: TransformStep) -> Self {
        Transform::single(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1e-9
    }

    fn rotation_scale() -> AffineMap {
        AffineMap::new(
            [[0.0, -1.1, 0.0], [0.9, 0.0, 0.0], [0.0, 0.1, 1.05]],
            Vec3::new(2.0, -3.0, 4.5),
        )
    }

    // =========================================================================
    // AffineMap
    // =========================================================================

    #[test]
    fn test_identity_apply() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(AffineMap::IDENTITY.apply(p), p);
    }

    #[test]
    fn test_translation_apply() {
        let map = AffineMap::translation(0.0, -4.0, -5.0);
        assert_eq!(
            map.apply(Vec3::new(10.0, 10.0, 10.0)),
            Vec3::new(10.0, 6.0, 5.0)
        );
    }

    #[test]
    fn test_inverse_round_trip() {
        let map = rotation_scale();
        let inv = map.inverse().unwrap();
        let p = Vec3::new(-12.0, 40.0, 7.5);
        assert!(
            approx_eq(inv.apply(map.apply(p)), p),
            "inverse should undo the forward map"
        );
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let map = AffineMap::scaling(1.0, 0.0, 1.0);
        assert!(matches!(
            map.inverse(),
            Err(SpaceError::SingularMatrix { .. })
        ));
    }

    // =========================================================================
    // Piecewise selection
    // =========================================================================

    fn two_piece_warp() -> TransformStep {
        // Left half (x <= 0 after mapping) shifts by -10, right half by +10
        let left = WarpPiece::invertible(
            AffineMap::translation(-10.0, 0.0, 0.0),
            Vec3::new(-100.0, -100.0, -100.0),
            Vec3::new(0.0, 100.0, 100.0),
        )
        .unwrap();
        let right = WarpPiece::invertible(
            AffineMap::translation(10.0, 0.0, 0.0),
            Vec3::new(0.0, -100.0, -100.0),
            Vec3::new(100.0, 100.0, 100.0),
        )
        .unwrap();
        TransformStep::piecewise(vec![left, right])
    }

    #[test]
    fn test_piecewise_forward_selects_by_output() {
        let step = two_piece_warp();
        // -5 - 10 = -15 lands in the first box
        assert_eq!(
            step.forward(Vec3::new(-5.0, 0.0, 0.0)),
            Some(Vec3::new(-15.0, 0.0, 0.0))
        );
        // 5 - 10 = -5 also lands in the first box: output decides, not input
        assert_eq!(
            step.forward(Vec3::new(5.0, 0.0, 0.0)),
            Some(Vec3::new(-5.0, 0.0, 0.0))
        );
        // 20 - 10 = 10 is outside the first box, second piece gives 30
        assert_eq!(
            step.forward(Vec3::new(20.0, 0.0, 0.0)),
            Some(Vec3::new(30.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_piecewise_forward_falls_back_to_last() {
        let step = two_piece_warp();
        // Far outside every box: last computed piece wins
        assert_eq!(
            step.forward(Vec3::new(500.0, 0.0, 0.0)),
            Some(Vec3::new(510.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_piecewise_backward_selects_by_input() {
        let step = two_piece_warp();
        assert_eq!(
            step.backward(Vec3::new(-15.0, 0.0, 0.0)),
            Some(Vec3::new(-5.0, 0.0, 0.0))
        );
        assert_eq!(
            step.backward(Vec3::new(30.0, 0.0, 0.0)),
            Some(Vec3::new(20.0, 0.0, 0.0))
        );
        // Outside every box: last piece
        assert_eq!(
            step.backward(Vec3::new(-500.0, 0.0, 0.0)),
            Some(Vec3::new(-510.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_piecewise_backward_is_not_exact_inverse() {
        let step = two_piece_warp();
        // forward(5) = -5 via the left piece, backward(-5) = 5 via the left piece
        let there = step.forward(Vec3::new(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(step.backward(there), Some(Vec3::new(5.0, 0.0, 0.0)));
        // forward(-105) = -115 falls back to the right piece (-95), then
        // backward(-95) selects the left piece again: -85, not -105
        let there = step.forward(Vec3::new(-105.0, 0.0, 0.0)).unwrap();
        let back = step.backward(there).unwrap();
        assert_ne!(back, Vec3::new(-105.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_piecewise_is_unreachable() {
        let step = TransformStep::piecewise(Vec::new());
        assert_eq!(step.forward(Vec3::ZERO), None);
        assert_eq!(step.backward(Vec3::ZERO), None);
    }

    // =========================================================================
    // Transform
    // =========================================================================

    #[test]
    fn test_transform_requires_steps() {
        assert!(matches!(
            Transform::new(Vec::new()),
            Err(SpaceError::EmptyTransform)
        ));
    }

    #[test]
    fn test_transform_applies_steps_in_order() {
        let transform = Transform::new(vec![
            TransformStep::affine(AffineMap::scaling(2.0, 2.0, 2.0)).unwrap(),
            TransformStep::shift(1.0, 0.0, 0.0),
        ])
        .unwrap();
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(transform.forward(p), Some(Vec3::new(3.0, 2.0, 2.0)));
        assert_eq!(
            transform.backward(Vec3::new(3.0, 2.0, 2.0)),
            Some(p),
            "backward should undo steps in reverse order"
        );
    }

    #[test]
    fn test_has_piecewise() {
        assert!(!Transform::single(TransformStep::shift(0.0, 1.0, 0.0)).has_piecewise());
        assert!(Transform::single(two_piece_warp()).has_piecewise());
    }
}
