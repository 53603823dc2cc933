//! Analog response curves.
//!
//! The Classic Controller's left stick is 6 bits per axis. Native sticks
//! report roughly ±100, so each curve is a table of thresholds that maps a
//! deflection magnitude onto a 5-bit step, which is then added to or
//! subtracted from the centre code.

/// Centre code of a 6-bit stick axis.
pub const CURVE_CENTER: u8 = 0x20;

/// Largest magnitude step a curve can produce.
pub const MAX_STEP: u8 = 0x1F;

const V1_4: &[u8] = &[
    0, 1, 2, 3, 6, 12, 18, 22, 31, 40, 50, 56, 60, 64, 67, 69, 70, 71, 72, 73, 74,
];

// Good for Zelda.
const V1_5: &[u8] = &[
    0, 1, 2, 3, 4, 6, 8, 10, 12, 14, 16, 18, 25, 32, 38, 44, 52, 60, 61, 62, 63, 64, 65, 66, 67,
    68, 69, 70, 71, 72, 73, 74,
];

const GAMECUBE: &[u8] = &[
    0, 1, 4, 7, 11, 15, 19, 23, 27, 31, 37, 43, 50, 57, 63, 69, 73, 77, 80, 83, 86, 89, 92, 94, 96,
    97, 98, 99, 100,
];

/// Named analog response curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Curve {
    /// Steep early response, saturates around 74.
    #[default]
    V1_4,
    /// Gentle centre, fast ramp through mid range.
    V1_5,
    /// Tuned for the GameCube stick's wider range.
    GameCube,
}

impl Curve {
    /// Decode a persisted curve id. Unknown ids select curve 0.
    #[must_use]
    pub const fn from_id(id: u8) -> Self {
        match id {
            1 => Self::V1_5,
            2 => Self::GameCube,
            _ => Self::V1_4,
        }
    }

    /// Persisted id of this curve.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::V1_4 => 0,
            Self::V1_5 => 1,
            Self::GameCube => 2,
        }
    }

    /// Threshold table, strictly increasing.
    #[must_use]
    pub const fn thresholds(self) -> &'static [u8] {
        match self {
            Self::V1_4 => V1_4,
            Self::V1_5 => V1_5,
            Self::GameCube => GAMECUBE,
        }
    }

    /// Magnitude step (0..=31) for a non-negative deflection.
    ///
    /// Returns the index of the greatest threshold not exceeding `magnitude`,
    /// or [`MAX_STEP`] when no threshold exceeds it.
    #[must_use]
    pub fn step(self, magnitude: u8) -> u8 {
        if magnitude == 0 {
            return 0;
        }

        let table = self.thresholds();
        table
            .iter()
            .skip(1)
            .position(|&threshold| threshold > magnitude)
            .map_or(MAX_STEP, |i| i as u8)
    }
}

/// Shape a signed deflection into a 6-bit axis code centred on [`CURVE_CENTER`].
///
/// The curve is point-symmetric: `apply_curve(-x) == 2 * CENTER - apply_curve(x)`.
#[must_use]
pub fn apply_curve(deflection: i8, curve: Curve) -> u8 {
    let step = curve.step(deflection.unsigned_abs());
    if deflection >= 0 {
        CURVE_CENTER + step
    } else {
        CURVE_CENTER - step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Curve; 3] = [Curve::V1_4, Curve::V1_5, Curve::GameCube];

    #[test]
    fn test_thresholds_strictly_increasing() {
        for curve in ALL {
            let t = curve.thresholds();
            assert!(t.len() <= 32);
            assert!(t.windows(2).all(|w| w[0] < w[1]), "{:?}", curve);
        }
    }

    #[test]
    fn test_zero_is_center() {
        for curve in ALL {
            assert_eq!(apply_curve(0, curve), CURVE_CENTER);
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        for curve in ALL {
            let mut last = apply_curve(i8::MIN, curve);
            for x in (i8::MIN as i16 + 1)..=(i8::MAX as i16) {
                let y = apply_curve(x as i8, curve);
                assert!(y >= last, "{:?} not monotonic at {}", curve, x);
                last = y;
            }
        }
    }

    #[test]
    fn test_point_symmetry() {
        for curve in ALL {
            for x in 0..=i8::MAX {
                let pos = apply_curve(x, curve) as i16;
                let neg = apply_curve(-x, curve) as i16;
                assert_eq!(neg, 2 * CURVE_CENTER as i16 - pos, "{:?} at {}", curve, x);
            }
        }
    }

    #[test]
    fn test_output_stays_six_bit() {
        for curve in ALL {
            for x in i8::MIN..=i8::MAX {
                assert!(apply_curve(x, curve) < 0x40);
            }
        }
    }

    #[test]
    fn test_known_steps() {
        // 25 sits exactly on a V1_5 threshold
        assert_eq!(Curve::V1_5.step(25), 12);
        assert_eq!(Curve::V1_5.step(24), 11);
        assert_eq!(Curve::V1_5.step(74), MAX_STEP);
        assert_eq!(Curve::GameCube.step(100), MAX_STEP);
        assert_eq!(Curve::GameCube.step(99), 27);
        // V1_4 runs out of thresholds at 74 and saturates
        assert_eq!(Curve::V1_4.step(73), 19);
        assert_eq!(Curve::V1_4.step(74), MAX_STEP);
    }

    #[test]
    fn test_min_deflection_saturates() {
        assert_eq!(apply_curve(i8::MIN, Curve::V1_5), CURVE_CENTER - MAX_STEP);
    }

    #[test]
    fn test_unknown_id_falls_back() {
        assert_eq!(Curve::from_id(0xFF), Curve::V1_4);
        for curve in ALL {
            assert_eq!(Curve::from_id(curve.id()), curve);
        }
    }
}
