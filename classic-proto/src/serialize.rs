//! Wire packing of [`ClassicLogical`] into the extension data registers.
//!
//! The host selects one of three layouts by writing the report-mode
//! register (see [`ReportMode::from_register`]). Every layout is followed by
//! the same 11-byte extension block:
//!
//! ```text
//! 'R' id0 id1 raw0 raw1 raw2 raw3 raw4 raw5 raw6 raw7
//! ```
//!
//! Buttons go on the wire active-low, so the two button bytes are the
//! complement of [`ClassicButtons::high`] and [`ClassicButtons::low`].
//!
//! # Example
//!
//! ```
//! use classic_proto::{ClassicLogical, ClassicButtons, PackReport, ReportMode};
//!
//! let logical = ClassicLogical {
//!     buttons: ClassicButtons::A,
//!     ..ClassicLogical::neutral()
//! };
//! let mut buf = [0u8; 32];
//! let len = logical.pack(ReportMode::Classic6, &mut buf).unwrap();
//! assert_eq!(len, 17);
//! assert_eq!(buf[4], 0xFF);
//! assert_eq!(buf[5], !0x10);
//! assert_eq!(buf[6], b'R');
//! ```

use crate::buttons::ClassicButtons;
use crate::identity::REPORT_SENTINEL;
use crate::types::{centered_u8, ClassicLogical, RAW_DATA_SIZE};

/// Size of the extension block appended to every report core.
pub const EXTENSION_BLOCK_SIZE: usize = 3 + RAW_DATA_SIZE;

/// Largest report any mode produces.
pub const MAX_REPORT_SIZE: usize = 9 + EXTENSION_BLOCK_SIZE;

/// Report layout requested by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportMode {
    /// 6-byte core: 6-bit left stick, 5-bit right stick and triggers.
    #[default]
    Classic6,
    /// 8-byte core: every axis and trigger a full byte.
    Classic8,
    /// 9-byte core: 10-bit sticks, low bits gathered in one byte.
    Classic10,
}

impl ReportMode {
    /// Decode the report-mode register. Unrecognised values select [`Self::Classic6`].
    #[must_use]
    pub const fn from_register(value: u8) -> Self {
        match value {
            0x03 => Self::Classic8,
            0x02 => Self::Classic10,
            _ => Self::Classic6,
        }
    }

    /// Length of the mode-specific core.
    #[must_use]
    pub const fn core_len(self) -> usize {
        match self {
            Self::Classic6 => 6,
            Self::Classic8 => 8,
            Self::Classic10 => 9,
        }
    }

    /// Length of the whole report including the extension block.
    #[must_use]
    pub const fn report_len(self) -> usize {
        self.core_len() + EXTENSION_BLOCK_SIZE
    }
}

/// Error type for packing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the report.
    BufferTooSmall,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// Cursor over the output buffer. Length is checked once up front.
struct ReportBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ReportBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    #[inline]
    fn write_buttons(&mut self, buttons: ClassicButtons) {
        self.write(!buttons.high());
        self.write(!buttons.low());
    }

    fn finish(mut self, logical: &ClassicLogical) -> usize {
        self.write(REPORT_SENTINEL);
        self.write_slice(&logical.controller_id);
        self.write_slice(&logical.raw);
        self.pos
    }
}

/// Axis values common to all layouts, before mode-specific packing.
struct Axes {
    lx: u8,
    ly: u8,
    rx: u8,
    ry: u8,
}

impl Axes {
    fn of(logical: &ClassicLogical) -> Self {
        Self {
            lx: logical.shaping.shape(logical.left_stick.x),
            ly: logical.shaping.shape(logical.left_stick.y),
            rx: centered_u8(logical.right_stick.x),
            ry: centered_u8(logical.right_stick.y),
        }
    }
}

/// Extension trait packing a logical report into wire bytes.
pub trait PackReport {
    /// Pack into `buf` using the given layout.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `buf` is shorter than
    /// [`ReportMode::report_len`].
    fn pack(&self, mode: ReportMode, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Pack into a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `N` is not large enough.
    #[cfg(feature = "heapless")]
    fn pack_to_vec<const N: usize>(
        &self,
        mode: ReportMode,
    ) -> Result<heapless::Vec<u8, N>, SerializeError> {
        let mut vec = heapless::Vec::new();
        vec.resize(mode.report_len(), 0)
            .map_err(|_| SerializeError::BufferTooSmall)?;
        let len = self.pack(mode, &mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }
}

impl PackReport for ClassicLogical {
    fn pack(&self, mode: ReportMode, buf: &mut [u8]) -> Result<usize, SerializeError> {
        if buf.len() < mode.report_len() {
            return Err(SerializeError::BufferTooSmall);
        }

        let axes = Axes::of(self);
        let mut out = ReportBuf::new(buf);

        match mode {
            ReportMode::Classic6 => {
                let rx = axes.rx >> 3;
                let ry = axes.ry >> 3;
                let lt = self.left_trigger >> 3;
                let rt = self.right_trigger >> 3;

                out.write(((rx << 3) & 0xC0) | axes.lx);
                out.write(((rx << 5) & 0xC0) | axes.ly);
                out.write((rx << 7) | ((lt & 0x18) << 2) | ry);
                out.write((lt << 5) | rt);
            }
            ReportMode::Classic8 => {
                out.write(axes.lx << 2);
                out.write(axes.rx);
                out.write(axes.ly << 2);
                out.write(axes.ry);
                out.write(self.left_trigger);
                out.write(self.right_trigger);
            }
            ReportMode::Classic10 => {
                let lx = u16::from(axes.lx) << 4;
                let ly = u16::from(axes.ly) << 4;
                let rx = u16::from(axes.rx) << 2;
                let ry = u16::from(axes.ry) << 2;

                out.write((lx >> 2) as u8);
                out.write((rx >> 2) as u8);
                out.write((ly >> 2) as u8);
                out.write((ry >> 2) as u8);
                out.write((((lx & 3) << 6) | ((rx & 3) << 4) | ((ly & 3) << 2) | (ry & 3)) as u8);
                out.write(self.left_trigger);
                out.write(self.right_trigger);
            }
        }
        out.write_buttons(self.buttons);

        Ok(out.finish(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::types::{Stick, StickShaping};

    /// Unpacked view of a report, as a host would decode it.
    #[derive(Debug, PartialEq, Eq)]
    struct Decoded {
        lx: u8,
        ly: u8,
        rx: u8,
        ry: u8,
        lt: u8,
        rt: u8,
        buttons: u16,
    }

    fn decode(mode: ReportMode, b: &[u8]) -> Decoded {
        match mode {
            ReportMode::Classic6 => Decoded {
                lx: b[0] & 0x3F,
                ly: b[1] & 0x3F,
                rx: ((b[0] & 0xC0) >> 3) | ((b[1] & 0xC0) >> 5) | (b[2] >> 7),
                ry: b[2] & 0x1F,
                lt: ((b[2] & 0x60) >> 2) | (b[3] >> 5),
                rt: b[3] & 0x1F,
                buttons: !u16::from_be_bytes([b[4], b[5]]),
            },
            ReportMode::Classic8 => Decoded {
                lx: b[0] >> 2,
                ly: b[2] >> 2,
                rx: b[1],
                ry: b[3],
                lt: b[4],
                rt: b[5],
                buttons: !u16::from_be_bytes([b[6], b[7]]),
            },
            ReportMode::Classic10 => {
                let lx = (u16::from(b[0]) << 2) | u16::from(b[4] >> 6);
                let rx = (u16::from(b[1]) << 2) | u16::from((b[4] >> 4) & 3);
                let ly = (u16::from(b[2]) << 2) | u16::from((b[4] >> 2) & 3);
                let ry = (u16::from(b[3]) << 2) | u16::from(b[4] & 3);
                Decoded {
                    lx: (lx >> 4) as u8,
                    ly: (ly >> 4) as u8,
                    rx: (rx >> 2) as u8,
                    ry: (ry >> 2) as u8,
                    lt: b[5],
                    rt: b[6],
                    buttons: !u16::from_be_bytes([b[7], b[8]]),
                }
            }
        }
    }

    fn sample() -> ClassicLogical {
        ClassicLogical {
            left_stick: Stick::new(57, -90),
            right_stick: Stick::new(-100, 33),
            shaping: StickShaping::Curve(Curve::V1_5),
            left_trigger: 0xC8,
            right_trigger: 0x3B,
            buttons: ClassicButtons::A | ClassicButtons::DPAD_DOWN | ClassicButtons::TRIGGER_LEFT,
            controller_id: *b"GC",
            raw: [1, 2, 3, 4, 5, 6, 7, 8],
        }
    }

    #[test]
    fn test_mode_register_decoding() {
        assert_eq!(ReportMode::from_register(0x03), ReportMode::Classic8);
        assert_eq!(ReportMode::from_register(0x02), ReportMode::Classic10);
        assert_eq!(ReportMode::from_register(0x01), ReportMode::Classic6);
        assert_eq!(ReportMode::from_register(0xFF), ReportMode::Classic6);
    }

    #[test]
    fn test_report_lengths() {
        assert_eq!(ReportMode::Classic6.report_len(), 17);
        assert_eq!(ReportMode::Classic8.report_len(), 19);
        assert_eq!(ReportMode::Classic10.report_len(), 20);
        assert_eq!(MAX_REPORT_SIZE, 20);
    }

    #[test]
    fn test_decode_classic6() {
        let logical = sample();
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = logical.pack(ReportMode::Classic6, &mut buf).unwrap();
        assert_eq!(len, 17);

        let d = decode(ReportMode::Classic6, &buf);
        assert_eq!(d.lx, apply(57));
        assert_eq!(d.ly, apply(-90));
        assert_eq!(d.rx, centered_u8(-100) >> 3);
        assert_eq!(d.ry, centered_u8(33) >> 3);
        assert_eq!(d.lt, 0xC8 >> 3);
        assert_eq!(d.rt, 0x3B >> 3);
        assert_eq!(d.buttons, logical.buttons.raw());
    }

    #[test]
    fn test_decode_classic8() {
        let logical = sample();
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = logical.pack(ReportMode::Classic8, &mut buf).unwrap();
        assert_eq!(len, 19);

        let d = decode(ReportMode::Classic8, &buf);
        assert_eq!(d.lx, apply(57));
        assert_eq!(d.ly, apply(-90));
        assert_eq!(d.rx, centered_u8(-100));
        assert_eq!(d.ry, centered_u8(33));
        assert_eq!(d.lt, 0xC8);
        assert_eq!(d.rt, 0x3B);
        assert_eq!(d.buttons, logical.buttons.raw());
    }

    #[test]
    fn test_decode_classic10() {
        let logical = sample();
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = logical.pack(ReportMode::Classic10, &mut buf).unwrap();
        assert_eq!(len, 20);

        let d = decode(ReportMode::Classic10, &buf);
        assert_eq!(d.lx, apply(57));
        assert_eq!(d.ly, apply(-90));
        assert_eq!(d.rx, centered_u8(-100));
        assert_eq!(d.ry, centered_u8(33));
        assert_eq!(d.lt, 0xC8);
        assert_eq!(d.rt, 0x3B);
        assert_eq!(d.buttons, logical.buttons.raw());
    }

    #[test]
    fn test_extension_block_follows_core() {
        let logical = sample();
        for mode in [ReportMode::Classic6, ReportMode::Classic8, ReportMode::Classic10] {
            let mut buf = [0u8; MAX_REPORT_SIZE];
            let len = logical.pack(mode, &mut buf).unwrap();
            let ext = &buf[mode.core_len()..len];
            assert_eq!(ext[0], b'R');
            assert_eq!(&ext[1..3], b"GC");
            assert_eq!(&ext[3..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        }
    }

    #[test]
    fn test_neutral_classic6_bytes() {
        let mut buf = [0u8; MAX_REPORT_SIZE];
        ClassicLogical::neutral()
            .pack(ReportMode::Classic6, &mut buf)
            .unwrap();
        // Sticks centred, triggers released, nothing pressed.
        assert_eq!(&buf[..6], &[0xA0, 0x20, 0x10, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 18];
        let logical = ClassicLogical::neutral();
        assert!(logical.pack(ReportMode::Classic6, &mut buf).is_ok());
        assert_eq!(
            logical.pack(ReportMode::Classic8, &mut buf),
            Err(SerializeError::BufferTooSmall)
        );
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn test_pack_to_vec() {
        let vec: heapless::Vec<u8, MAX_REPORT_SIZE> =
            sample().pack_to_vec(ReportMode::Classic8).unwrap();
        assert_eq!(vec.len(), 19);
        assert_eq!(vec[8], b'R');
    }

    fn apply(v: i8) -> u8 {
        crate::curve::apply_curve(v, Curve::V1_5)
    }
}
