//! Substitution boxes and candidate answers for the extension cipher.
//!
//! Box 0 maps the host challenge for key recovery; boxes `idx + 1` and
//! `idx + 2` build the keystream once algorithm `idx` has been identified.
//!
//! The tables are not part of this crate. Firmware that wants to answer
//! hosts which keep encryption on supplies them as a [`TABLES_LEN`]-byte
//! blob, laid out as the nine 256-byte boxes in order followed by the seven
//! 6-byte answers:
//!
//! ```text
//! 0x000  box 0
//! 0x100  box 1
//!   ...
//! 0x800  box 8
//! 0x900  answer 0 (6 bytes)
//!   ...
//! 0x924  answer 6
//! ```

/// Number of candidate algorithms tried during key recovery.
pub const ALGORITHM_COUNT: usize = 7;

/// Number of substitution boxes.
pub const SBOX_COUNT: usize = ALGORITHM_COUNT + 2;

/// Length of one candidate answer.
pub const ANSWER_LEN: usize = 6;

/// Size of a serialized table set.
pub const TABLES_LEN: usize = SBOX_COUNT * 256 + ALGORITHM_COUNT * ANSWER_LEN;

/// Substitution boxes and candidate answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherTables {
    pub sboxes: [[u8; 256]; SBOX_COUNT],
    pub answers: [[u8; ANSWER_LEN]; ALGORITHM_COUNT],
}

impl CipherTables {
    /// Unpack a table blob. Usable in a `static` initializer together with
    /// `include_bytes!`.
    #[must_use]
    pub const fn from_blob(blob: &[u8; TABLES_LEN]) -> Self {
        let mut tables = Self {
            sboxes: [[0; 256]; SBOX_COUNT],
            answers: [[0; ANSWER_LEN]; ALGORITHM_COUNT],
        };

        let mut i = 0;
        while i < SBOX_COUNT * 256 {
            tables.sboxes[i / 256][i % 256] = blob[i];
            i += 1;
        }
        let mut j = 0;
        while j < ALGORITHM_COUNT * ANSWER_LEN {
            tables.answers[j / ANSWER_LEN][j % ANSWER_LEN] = blob[i + j];
            j += 1;
        }
        tables
    }
}

/// Deterministic table set for exercising the cipher in tests.
#[cfg(test)]
pub(crate) static TEST_TABLES: CipherTables = test_tables();

#[cfg(test)]
const fn test_tables() -> CipherTables {
    let mut tables = CipherTables {
        sboxes: [[0; 256]; SBOX_COUNT],
        answers: [[0; ANSWER_LEN]; ALGORITHM_COUNT],
    };
    let mut n = 0;
    while n < SBOX_COUNT {
        let mask = 0x5A + 0x11 * n as u8;
        let mut x = 0;
        while x < 256 {
            tables.sboxes[n][x] = x as u8 ^ mask;
            x += 1;
        }
        n += 1;
    }
    let mut i = 0;
    while i < ALGORITHM_COUNT {
        let mut j = 0;
        while j < ANSWER_LEN {
            tables.answers[i][j] = (0x10 * i + 3 * j + 1) as u8;
            j += 1;
        }
        i += 1;
    }
    tables
}
