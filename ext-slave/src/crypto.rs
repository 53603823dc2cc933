//! Extension bus cipher.
//!
//! A host that does not disable encryption writes a 10-byte challenge and a
//! 6-byte key into `0x40..0x50`. The key is produced by one of seven
//! algorithms; the slave finds which by recomputing the key for each
//! candidate answer, then derives an additive and a substitutive table of
//! eight bytes each. Register traffic is then transformed per address:
//!
//! ```text
//! host -> slave:  stored = (wire ^ sub[a % 8]) + add[a % 8]
//! slave -> host:  wire   = (stored - add[a % 8]) ^ sub[a % 8]
//! ```
//!
//! Both steps read the substitution boxes and answers from a
//! [`CipherTables`] set.

use crate::registers::{CHALLENGE_ADDR, KEY_ADDR, KEY_AREA_END};
use crate::tables::{CipherTables, ALGORITHM_COUNT};

/// Challenge length in bytes.
pub const CHALLENGE_LEN: usize = (KEY_ADDR - CHALLENGE_ADDR) as usize;
/// Key length in bytes.
pub const KEY_LEN: usize = (KEY_AREA_END - KEY_ADDR) as usize;

/// Challenge and key in algorithm order, as collected from the key area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMaterial {
    pub rand: [u8; CHALLENGE_LEN],
    pub key: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Collect from the 16 register bytes at `0x40..0x50`. Both fields are
    /// stored byte-reversed in the register file.
    #[must_use]
    pub fn from_key_area(area: &[u8; CHALLENGE_LEN + KEY_LEN]) -> Self {
        let mut material = Self::default();
        for i in 0..CHALLENGE_LEN {
            material.rand[CHALLENGE_LEN - 1 - i] = area[i];
        }
        for i in 0..KEY_LEN {
            material.key[KEY_LEN - 1 - i] = area[CHALLENGE_LEN + i];
        }
        material
    }

    /// Inverse of [`Self::from_key_area`].
    #[must_use]
    pub fn to_key_area(&self) -> [u8; CHALLENGE_LEN + KEY_LEN] {
        let mut area = [0; CHALLENGE_LEN + KEY_LEN];
        for i in 0..CHALLENGE_LEN {
            area[i] = self.rand[CHALLENGE_LEN - 1 - i];
        }
        for i in 0..KEY_LEN {
            area[CHALLENGE_LEN + i] = self.key[KEY_LEN - 1 - i];
        }
        area
    }
}

/// Key the host would send for `challenge` if it used algorithm `index`.
///
/// # Panics
///
/// Panics if `index >= 7`.
#[must_use]
pub fn trial_key(
    tables: &CipherTables,
    index: usize,
    rand: &[u8; CHALLENGE_LEN],
) -> [u8; KEY_LEN] {
    let ans = &tables.answers[index];
    let t0: [u8; CHALLENGE_LEN] =
        core::array::from_fn(|i| tables.sboxes[0][usize::from(rand[i])]);
    let step = |a: u8, x: usize, r: usize, s: usize, m: usize| {
        (a ^ t0[x]).rotate_right(u32::from(t0[r] % 8)).wrapping_sub(t0[s]) ^ t0[m]
    };

    [
        step(ans[0], 5, 2, 9, 4),
        step(ans[1], 1, 0, 5, 7),
        step(ans[2], 6, 8, 2, 0),
        step(ans[3], 4, 7, 3, 2),
        step(ans[4], 1, 6, 3, 4),
        step(ans[5], 7, 8, 5, 9),
    ]
}

/// Derived per-address keystream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystream {
    index: u8,
    additive: [u8; 8],
    substitutive: [u8; 8],
}

/// Input of the first box for one table entry. The paired `usize` is the
/// challenge byte fed to the second box.
enum Src {
    Key(usize),
    Rand(usize),
}

const ADDITIVE: [(Src, usize); 8] = [
    (Src::Key(4), 3),
    (Src::Key(2), 5),
    (Src::Key(5), 7),
    (Src::Key(0), 2),
    (Src::Key(1), 4),
    (Src::Key(3), 9),
    (Src::Rand(0), 6),
    (Src::Rand(1), 8),
];

const SUBSTITUTIVE: [(Src, usize); 8] = [
    (Src::Key(0), 1),
    (Src::Key(5), 4),
    (Src::Key(3), 0),
    (Src::Key(2), 9),
    (Src::Key(4), 7),
    (Src::Key(1), 8),
    (Src::Rand(3), 5),
    (Src::Rand(2), 6),
];

impl Keystream {
    /// Recover the algorithm index and build the tables.
    ///
    /// Returns `None` when no candidate reproduces the key; the bus then
    /// stays unencrypted.
    #[must_use]
    pub fn derive(tables: &CipherTables, material: &KeyMaterial) -> Option<Self> {
        let index = (0..ALGORITHM_COUNT)
            .find(|&i| trial_key(tables, i, &material.rand) == material.key)?;
        let first = &tables.sboxes[index + 1];
        let second = &tables.sboxes[index + 2];

        let build = |table: &[(Src, usize); 8]| -> [u8; 8] {
            core::array::from_fn(|n| {
                let (src, r) = &table[n];
                let x = match *src {
                    Src::Key(k) => material.key[k],
                    Src::Rand(k) => material.rand[k],
                };
                first[usize::from(x)] ^ second[usize::from(material.rand[*r])]
            })
        };

        Some(Self {
            index: index as u8,
            additive: build(&ADDITIVE),
            substitutive: build(&SUBSTITUTIVE),
        })
    }

    /// Algorithm index recovered from the key.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Transform a byte received from the host before storing it at `addr`.
    #[inline]
    #[must_use]
    pub fn decrypt(&self, addr: u8, wire: u8) -> u8 {
        let slot = usize::from(addr % 8);
        (wire ^ self.substitutive[slot]).wrapping_add(self.additive[slot])
    }

    /// Transform the byte stored at `addr` before sending it to the host.
    #[inline]
    #[must_use]
    pub fn encrypt(&self, addr: u8, stored: u8) -> u8 {
        let slot = usize::from(addr % 8);
        stored.wrapping_sub(self.additive[slot]) ^ self.substitutive[slot]
    }
}
