//! Runtime configuration and its persisted record.
//!
//! The configuration survives power cycles. It is loaded once at start-up,
//! owned by the poll context, and written back in the same poll whenever a
//! button chord changes it.
//!
//! # Record layout
//!
//! ```text
//! offset  size  field
//! 0       8     magic "CCADAPT1"
//! 8       1     N64 profile id
//! 9       1     N64 curve id
//! 10      1     GameCube profile id
//! 11      1     SNES NES-compat swap (0/1)
//! 12      1     SNES analog D-pad (0/1)
//! 13      1     GameCube curve id
//! ```

use classic_proto::Curve;

/// Marker identifying a valid record.
pub const CONFIG_MAGIC: [u8; 8] = *b"CCADAPT1";

/// Size of the persisted record.
pub const RECORD_LEN: usize = CONFIG_MAGIC.len() + 6;

/// N64 button layout, switchable at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum N64Profile {
    #[default]
    Standard,
    MarioKart,
    Ocarina,
    SmashBros,
    SinAndPunishment,
    OgreBattle,
    FZeroX,
    YoshiStory,
    /// Stick calibration probe; D-pad drives the left stick.
    Test,
}

impl N64Profile {
    /// Decode a persisted id. Unknown ids select [`Self::Standard`].
    #[must_use]
    pub const fn from_id(id: u8) -> Self {
        match id {
            1 => Self::MarioKart,
            2 => Self::Ocarina,
            3 => Self::SmashBros,
            4 => Self::SinAndPunishment,
            5 => Self::OgreBattle,
            6 => Self::FZeroX,
            7 => Self::YoshiStory,
            8 => Self::Test,
            _ => Self::Standard,
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// GameCube button layout, switchable at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GcProfile {
    #[default]
    Standard,
    Snes,
    Zlr,
    AllStarsRacing,
    Dev,
    Extra1,
}

impl GcProfile {
    /// Decode a persisted id. Unknown ids select [`Self::Standard`].
    #[must_use]
    pub const fn from_id(id: u8) -> Self {
        match id {
            1 => Self::Snes,
            2 => Self::Zlr,
            3 => Self::AllStarsRacing,
            4 => Self::Dev,
            5 => Self::Extra1,
            _ => Self::Standard,
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Everything the user can change with button chords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub n64_profile: N64Profile,
    pub n64_curve: Curve,
    pub gc_profile: GcProfile,
    pub gc_curve: Curve,
    /// SNES Y/B act as Classic B/A, like a NES pad.
    pub snes_nes_mode: bool,
    /// SNES D-pad drives the left stick instead of the D-pad buttons.
    pub snes_analog_dpad: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            n64_profile: N64Profile::Standard,
            n64_curve: Curve::V1_5,
            gc_profile: GcProfile::Standard,
            gc_curve: Curve::GameCube,
            snes_nes_mode: false,
            snes_analog_dpad: false,
        }
    }
}

impl Configuration {
    /// Encode as a persisted record.
    #[must_use]
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[..CONFIG_MAGIC.len()].copy_from_slice(&CONFIG_MAGIC);
        record[8] = self.n64_profile.id();
        record[9] = self.n64_curve.id();
        record[10] = self.gc_profile.id();
        record[11] = u8::from(self.snes_nes_mode);
        record[12] = u8::from(self.snes_analog_dpad);
        record[13] = self.gc_curve.id();
        record
    }

    /// Decode a persisted record, or `None` if the magic marker is missing.
    ///
    /// Out-of-range ids decode to id 0.
    #[must_use]
    pub fn from_record(record: &[u8; RECORD_LEN]) -> Option<Self> {
        if record[..CONFIG_MAGIC.len()] != CONFIG_MAGIC {
            return None;
        }
        Some(Self {
            n64_profile: N64Profile::from_id(record[8]),
            n64_curve: Curve::from_id(record[9]),
            gc_profile: GcProfile::from_id(record[10]),
            snes_nes_mode: record[11] != 0,
            snes_analog_dpad: record[12] != 0,
            gc_curve: Curve::from_id(record[13]),
        })
    }
}

/// Error type for configuration storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// The medium could not be read.
    Read,
    /// The medium could not be erased or programmed.
    Write,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read => write!(f, "storage read failed"),
            Self::Write => write!(f, "storage write failed"),
        }
    }
}

/// Non-volatile storage holding one configuration record.
pub trait ConfigStorage {
    /// Read the raw record.
    fn read(&mut self, record: &mut [u8; RECORD_LEN]) -> Result<(), StoreError>;

    /// Replace the raw record.
    fn write(&mut self, record: &[u8; RECORD_LEN]) -> Result<(), StoreError>;
}

/// Load the stored configuration.
///
/// An invalid record is replaced by the defaults, which are saved at once.
///
/// # Errors
///
/// Returns the storage error if the medium cannot be read, or if the
/// defaults cannot be written back.
pub fn load_config<S: ConfigStorage>(storage: &mut S) -> Result<Configuration, StoreError> {
    let mut record = [0u8; RECORD_LEN];
    storage.read(&mut record)?;

    match Configuration::from_record(&record) {
        Some(config) => {
            debug!("configuration loaded: {:?}", config);
            Ok(config)
        }
        None => {
            info!("no valid configuration stored, writing defaults");
            let config = Configuration::default();
            save_config(storage, &config)?;
            Ok(config)
        }
    }
}

/// Persist `config`.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if the medium rejects the record.
pub fn save_config<S: ConfigStorage>(storage: &mut S, config: &Configuration) -> Result<(), StoreError> {
    storage.write(&config.to_record())
}
