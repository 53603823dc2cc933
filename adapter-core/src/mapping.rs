//! Native report to Classic Controller translation.
//!
//! [`MappingEngine::translate`] is called once per poll. It applies the
//! family's button table (selected by profile for N64 and GameCube pads),
//! places sticks and triggers, adds Home on a triple click of Start and
//! finally looks for configuration chords.
//!
//! Chords are exact matches against the family's full button mask, so
//! holding one extra button cancels them. They are ignored for the rest of
//! a session that started with Start held.

use classic_proto::{ClassicButtons, ClassicLogical, Curve, Stick, StickShaping};

use crate::config::{Configuration, GcProfile, N64Profile};
use crate::gesture::TripleClick;
use crate::native::{
    GcButtons, GcReport, GenericButtons, GenericReport, N64Buttons, N64Report, NativeButtons,
    NativeReport, NesButtons, NesReport, SnesButtons, SnesReport,
};

/// Right stick deflection produced by N64 C buttons and the SNES analog D-pad.
pub const DIGITAL_DEFLECTION: i8 = 100;

/// C-stick travel past which a GameCube chord reads it as pushed.
pub const C_STICK_CHORD_THRESHOLD: i8 = 64;

/// Output of one translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Translation {
    pub logical: ClassicLogical,
    /// A chord changed the configuration; it must be saved this cycle.
    pub config_changed: bool,
}

type ButtonTable<B> = &'static [(B, ClassicButtons)];

const ZL_ZR: ClassicButtons = ClassicButtons::ZL.union(ClassicButtons::ZR);
const TL_TR: ClassicButtons = ClassicButtons::TRIGGER_LEFT.union(ClassicButtons::TRIGGER_RIGHT);
const X_Y: ClassicButtons = ClassicButtons::X.union(ClassicButtons::Y);

const SNES_COMMON: ButtonTable<SnesButtons> = &[
    (SnesButtons::SELECT, ClassicButtons::MINUS),
    (SnesButtons::START, ClassicButtons::PLUS),
    (SnesButtons::L, ClassicButtons::TRIGGER_LEFT),
    (SnesButtons::R, ClassicButtons::TRIGGER_RIGHT),
];

const SNES_DIRECT: ButtonTable<SnesButtons> = &[
    (SnesButtons::B, ClassicButtons::B),
    (SnesButtons::Y, ClassicButtons::Y),
    (SnesButtons::A, ClassicButtons::A),
    (SnesButtons::X, ClassicButtons::X),
];

const SNES_NES_COMPAT: ButtonTable<SnesButtons> = &[
    (SnesButtons::Y, ClassicButtons::B),
    (SnesButtons::B, ClassicButtons::A),
];

const SNES_DPAD: ButtonTable<SnesButtons> = &[
    (SnesButtons::UP, ClassicButtons::DPAD_UP),
    (SnesButtons::DOWN, ClassicButtons::DPAD_DOWN),
    (SnesButtons::LEFT, ClassicButtons::DPAD_LEFT),
    (SnesButtons::RIGHT, ClassicButtons::DPAD_RIGHT),
];

const NES_TABLE: ButtonTable<NesButtons> = &[
    (NesButtons::A, ClassicButtons::A),
    (NesButtons::B, ClassicButtons::B),
    (NesButtons::SELECT, ClassicButtons::MINUS),
    (NesButtons::START, ClassicButtons::PLUS),
    (NesButtons::UP, ClassicButtons::DPAD_UP),
    (NesButtons::DOWN, ClassicButtons::DPAD_DOWN),
    (NesButtons::LEFT, ClassicButtons::DPAD_LEFT),
    (NesButtons::RIGHT, ClassicButtons::DPAD_RIGHT),
];

const GENERIC_TABLE: ButtonTable<GenericButtons> = &[
    (GenericButtons::A, ClassicButtons::Y),
    (GenericButtons::B, ClassicButtons::B),
    (GenericButtons::C, ClassicButtons::A),
    (GenericButtons::X, ClassicButtons::TRIGGER_LEFT),
    (GenericButtons::Y, ClassicButtons::X),
    (GenericButtons::Z, ClassicButtons::TRIGGER_RIGHT),
    (GenericButtons::START, ClassicButtons::PLUS),
    (GenericButtons::MODE, ClassicButtons::MINUS),
    (GenericButtons::UP, ClassicButtons::DPAD_UP),
    (GenericButtons::DOWN, ClassicButtons::DPAD_DOWN),
    (GenericButtons::LEFT, ClassicButtons::DPAD_LEFT),
    (GenericButtons::RIGHT, ClassicButtons::DPAD_RIGHT),
];

const N64_COMMON: ButtonTable<N64Buttons> = &[
    (N64Buttons::A, ClassicButtons::A),
    (N64Buttons::B, ClassicButtons::B),
    (N64Buttons::START, ClassicButtons::PLUS),
];

const N64_DPAD: ButtonTable<N64Buttons> = &[
    (N64Buttons::UP, ClassicButtons::DPAD_UP),
    (N64Buttons::DOWN, ClassicButtons::DPAD_DOWN),
    (N64Buttons::LEFT, ClassicButtons::DPAD_LEFT),
    (N64Buttons::RIGHT, ClassicButtons::DPAD_RIGHT),
];

const N64_STANDARD: ButtonTable<N64Buttons> = &[
    (N64Buttons::Z, ZL_ZR),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::L, ClassicButtons::TRIGGER_LEFT),
];

const N64_MARIO_KART: ButtonTable<N64Buttons> = &[
    (N64Buttons::Z, ClassicButtons::TRIGGER_LEFT),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::L, ZL_ZR),
];

const N64_OCARINA: ButtonTable<N64Buttons> = &[
    (N64Buttons::Z, ClassicButtons::TRIGGER_LEFT),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::L, ClassicButtons::DPAD_DOWN),
];

const N64_SMASH_BROS: ButtonTable<N64Buttons> = &[
    (N64Buttons::L, ClassicButtons::DPAD_DOWN),
    (N64Buttons::R, ZL_ZR),
    (N64Buttons::Z, TL_TR),
    (N64Buttons::C_LEFT, ClassicButtons::Y),
    (N64Buttons::C_DOWN, ClassicButtons::X),
];

const N64_SIN_AND_PUNISHMENT: ButtonTable<N64Buttons> = &[
    (N64Buttons::L, ZL_ZR),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::Z, ClassicButtons::TRIGGER_LEFT),
    (N64Buttons::C_LEFT, ClassicButtons::Y),
    (N64Buttons::C_RIGHT, ClassicButtons::X),
];

const N64_OGRE_BATTLE: ButtonTable<N64Buttons> = &[
    (N64Buttons::L, ClassicButtons::TRIGGER_LEFT),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::Z, ClassicButtons::TRIGGER_LEFT),
];

const N64_FZERO_X: ButtonTable<N64Buttons> = &[
    (N64Buttons::L, ClassicButtons::DPAD_RIGHT),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::Z, ClassicButtons::TRIGGER_LEFT),
    (N64Buttons::C_DOWN, ClassicButtons::X),
    (N64Buttons::C_LEFT, ClassicButtons::Y),
    (N64Buttons::C_RIGHT, ZL_ZR),
];

const N64_YOSHI_STORY: ButtonTable<N64Buttons> = &[
    (N64Buttons::L, ZL_ZR),
    (N64Buttons::R, ClassicButtons::TRIGGER_RIGHT),
    (N64Buttons::Z, X_Y),
];

/// Wii64 menu: every C button plus D-left and Z.
const N64_MENU_COMBO: N64Buttons = N64Buttons(N64Buttons::C_ALL.0 | N64Buttons::LEFT.0 | N64Buttons::Z.0);

const GC_COMMON: ButtonTable<GcButtons> = &[
    (GcButtons::START, ClassicButtons::PLUS),
    (GcButtons::UP, ClassicButtons::DPAD_UP),
    (GcButtons::DOWN, ClassicButtons::DPAD_DOWN),
    (GcButtons::LEFT, ClassicButtons::DPAD_LEFT),
    (GcButtons::RIGHT, ClassicButtons::DPAD_RIGHT),
];

const GC_STANDARD: ButtonTable<GcButtons> = &[
    (GcButtons::A, ClassicButtons::A),
    (GcButtons::B, ClassicButtons::B),
    (GcButtons::X, ClassicButtons::X),
    (GcButtons::Y, ClassicButtons::Y),
    (GcButtons::Z, ZL_ZR),
    (GcButtons::L, ClassicButtons::TRIGGER_LEFT),
    (GcButtons::R, ClassicButtons::TRIGGER_RIGHT),
];

const GC_SNES: ButtonTable<GcButtons> = &[
    (GcButtons::B, ClassicButtons::Y),
    (GcButtons::A, ClassicButtons::B),
    (GcButtons::Y, ClassicButtons::X),
    (GcButtons::X, ClassicButtons::A),
    (GcButtons::Z, ClassicButtons::MINUS),
    (GcButtons::L, ClassicButtons::TRIGGER_LEFT),
    (GcButtons::R, ClassicButtons::TRIGGER_RIGHT),
];

const GC_ZLR: ButtonTable<GcButtons> = &[
    (GcButtons::A, ClassicButtons::A),
    (GcButtons::B, ClassicButtons::B),
    (GcButtons::X, ClassicButtons::X),
    (GcButtons::Y, ClassicButtons::Y),
    (GcButtons::Z, ClassicButtons::TRIGGER_RIGHT),
    (GcButtons::L, ClassicButtons::ZL),
    (GcButtons::R, ClassicButtons::ZR),
];

// X and Z both use items.
const GC_ALL_STARS_RACING: ButtonTable<GcButtons> = &[
    (GcButtons::A, ClassicButtons::ZR),
    (GcButtons::B, ClassicButtons::A),
    (GcButtons::X, ClassicButtons::B),
    (GcButtons::Y, ClassicButtons::X),
    (GcButtons::Z, ClassicButtons::B),
    (GcButtons::L, ClassicButtons::ZL),
    (GcButtons::R, ClassicButtons::Y),
];

const GC_DEV: ButtonTable<GcButtons> = &[
    (GcButtons::A, ClassicButtons::B),
    (GcButtons::B, ClassicButtons::Y),
    (GcButtons::X, ClassicButtons::A),
    (GcButtons::Y, ClassicButtons::X),
    (GcButtons::L, ClassicButtons::TRIGGER_LEFT),
    (GcButtons::R, ClassicButtons::TRIGGER_RIGHT),
    (GcButtons::Z, ClassicButtons::ZR),
];

const GC_EXTRA1: ButtonTable<GcButtons> = &[
    (GcButtons::A, ClassicButtons::A),
    (GcButtons::B, ClassicButtons::X),
    (GcButtons::X, ClassicButtons::TRIGGER_RIGHT),
    (GcButtons::Y, ClassicButtons::B),
    (GcButtons::L, ClassicButtons::ZL),
    (GcButtons::R, ClassicButtons::ZR),
    (GcButtons::Z, ClassicButtons::MINUS),
];

const GC_FACE: GcButtons = GcButtons(GcButtons::A.0 | GcButtons::B.0 | GcButtons::X.0 | GcButtons::Y.0);

const GC_PROFILE_CHORDS: &[(GcButtons, GcProfile)] = &[
    (GcButtons(GC_FACE.0 | GcButtons::UP.0), GcProfile::Standard),
    (GcButtons(GC_FACE.0 | GcButtons::DOWN.0), GcProfile::Snes),
    (GcButtons(GC_FACE.0 | GcButtons::LEFT.0), GcProfile::Zlr),
    (GcButtons(GC_FACE.0 | GcButtons::RIGHT.0), GcProfile::AllStarsRacing),
];

/// Needs the C-stick pushed left (Dev) or right (Extra1) as well.
const GC_STICK_CHORD: GcButtons = GcButtons(GC_FACE.0 | GcButtons::Z.0);

const N64_CHORD_BASE: u16 = N64Buttons::L.0 | N64Buttons::R.0 | N64Buttons::Z.0;

const N64_PROFILE_CHORDS: &[(N64Buttons, N64Profile)] = &[
    (N64Buttons(N64_CHORD_BASE | N64Buttons::UP.0), N64Profile::Standard),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::DOWN.0), N64Profile::MarioKart),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::LEFT.0), N64Profile::Ocarina),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::RIGHT.0), N64Profile::SmashBros),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::C_UP.0), N64Profile::SinAndPunishment),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::C_DOWN.0), N64Profile::OgreBattle),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::C_LEFT.0), N64Profile::FZeroX),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::C_RIGHT.0), N64Profile::YoshiStory),
];

const N64_CURVE_CHORDS: &[(N64Buttons, Curve)] = &[
    (N64Buttons(N64_CHORD_BASE | N64Buttons::A.0), Curve::V1_5),
    (N64Buttons(N64_CHORD_BASE | N64Buttons::B.0), Curve::V1_4),
];

const SNES_CHORD_BASE: u16 =
    SnesButtons::START.0 | SnesButtons::SELECT.0 | SnesButtons::L.0 | SnesButtons::R.0;

/// `(nes_mode, analog_dpad)` selected by each SNES chord.
const SNES_CHORDS: &[(SnesButtons, (bool, bool))] = &[
    (SnesButtons(SNES_CHORD_BASE | SnesButtons::UP.0), (false, false)),
    (SnesButtons(SNES_CHORD_BASE | SnesButtons::DOWN.0), (true, false)),
    (SnesButtons(SNES_CHORD_BASE | SnesButtons::LEFT.0), (false, true)),
];

/// What an N64 C button does in a given profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CAction {
    /// Push the right stick toward that direction.
    Deflect,
    /// Taken by the profile's button table.
    Button,
    Ignore,
}

/// C actions in the order up, down, left, right.
const fn c_actions(profile: N64Profile) -> [CAction; 4] {
    use CAction::{Button, Deflect, Ignore};

    match profile {
        N64Profile::Standard
        | N64Profile::MarioKart
        | N64Profile::Ocarina
        | N64Profile::OgreBattle
        | N64Profile::YoshiStory => [Deflect; 4],
        N64Profile::SmashBros => [Deflect, Button, Button, Deflect],
        N64Profile::SinAndPunishment => [Ignore, Ignore, Button, Button],
        N64Profile::FZeroX => [Ignore, Button, Button, Button],
        // The probe owns the C buttons.
        N64Profile::Test => [Ignore; 4],
    }
}

const fn n64_table(profile: N64Profile) -> ButtonTable<N64Buttons> {
    match profile {
        N64Profile::Standard | N64Profile::Test => N64_STANDARD,
        N64Profile::MarioKart => N64_MARIO_KART,
        N64Profile::Ocarina => N64_OCARINA,
        N64Profile::SmashBros => N64_SMASH_BROS,
        N64Profile::SinAndPunishment => N64_SIN_AND_PUNISHMENT,
        N64Profile::OgreBattle => N64_OGRE_BATTLE,
        N64Profile::FZeroX => N64_FZERO_X,
        N64Profile::YoshiStory => N64_YOSHI_STORY,
    }
}

const fn gc_table(profile: GcProfile) -> ButtonTable<GcButtons> {
    match profile {
        GcProfile::Standard => GC_STANDARD,
        GcProfile::Snes => GC_SNES,
        GcProfile::Zlr => GC_ZLR,
        GcProfile::AllStarsRacing => GC_ALL_STARS_RACING,
        GcProfile::Dev => GC_DEV,
        GcProfile::Extra1 => GC_EXTRA1,
    }
}

fn map_buttons<B: NativeButtons>(pressed: B, table: ButtonTable<B>) -> ClassicButtons {
    table
        .iter()
        .filter(|(native, _)| pressed.contains(*native))
        .fold(ClassicButtons::NONE, |acc, (_, classic)| acc | *classic)
}

fn find_chord<B: NativeButtons, T: Copy>(pressed: B, chords: &[(B, T)]) -> Option<T> {
    chords
        .iter()
        .find(|(mask, _)| pressed.is_exactly(*mask))
        .map(|(_, value)| *value)
}

/// Calibration probe driven by the C buttons in the N64 test profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TestProbe {
    pub x: i8,
    pub y: i8,
    held: N64Buttons,
}

impl TestProbe {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            held: N64Buttons::NONE,
        }
    }

    /// Step the probe once per C button press.
    pub fn update(&mut self, buttons: N64Buttons) {
        let pressed = N64Buttons(buttons.0 & N64Buttons::C_ALL.0 & !self.held.0);
        self.held = N64Buttons(buttons.0 & N64Buttons::C_ALL.0);

        if pressed.contains(N64Buttons::C_UP) {
            self.y = self.y.wrapping_add(1);
        }
        if pressed.contains(N64Buttons::C_DOWN) {
            self.y = self.y.wrapping_sub(1);
        }
        if pressed.contains(N64Buttons::C_LEFT) {
            self.x = self.x.wrapping_add(1);
        }
        if pressed.contains(N64Buttons::C_RIGHT) {
            self.x = self.x.wrapping_sub(1);
        }
    }
}

/// Stateful translator from native reports to [`ClassicLogical`].
///
/// Holds the triple-click detector for Start, the session lock and the
/// test-profile probe. The configuration itself is passed in by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MappingEngine {
    home: TripleClick,
    first_poll: bool,
    config_locked: bool,
    probe: TestProbe,
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            home: TripleClick::new(),
            first_poll: true,
            config_locked: false,
            probe: TestProbe::new(),
        }
    }

    /// Start a new controller session. Call when a controller is (re)acquired.
    pub fn begin_session(&mut self) {
        self.first_poll = true;
        self.config_locked = false;
    }

    /// Whether chords are ignored for the current session.
    #[must_use]
    pub const fn config_locked(&self) -> bool {
        self.config_locked
    }

    #[must_use]
    pub const fn probe(&self) -> &TestProbe {
        &self.probe
    }

    /// Translate one native report.
    ///
    /// Chords may rewrite `config`; [`Translation::config_changed`] is set
    /// only when a value actually changed.
    pub fn translate(&mut self, report: &NativeReport, config: &mut Configuration) -> Translation {
        let mut logical = ClassicLogical::neutral();
        logical.controller_id = report.family().controller_id();
        logical.set_raw(report.raw());

        let start = start_pressed(report);
        if self.first_poll {
            self.first_poll = false;
            if start {
                info!("start held at session start, configuration locked");
                self.config_locked = true;
            }
        }

        let before = *config;
        match report {
            NativeReport::None => {}
            NativeReport::Snes(r) => self.map_snes(r, config, &mut logical),
            NativeReport::Nes(r) => map_nes(r, &mut logical),
            NativeReport::N64(r) => self.map_n64(r, config, &mut logical),
            NativeReport::GameCube(r) => self.map_gc(r, config, &mut logical),
            NativeReport::Generic(r) => map_generic(r, &mut logical),
        }

        if self.home.update(start) {
            logical.buttons |= ClassicButtons::HOME;
        }
        logical.saturate_digital_triggers();

        let config_changed = *config != before;
        if config_changed {
            info!("configuration changed: {:?}", config);
        }

        Translation {
            logical,
            config_changed,
        }
    }

    fn map_snes(&self, r: &SnesReport, config: &mut Configuration, out: &mut ClassicLogical) {
        let pressed = r.buttons;

        let face = if config.snes_nes_mode {
            SNES_NES_COMPAT
        } else {
            SNES_DIRECT
        };
        out.buttons = map_buttons(pressed, face) | map_buttons(pressed, SNES_COMMON);

        if config.snes_analog_dpad {
            out.left_stick = dpad_stick(
                pressed.contains(SnesButtons::UP),
                pressed.contains(SnesButtons::DOWN),
                pressed.contains(SnesButtons::LEFT),
                pressed.contains(SnesButtons::RIGHT),
            );
        } else {
            out.buttons |= map_buttons(pressed, SNES_DPAD);
        }

        if self.config_locked {
            return;
        }
        if let Some((nes_mode, analog_dpad)) = find_chord(pressed, SNES_CHORDS) {
            config.snes_nes_mode = nes_mode;
            config.snes_analog_dpad = analog_dpad;
        }
    }

    fn map_n64(&mut self, r: &N64Report, config: &mut Configuration, out: &mut ClassicLogical) {
        let pressed = r.buttons;
        let profile = config.n64_profile;

        out.buttons = map_buttons(pressed, N64_COMMON) | map_buttons(pressed, n64_table(profile));
        if profile != N64Profile::Test {
            out.buttons |= map_buttons(pressed, N64_DPAD);
        }

        if matches!(profile, N64Profile::Standard | N64Profile::Test) && pressed.contains(N64_MENU_COMBO) {
            out.buttons |= X_Y;
        }

        let [up, down, left, right] = c_actions(profile);
        let deflect = |action: CAction, button: N64Buttons| action == CAction::Deflect && pressed.contains(button);
        if deflect(up, N64Buttons::C_UP) {
            out.right_stick.y = DIGITAL_DEFLECTION;
        }
        if deflect(down, N64Buttons::C_DOWN) {
            out.right_stick.y = -DIGITAL_DEFLECTION;
        }
        if deflect(left, N64Buttons::C_LEFT) {
            out.right_stick.x = -DIGITAL_DEFLECTION;
        }
        if deflect(right, N64Buttons::C_RIGHT) {
            out.right_stick.x = DIGITAL_DEFLECTION;
        }

        if profile == N64Profile::Test {
            self.probe.update(pressed);
            out.shaping = StickShaping::Offset;
            if pressed.contains(N64Buttons::UP) {
                out.left_stick.y = self.probe.y;
            }
            if pressed.contains(N64Buttons::DOWN) {
                out.left_stick.y = self.probe.y.wrapping_neg();
            }
            if pressed.contains(N64Buttons::LEFT) {
                out.left_stick.x = self.probe.x;
            }
            if pressed.contains(N64Buttons::RIGHT) {
                out.left_stick.x = self.probe.x.wrapping_neg();
            }
        } else {
            out.shaping = StickShaping::Curve(config.n64_curve);
            out.left_stick = r.stick;
        }

        if self.config_locked {
            return;
        }
        if let Some(profile) = find_chord(pressed, N64_PROFILE_CHORDS) {
            config.n64_profile = profile;
        } else if let Some(curve) = find_chord(pressed, N64_CURVE_CHORDS) {
            config.n64_curve = curve;
        }
    }

    fn map_gc(&self, r: &GcReport, config: &mut Configuration, out: &mut ClassicLogical) {
        let pressed = r.buttons;

        out.buttons = map_buttons(pressed, gc_table(config.gc_profile)) | map_buttons(pressed, GC_COMMON);
        out.shaping = StickShaping::Curve(config.gc_curve);
        out.left_stick = r.stick;
        out.right_stick = r.c_stick;
        out.left_trigger = r.left_trigger;
        out.right_trigger = r.right_trigger;

        if self.config_locked {
            return;
        }
        if let Some(profile) = find_chord(pressed, GC_PROFILE_CHORDS) {
            config.gc_profile = profile;
        } else if pressed.is_exactly(GC_STICK_CHORD) {
            if r.c_stick.x < -C_STICK_CHORD_THRESHOLD {
                config.gc_profile = GcProfile::Dev;
            } else if r.c_stick.x > C_STICK_CHORD_THRESHOLD {
                config.gc_profile = GcProfile::Extra1;
            }
        }
    }
}

fn map_nes(r: &NesReport, out: &mut ClassicLogical) {
    out.buttons = map_buttons(r.buttons, NES_TABLE);
}

fn map_generic(r: &GenericReport, out: &mut ClassicLogical) {
    out.buttons = map_buttons(r.buttons, GENERIC_TABLE);
}

/// Later directions win when opposite ones are held together.
fn dpad_stick(up: bool, down: bool, left: bool, right: bool) -> Stick {
    let mut stick = Stick::NEUTRAL;
    if up {
        stick.y = DIGITAL_DEFLECTION;
    }
    if down {
        stick.y = -DIGITAL_DEFLECTION;
    }
    if left {
        stick.x = -DIGITAL_DEFLECTION;
    }
    if right {
        stick.x = DIGITAL_DEFLECTION;
    }
    stick
}

fn start_pressed(report: &NativeReport) -> bool {
    match report {
        NativeReport::None => false,
        NativeReport::Snes(r) => r.buttons.contains(SnesButtons::START),
        NativeReport::Nes(r) => r.buttons.contains(NesButtons::START),
        NativeReport::N64(r) => r.buttons.contains(N64Buttons::START),
        NativeReport::GameCube(r) => r.buttons.contains(GcButtons::START),
        NativeReport::Generic(r) => r.buttons.contains(GenericButtons::START),
    }
}
