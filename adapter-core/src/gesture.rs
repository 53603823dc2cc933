//! Triple-click detection on a single button.
//!
//! Timing is counted in polls, not wall-clock time; at the host's usual
//! 5 ms poll period the gap limit is about 100 ms.

/// Consecutive disagreeing samples needed before the level flips.
pub const DEBOUNCE_POLLS: u8 = 4;

/// Polls without a transition before the tally is discarded.
pub const MAX_GAP_POLLS: u8 = 20;

/// Extra polls the output stays asserted after firing.
pub const HOLD_POLLS: u8 = 20;

/// Level transitions making up three clicks.
pub const TRANSITIONS: u8 = 6;

/// Filters contact bounce out of a raw button level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debounce {
    level: bool,
    pending: u8,
}

impl Debounce {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: false,
            pending: 0,
        }
    }

    /// Feed one raw sample, returning the confirmed level.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw == self.level {
            self.pending = 0;
        } else {
            self.pending += 1;
            if self.pending > DEBOUNCE_POLLS {
                self.level = raw;
                self.pending = 0;
            }
        }
        self.level
    }

    #[must_use]
    pub const fn level(&self) -> bool {
        self.level
    }
}

/// Detects three quick presses and answers with a pulse of
/// `HOLD_POLLS + 1` polls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TripleClick {
    debounce: Debounce,
    last: bool,
    tally: u8,
    ticks: u8,
    hold: u8,
}

impl TripleClick {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            debounce: Debounce::new(),
            last: false,
            tally: 0,
            ticks: 0,
            hold: 0,
        }
    }

    /// Feed the raw button level for this poll.
    pub fn update(&mut self, pressed: bool) -> bool {
        let level = self.debounce.update(pressed);

        if self.hold > 0 {
            self.hold -= 1;
            return true;
        }

        self.ticks += 1;
        if self.ticks > MAX_GAP_POLLS {
            self.tally = 0;
            self.ticks = 0;
            self.last = level;
            return false;
        }

        if level != self.last {
            self.tally += 1;
            self.ticks = 0;
        }

        if self.tally >= TRANSITIONS {
            self.tally = 0;
            self.ticks = 0;
            self.hold = HOLD_POLLS;
            return true;
        }

        self.last = level;
        false
    }
}
