/// Runtime tunables for the session.
///
/// A plain value passed by reference into the operations that consult it;
/// there is no global configuration state. Setters validate their input and
/// leave the current value untouched when it is rejected, so a `Settings` is
/// always internally consistent.
///
/// ```
/// use bingo_rs::settings::Settings;
///
/// let mut s = Settings::default();
/// s.set_normal_card_cost(0.5);
/// s.set_saved_pot_percentage(1.7); // clamps
/// assert_eq!(s.normal_card_cost(), 0.5);
/// assert_eq!(s.saved_pot_percentage(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    normal_card_cost: f64,
    fullhouse_card_cost: f64,
    saved_pot_percentage: f64,
    max_players: u32,
    allow_multi_winners: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            normal_card_cost: 0.25,
            // Zero means "unset": a full-house match pays from the saved pot
            // and cards for it cost nothing unless configured otherwise.
            fullhouse_card_cost: 0.0,
            saved_pot_percentage: 0.15,
            max_players: 512,
            allow_multi_winners: true,
        }
    }
}

impl Settings {
    /// Cost of a single card in a normal match.
    pub fn normal_card_cost(&self) -> f64 {
        self.normal_card_cost
    }

    /// Negative costs are rejected; the previous value stays.
    pub fn set_normal_card_cost(&mut self, cost: f64) {
        if cost >= 0.0 {
            self.normal_card_cost = cost;
        }
    }

    /// Cost of a single card in a full-house match; `<= 0` means unset.
    pub fn fullhouse_card_cost(&self) -> f64 {
        self.fullhouse_card_cost
    }

    pub fn set_fullhouse_card_cost(&mut self, cost: f64) {
        if cost >= 0.0 {
            self.fullhouse_card_cost = cost;
        }
    }

    /// Fraction of a normal match's pot diverted into the saved pot.
    pub fn saved_pot_percentage(&self) -> f64 {
        self.saved_pot_percentage
    }

    /// Clamped into `[0, 1]`.
    pub fn set_saved_pot_percentage(&mut self, pct: f64) {
        self.saved_pot_percentage = pct.clamp(0.0, 1.0);
    }

    /// Roster capacity.
    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    /// Zero is rejected; the roster must be able to hold someone.
    pub fn set_max_players(&mut self, maxp: u32) {
        if maxp > 0 {
            self.max_players = maxp;
        }
    }

    /// Whether a normal match may record more than one winner.
    pub fn allow_multi_winners(&self) -> bool {
        self.allow_multi_winners
    }

    pub fn set_allow_multi_winners(&mut self, allow: bool) {
        self.allow_multi_winners = allow;
    }
}
