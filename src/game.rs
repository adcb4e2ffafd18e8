use crate::ledger::Accounting;
use crate::payout;
use crate::roster::{Player, Roster};
use crate::settings::Settings;

/// How the match is won and how its pot is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameMode {
    /// Ordinary win conditions (line/diagonal/corners); skims a configured
    /// percentage of the pot into the saved pot.
    Normal,
    /// Pays the accumulated saved pot plus this match's own pot, draining
    /// both when there is at least one winner.
    FullHouse,
}

impl GameMode {
    /// Stable numeric code used in the match-history records.
    pub const fn code(self) -> u8 {
        match self {
            GameMode::Normal => 1,
            GameMode::FullHouse => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::FullHouse => "Full House",
        }
    }
}

/// Upper bound on recorded winners per match.
pub const MAX_WINNERS: usize = 64;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StartError {
    #[error("a match is already active")]
    AlreadyActive,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WinnerError {
    #[error("no active match")]
    Inactive,
    #[error("multi-winner is disabled and a winner is already recorded")]
    MultiWinnerDisabled,
    #[error("winner list is full ({MAX_WINNERS} winners)")]
    WinnersFull,
    #[error("player {0} is already a winner")]
    Duplicate(u32),
    #[error("player {0} not found")]
    PlayerNotFound(u32),
    #[error("player {0} bought no cards this match")]
    DidNotParticipate(u32),
}

/// A single bingo match: buy-ins against a pot, a winner list, and the
/// end/cancel transitions that settle or refund it.
///
/// Two states, inactive and active. `start` is the only way in and rejects a
/// second call while active; `end` and `cancel` are the only ways out and are
/// no-ops when inactive. Card purchases deliberately carry no solvency check
/// of their own (the caller pre-checks `balance >= cost`), so a purchase
/// invoked without that check drives the balance negative rather than fail.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    mode: GameMode,
    /// Per-card price, fixed for the match's duration at start time.
    card_cost: f64,
    pot: f64,
    saved_for_fullhouse: f64,
    match_number: u32,
    winners: Vec<u32>,
    active: bool,
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl Match {
    /// An inactive match slot; call `start` to begin play.
    pub fn new() -> Self {
        Self {
            mode: GameMode::Normal,
            card_cost: 0.0,
            pot: 0.0,
            saved_for_fullhouse: 0.0,
            match_number: 0,
            winners: Vec::new(),
            active: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn card_cost(&self) -> f64 {
        self.card_cost
    }

    pub fn pot(&self) -> f64 {
        self.pot
    }

    /// Amount skimmed for the saved pot at normal-match end; 0 until then.
    pub fn saved_for_fullhouse(&self) -> f64 {
        self.saved_for_fullhouse
    }

    /// Sequence number assigned at start (ledger match count + 1).
    pub fn match_number(&self) -> u32 {
        self.match_number
    }

    /// Recorded winner ids, in insertion order.
    pub fn winners(&self) -> &[u32] {
        &self.winners
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begins a match, resolving the card cost and resetting per-match state.
    ///
    /// A positive `card_cost_override` wins over the configured cost. The
    /// configured full-house cost may be unset (`<= 0`), which means cards
    /// are free and the payout rides on the accumulated saved pot.
    pub fn start(
        &mut self,
        mode: GameMode,
        card_cost_override: f64,
        settings: &Settings,
        ledger: &Accounting,
    ) -> Result<(), StartError> {
        if self.active {
            return Err(StartError::AlreadyActive);
        }
        self.mode = mode;
        self.card_cost = if card_cost_override > 0.0 {
            card_cost_override
        } else {
            match mode {
                GameMode::Normal => settings.normal_card_cost(),
                GameMode::FullHouse => settings.fullhouse_card_cost(),
            }
        };
        self.pot = 0.0;
        self.saved_for_fullhouse = 0.0;
        self.match_number = ledger.total_matches() + 1;
        self.winners.clear();
        self.active = true;
        Ok(())
    }

    /// Buys `count` cards for `player` at the match's card cost.
    ///
    /// No-op when inactive or `count` is 0. Debits the player and credits the
    /// pot unconditionally; solvency is the caller's pre-check.
    pub fn buy_cards(&mut self, player: &mut Player, count: u32) {
        if !self.active || count == 0 {
            return;
        }
        let cost = self.card_cost * f64::from(count);
        player.balance -= cost;
        player.cards_owned += count;
        player.lifetime_cards += count;
        player.total_spent += cost;
        self.pot += cost;
    }

    /// Records a winner. Checks run in a fixed precedence order: active
    /// match, multi-winner setting (normal mode only), winner capacity,
    /// duplicate id, player existence, participation.
    pub fn add_winner(
        &mut self,
        roster: &Roster,
        player_id: u32,
        settings: &Settings,
    ) -> Result<(), WinnerError> {
        if !self.active {
            return Err(WinnerError::Inactive);
        }
        if self.mode != GameMode::FullHouse
            && !settings.allow_multi_winners()
            && !self.winners.is_empty()
        {
            return Err(WinnerError::MultiWinnerDisabled);
        }
        if self.winners.len() >= MAX_WINNERS {
            return Err(WinnerError::WinnersFull);
        }
        if self.winners.contains(&player_id) {
            return Err(WinnerError::Duplicate(player_id));
        }
        let player = roster.find(player_id).ok_or(WinnerError::PlayerNotFound(player_id))?;
        if player.cards_owned() == 0 {
            return Err(WinnerError::DidNotParticipate(player_id));
        }
        self.winners.push(player_id);
        Ok(())
    }

    /// Removes a recorded winner by id, compacting the list.
    pub fn remove_winner(&mut self, player_id: u32) -> Result<(), WinnerError> {
        if !self.active {
            return Err(WinnerError::Inactive);
        }
        match self.winners.iter().position(|&id| id == player_id) {
            Some(i) => {
                self.winners.remove(i);
                Ok(())
            }
            None => Err(WinnerError::PlayerNotFound(player_id)),
        }
    }

    /// Completes the match: runs the mode's payout, clears per-match card
    /// counts for the whole roster, deactivates, and counts the match.
    ///
    /// No-op when inactive.
    pub fn end(&mut self, ledger: &mut Accounting, roster: &mut Roster, settings: &Settings) {
        if !self.active {
            return;
        }
        match self.mode {
            GameMode::FullHouse => payout::apply_fullhouse(ledger, self, roster),
            GameMode::Normal => {
                payout::apply_normal(self, roster, settings);
                ledger.saved_pot += self.saved_for_fullhouse;
            }
        }
        for p in roster.players_mut() {
            p.cards_owned = 0;
        }
        self.active = false;
        ledger.total_matches += 1;
    }

    /// Aborts the match, refunding every purchase as if it never happened.
    ///
    /// Each participant gets `cards_owned * card_cost` back on their balance
    /// and taken off their total-spent. The ledger is untouched and the match
    /// does not count toward the completed total. No-op when inactive.
    pub fn cancel(&mut self, roster: &mut Roster) {
        if !self.active {
            return;
        }
        for p in roster.players_mut() {
            if p.cards_owned > 0 {
                let refund = f64::from(p.cards_owned) * self.card_cost;
                p.balance += refund;
                p.total_spent -= refund;
                p.cards_owned = 0;
            }
        }
        self.pot = 0.0;
        self.saved_for_fullhouse = 0.0;
        self.winners.clear();
        self.active = false;
    }

    pub(crate) fn set_saved_for_fullhouse(&mut self, amount: f64) {
        self.saved_for_fullhouse = amount;
    }

    pub(crate) fn clear_pot(&mut self) {
        self.pot = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Match, Roster, Accounting, Settings) {
        let settings = Settings::default();
        let mut roster = Roster::new();
        roster.add("Alice", 10.0, &settings).unwrap();
        roster.add("Bob", 10.0, &settings).unwrap();
        (Match::new(), roster, Accounting::new(), settings)
    }

    #[test]
    fn start_resolves_cost_from_settings_or_override() {
        let (mut m, _, ledger, settings) = setup();
        m.start(GameMode::Normal, 0.0, &settings, &ledger).unwrap();
        assert_eq!(m.card_cost(), settings.normal_card_cost());
        assert!(m.is_active());
        assert_eq!(m.match_number(), 1);

        let mut m2 = Match::new();
        m2.start(GameMode::Normal, 2.5, &settings, &ledger).unwrap();
        assert_eq!(m2.card_cost(), 2.5);

        // Full-house cost unset by default: cards are free.
        let mut m3 = Match::new();
        m3.start(GameMode::FullHouse, 0.0, &settings, &ledger).unwrap();
        assert_eq!(m3.card_cost(), 0.0);
    }

    #[test]
    fn start_while_active_is_rejected() {
        let (mut m, _, ledger, settings) = setup();
        m.start(GameMode::Normal, 0.0, &settings, &ledger).unwrap();
        assert_eq!(
            m.start(GameMode::FullHouse, 0.0, &settings, &ledger),
            Err(StartError::AlreadyActive)
        );
        // The rejected start must not have clobbered anything.
        assert_eq!(m.mode(), GameMode::Normal);
    }

    #[test]
    fn buy_cards_is_noop_when_inactive_or_zero() {
        let (mut m, mut roster, ledger, settings) = setup();
        {
            let p = roster.find_mut(1).unwrap();
            m.buy_cards(p, 3);
        }
        assert_eq!(m.pot(), 0.0);
        assert_eq!(roster.find(1).unwrap().balance(), 10.0);

        m.start(GameMode::Normal, 1.0, &settings, &ledger).unwrap();
        let p = roster.find_mut(1).unwrap();
        m.buy_cards(p, 0);
        assert_eq!(m.pot(), 0.0);
        assert_eq!(p.cards_owned(), 0);
    }

    #[test]
    fn buy_cards_debits_without_a_floor() {
        let (mut m, mut roster, ledger, settings) = setup();
        m.start(GameMode::Normal, 4.0, &settings, &ledger).unwrap();
        let p = roster.find_mut(1).unwrap();
        // Caller skipped the solvency check: the engine lets this go negative.
        m.buy_cards(p, 5);
        assert_eq!(p.balance(), -10.0);
        assert_eq!(p.cards_owned(), 5);
        assert_eq!(p.lifetime_cards(), 5);
        assert_eq!(p.total_spent(), 20.0);
        assert_eq!(m.pot(), 20.0);
    }

    #[test]
    fn winner_checks_run_in_precedence_order() {
        let (mut m, mut roster, ledger, mut settings) = setup();
        assert_eq!(m.add_winner(&roster, 1, &settings), Err(WinnerError::Inactive));

        m.start(GameMode::Normal, 1.0, &settings, &ledger).unwrap();
        assert_eq!(
            m.add_winner(&roster, 1, &settings),
            Err(WinnerError::DidNotParticipate(1))
        );
        assert_eq!(
            m.add_winner(&roster, 99, &settings),
            Err(WinnerError::PlayerNotFound(99))
        );

        for id in [1, 2] {
            let p = roster.find_mut(id).unwrap();
            m.buy_cards(p, 1);
        }
        m.add_winner(&roster, 1, &settings).unwrap();
        assert_eq!(m.add_winner(&roster, 1, &settings), Err(WinnerError::Duplicate(1)));

        settings.set_allow_multi_winners(false);
        // The multi-winner gate sits ahead of the duplicate check, so once a
        // winner exists it answers for repeats too.
        assert_eq!(
            m.add_winner(&roster, 2, &settings),
            Err(WinnerError::MultiWinnerDisabled)
        );
        assert_eq!(
            m.add_winner(&roster, 1, &settings),
            Err(WinnerError::MultiWinnerDisabled)
        );
    }

    #[test]
    fn fullhouse_ignores_the_multi_winner_gate() {
        let (mut m, mut roster, ledger, mut settings) = setup();
        settings.set_allow_multi_winners(false);
        m.start(GameMode::FullHouse, 1.0, &settings, &ledger).unwrap();
        for id in [1, 2] {
            let p = roster.find_mut(id).unwrap();
            m.buy_cards(p, 1);
        }
        m.add_winner(&roster, 1, &settings).unwrap();
        m.add_winner(&roster, 2, &settings).unwrap();
        assert_eq!(m.winners(), &[1, 2]);
    }

    #[test]
    fn remove_winner_compacts_and_reports_missing() {
        let (mut m, mut roster, ledger, settings) = setup();
        m.start(GameMode::Normal, 1.0, &settings, &ledger).unwrap();
        for id in [1, 2] {
            let p = roster.find_mut(id).unwrap();
            m.buy_cards(p, 1);
        }
        m.add_winner(&roster, 1, &settings).unwrap();
        m.add_winner(&roster, 2, &settings).unwrap();
        m.remove_winner(1).unwrap();
        assert_eq!(m.winners(), &[2]);
        assert_eq!(m.remove_winner(1), Err(WinnerError::PlayerNotFound(1)));
    }

    #[test]
    fn cancel_refunds_and_leaves_ledger_alone() {
        let (mut m, mut roster, mut ledger, settings) = setup();
        m.start(GameMode::Normal, 1.0, &settings, &ledger).unwrap();
        {
            let p = roster.find_mut(1).unwrap();
            m.buy_cards(p, 4);
        }
        m.cancel(&mut roster);
        let p = roster.find(1).unwrap();
        assert_eq!(p.balance(), 10.0);
        assert_eq!(p.total_spent(), 0.0);
        assert_eq!(p.cards_owned(), 0);
        // Lifetime cards were really bought; cancellation does not unwind them.
        assert_eq!(p.lifetime_cards(), 4);
        assert!(!m.is_active());
        assert_eq!(m.pot(), 0.0);
        assert_eq!(ledger.total_matches(), 0);

        // End after cancel is a no-op.
        m.end(&mut ledger, &mut roster, &settings);
        assert_eq!(ledger.total_matches(), 0);
    }
}
