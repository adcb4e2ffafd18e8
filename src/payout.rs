//! Money movement at end of match.
//!
//! Two procedures, one per mode. Both pay winners an equal `f64` split (no
//! rounding correction; fractional remainders land wherever division puts
//! them) and charge a loss to every participant who is not a winner. They
//! differ in where the money comes from and what they touch afterwards:
//!
//! - normal: distributes `pot * (1 - saved percentage)`, records the skimmed
//!   share on the match, and leaves the ledger alone (the match-end path
//!   banks it).
//! - full house: distributes the ledger's saved pot plus the match pot and
//!   drains both to zero, but only when there is at least one winner. A
//!   winnerless full house leaves the reserve intact; a winnerless normal
//!   match is a draw that saves nothing. The asymmetry is intended.

use crate::game::{GameMode, Match};
use crate::ledger::Accounting;
use crate::roster::Roster;
use crate::settings::Settings;

/// Settles a normal match: skim, split, book wins and losses.
///
/// With zero winners nothing moves and nothing is saved. Otherwise each
/// winner's balance, total-won, and win count grow by the per-winner share,
/// each non-winning participant takes a loss, and the match records the
/// skimmed amount in `saved_for_fullhouse` for the caller to bank.
pub fn apply_normal(m: &mut Match, roster: &mut Roster, settings: &Settings) {
    let to_save = m.pot() * settings.saved_pot_percentage();
    let distributable = m.pot() - to_save;
    if m.winners().is_empty() {
        // Draw: no payout, no save.
        return;
    }
    let per_winner = distributable / m.winners().len() as f64;
    pay_and_book(m.winners().to_vec(), per_winner, roster);
    m.set_saved_for_fullhouse(to_save);
}

/// Settles a full-house match from the shared reserve plus its own pot.
///
/// Strict no-op with zero winners: the saved pot survives for the next full
/// house. With winners, the combined amount is split equally and both the
/// ledger's saved pot and the match pot are zeroed unconditionally; any
/// rounding dust is dropped rather than carried forward.
pub fn apply_fullhouse(ledger: &mut Accounting, m: &mut Match, roster: &mut Roster) {
    if m.winners().is_empty() {
        return;
    }
    let total_distributable = ledger.saved_pot() + m.pot();
    let per_winner = total_distributable / m.winners().len() as f64;
    pay_and_book(m.winners().to_vec(), per_winner, roster);
    ledger.saved_pot = 0.0;
    m.clear_pot();
}

fn pay_and_book(winners: Vec<u32>, per_winner: f64, roster: &mut Roster) {
    for &id in &winners {
        if let Some(p) = roster.find_mut(id) {
            p.balance += per_winner;
            p.record.wins += 1;
            p.total_won += per_winner;
        }
    }
    for p in roster.players_mut() {
        // Non-participants sit out; they neither win nor lose.
        if !winners.contains(&p.id()) && p.cards_owned() > 0 {
            p.record.losses += 1;
        }
    }
}

/// Projection of the current match's distribution if it ended now.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct PayoutPreview {
    pub pot: f64,
    /// Skim destined for the saved pot; always 0 for a full house.
    pub to_save: f64,
    /// What the winners would share (includes the banked reserve for a full
    /// house).
    pub distributable: f64,
    pub winner_count: usize,
    /// `None` until at least one winner is recorded.
    pub per_winner: Option<f64>,
}

/// Computes the distribution the current winner list would produce.
pub fn preview(m: &Match, ledger: &Accounting, settings: &Settings) -> PayoutPreview {
    let (to_save, distributable) = match m.mode() {
        GameMode::FullHouse => (0.0, ledger.saved_pot() + m.pot()),
        GameMode::Normal => {
            let to_save = m.pot() * settings.saved_pot_percentage();
            (to_save, m.pot() - to_save)
        }
    };
    let winner_count = m.winners().len();
    let per_winner =
        (winner_count > 0).then(|| distributable / winner_count as f64);
    PayoutPreview { pot: m.pot(), to_save, distributable, winner_count, per_winner }
}
