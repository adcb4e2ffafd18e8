//! bingo-rs: Bingo roster and match accounting
//!
//! Goals:
//! - Deterministic match lifecycle: start, buy-in, winner selection, end/cancel
//! - Two payout rules: split-pot-with-savings and full-house accumulated pot
//! - Small, well-documented public API; no panics for invalid input, `Result`
//!   for recoverable errors
//!
//! ## Quick start: run a normal match
//! ```
//! use bingo_rs::game::{GameMode, Match};
//! use bingo_rs::ledger::Accounting;
//! use bingo_rs::roster::Roster;
//! use bingo_rs::settings::Settings;
//!
//! let mut settings = Settings::default();
//! settings.set_saved_pot_percentage(0.2);
//!
//! let mut roster = Roster::new();
//! let alice = roster.add("Alice", 10.0, &settings).unwrap();
//! let bob = roster.add("Bob", 10.0, &settings).unwrap();
//!
//! let mut ledger = Accounting::new();
//! let mut m = Match::new();
//! m.start(GameMode::Normal, 1.0, &settings, &ledger).unwrap();
//! m.buy_cards(roster.find_mut(alice).unwrap(), 4);
//! m.buy_cards(roster.find_mut(bob).unwrap(), 6);
//! m.add_winner(&roster, alice, &settings).unwrap();
//! m.end(&mut ledger, &mut roster, &settings);
//!
//! // Pot 10, 20% saved, sole winner takes the remaining 8.
//! assert_eq!(roster.find(alice).unwrap().balance(), 14.0);
//! assert_eq!(ledger.saved_pot(), 2.0);
//! assert_eq!(ledger.total_matches(), 1);
//! ```
//!
//! ## TUI
//! Run the interactive menu frontend with:
//! ```sh
//! cargo run --bin bingo-rs
//! ```

pub mod game;
pub mod ledger;
pub mod payout;
pub mod persist;
pub mod roster;
pub mod settings;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
