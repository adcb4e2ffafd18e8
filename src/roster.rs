use crate::settings::Settings;

/// Win/loss/draw counters. Counts only ever go up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// A roster member.
///
/// The engine never enforces a non-negative balance: recharges and payouts
/// only add, and the one subtracting operation (card purchase) relies on the
/// caller's solvency check. Mutation happens through the match lifecycle and
/// `recharge`; identity and counters are read through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) balance: f64,
    pub(crate) record: Record,
    /// Cards purchased in the current match; reset at match end/cancel.
    pub(crate) cards_owned: u32,
    pub(crate) lifetime_cards: u32,
    pub(crate) total_recharged: f64,
    pub(crate) total_spent: f64,
    pub(crate) total_won: f64,
}

impl Player {
    pub(crate) fn new(id: u32, name: &str, balance: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            balance,
            record: Record::default(),
            cards_owned: 0,
            lifetime_cards: 0,
            total_recharged: 0.0,
            total_spent: 0.0,
            total_won: 0.0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current spendable funds.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn record(&self) -> Record {
        self.record
    }

    /// Cards purchased in the current match.
    pub fn cards_owned(&self) -> u32 {
        self.cards_owned
    }

    pub fn lifetime_cards(&self) -> u32 {
        self.lifetime_cards
    }

    pub fn total_recharged(&self) -> f64 {
        self.total_recharged
    }

    pub fn total_spent(&self) -> f64 {
        self.total_spent
    }

    pub fn total_won(&self) -> f64 {
        self.total_won
    }

    /// Lifetime winnings minus lifetime card spend.
    pub fn net_gain(&self) -> f64 {
        self.total_won - self.total_spent
    }

    /// Adds funds to the balance and the cumulative recharge counter.
    /// Non-positive amounts are ignored.
    pub fn recharge(&mut self, amount: f64) {
        if amount > 0.0 {
            self.balance += amount;
            self.total_recharged += amount;
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RosterError {
    #[error("roster is full ({max} players)")]
    CapacityReached { max: u32 },
    #[error("player {0} not found")]
    NotFound(u32),
}

/// Ordered collection of players with monotonically increasing ids.
///
/// Removal compacts the list but never frees an id for reuse: assignment is
/// keyed off the last id ever handed out, not the current contents, so a
/// remove-then-add sequence skips numbers rather than recycling them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
    last_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player and returns the assigned id.
    pub fn add(
        &mut self,
        name: &str,
        initial_balance: f64,
        settings: &Settings,
    ) -> Result<u32, RosterError> {
        let max = settings.max_players();
        if self.players.len() as u32 >= max {
            return Err(RosterError::CapacityReached { max });
        }
        let id = self.last_id + 1;
        self.last_id = id;
        self.players.push(Player::new(id, name, initial_balance));
        Ok(id)
    }

    /// Removes a player by id, shifting later entries down to fill the gap.
    pub fn remove(&mut self, id: u32) -> Result<(), RosterError> {
        match self.players.iter().position(|p| p.id == id) {
            Some(i) => {
                self.players.remove(i);
                Ok(())
            }
            None => Err(RosterError::NotFound(id)),
        }
    }

    pub fn find(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Rebuilds a roster from persisted players. Order and ids are taken as
    /// stored; id assignment resumes past the highest stored id.
    pub(crate) fn from_players(players: Vec<Player>) -> Self {
        let last_id = players.iter().map(|p| p.id).max().unwrap_or(0);
        Self { players, last_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings(max: u32) -> Settings {
        let mut s = Settings::default();
        s.set_max_players(max);
        s
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let s = Settings::default();
        let mut r = Roster::new();
        assert_eq!(r.add("Alice", 10.0, &s).unwrap(), 1);
        assert_eq!(r.add("Bob", 5.0, &s).unwrap(), 2);
        assert_eq!(r.add("Carol", 0.0, &s).unwrap(), 3);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let s = Settings::default();
        let mut r = Roster::new();
        r.add("Alice", 0.0, &s).unwrap();
        r.add("Bob", 0.0, &s).unwrap();
        r.add("Carol", 0.0, &s).unwrap();
        r.remove(3).unwrap();
        // 3 was handed out once; removing the holder does not free it.
        assert_eq!(r.add("Dave", 0.0, &s).unwrap(), 4);
        r.remove(1).unwrap();
        r.remove(2).unwrap();
        r.remove(4).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.add("Erin", 0.0, &s).unwrap(), 5);
    }

    #[test]
    fn capacity_is_enforced() {
        let s = small_settings(2);
        let mut r = Roster::new();
        r.add("Alice", 0.0, &s).unwrap();
        r.add("Bob", 0.0, &s).unwrap();
        assert_eq!(
            r.add("Carol", 0.0, &s),
            Err(RosterError::CapacityReached { max: 2 })
        );
    }

    #[test]
    fn remove_compacts_preserving_order() {
        let s = Settings::default();
        let mut r = Roster::new();
        r.add("Alice", 0.0, &s).unwrap();
        r.add("Bob", 0.0, &s).unwrap();
        r.add("Carol", 0.0, &s).unwrap();
        r.remove(2).unwrap();
        let ids: Vec<u32> = r.players().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(r.remove(2), Err(RosterError::NotFound(2)));
    }

    #[test]
    fn recharge_tracks_cumulative_total() {
        let s = Settings::default();
        let mut r = Roster::new();
        let id = r.add("Alice", 1.0, &s).unwrap();
        let p = r.find_mut(id).unwrap();
        p.recharge(4.0);
        p.recharge(0.0); // ignored
        p.recharge(-2.0); // ignored
        assert_eq!(p.balance(), 5.0);
        assert_eq!(p.total_recharged(), 4.0);
    }
}
