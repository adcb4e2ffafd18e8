use crate::game::{GameMode, Match, StartError, WinnerError};
use crate::ledger::Accounting;
use crate::payout;
use crate::persist::{self, PersistError};
use crate::roster::Roster;
use crate::settings::Settings;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Menu entries, mirroring the operations the session supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MenuAction {
    AddPlayer,
    RemovePlayer,
    RechargeBalance,
    StartNormal,
    StartFullHouse,
    BuyCards,
    RebuyLastOrders,
    AddWinner,
    RemoveWinner,
    PreviewPayout,
    EndMatch,
    CancelMatch,
    SetNormalCost,
    SetFullhouseCost,
    SetSavedPct,
    ToggleMultiWinners,
    ExportPlayersCsv,
    SaveCheckpoint,
    Quit,
}

pub const MENU: [MenuAction; 19] = [
    MenuAction::AddPlayer,
    MenuAction::RemovePlayer,
    MenuAction::RechargeBalance,
    MenuAction::StartNormal,
    MenuAction::StartFullHouse,
    MenuAction::BuyCards,
    MenuAction::RebuyLastOrders,
    MenuAction::AddWinner,
    MenuAction::RemoveWinner,
    MenuAction::PreviewPayout,
    MenuAction::EndMatch,
    MenuAction::CancelMatch,
    MenuAction::SetNormalCost,
    MenuAction::SetFullhouseCost,
    MenuAction::SetSavedPct,
    MenuAction::ToggleMultiWinners,
    MenuAction::ExportPlayersCsv,
    MenuAction::SaveCheckpoint,
    MenuAction::Quit,
];

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddPlayer => "Add player",
            MenuAction::RemovePlayer => "Remove player",
            MenuAction::RechargeBalance => "Recharge player balance",
            MenuAction::StartNormal => "Start normal match",
            MenuAction::StartFullHouse => "Start full-house match",
            MenuAction::BuyCards => "Buy cards for player",
            MenuAction::RebuyLastOrders => "Rebuy last match's orders",
            MenuAction::AddWinner => "Add winner",
            MenuAction::RemoveWinner => "Remove winner",
            MenuAction::PreviewPayout => "Preview payout distribution",
            MenuAction::EndMatch => "End match",
            MenuAction::CancelMatch => "Cancel match (refund purchases)",
            MenuAction::SetNormalCost => "Set normal card cost",
            MenuAction::SetFullhouseCost => "Set full-house card cost",
            MenuAction::SetSavedPct => "Set saved pot percentage",
            MenuAction::ToggleMultiWinners => "Toggle multi winners",
            MenuAction::ExportPlayersCsv => "Export players CSV",
            MenuAction::SaveCheckpoint => "Save now (checkpoint)",
            MenuAction::Quit => "Quit",
        }
    }

    /// Labels for the values this action asks for before it runs; empty when
    /// it runs immediately.
    fn prompt_fields(self) -> &'static [&'static str] {
        match self {
            MenuAction::AddPlayer => &["Name", "Initial balance"],
            MenuAction::RemovePlayer => &["Player ID"],
            MenuAction::RechargeBalance => &["Player ID", "Amount"],
            MenuAction::StartNormal | MenuAction::StartFullHouse => {
                &["Card cost override (0 = default)"]
            }
            MenuAction::BuyCards => &["Player ID", "Cards to buy"],
            MenuAction::AddWinner | MenuAction::RemoveWinner => &["Player ID"],
            MenuAction::SetNormalCost | MenuAction::SetFullhouseCost => &["New cost"],
            MenuAction::SetSavedPct => &["Percentage (0-1)"],
            _ => &[],
        }
    }
}

/// An in-progress value entry for a menu action.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub action: MenuAction,
    pub labels: &'static [&'static str],
    pub values: Vec<String>,
    pub current: usize,
}

impl Prompt {
    fn new(action: MenuAction) -> Self {
        let labels = action.prompt_fields();
        Self { action, labels, values: vec![String::new(); labels.len()], current: 0 }
    }
}

/// Session state driven by the controller: the core pieces (settings,
/// roster, match, ledger), menu/prompt UI state, and the persistence paths.
#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub settings: Settings,
    pub roster: Roster,
    pub ledger: Accounting,
    pub game: Match,
    pub menu_index: usize,
    pub(crate) prompt: Option<Prompt>,
    log: Vec<String>,
    data_dir: PathBuf,
    /// Player/cards pairs bought in the active match.
    current_orders: Vec<(u32, u32)>,
    /// Orders from the previous match, replayable as a block of buy-ins.
    last_orders: Vec<(u32, u32)>,
}

impl AppState {
    /// A fresh session storing its files under `data_dir`; persisted state
    /// is loaded when present, missing files mean a first run.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let settings = Settings::default();
        let mut log = Vec::new();

        let ledger = match persist::load_accounting(data_dir.join("accounting.bin")) {
            Ok(acc) => acc,
            Err(e) => {
                if !is_missing_file(&e) {
                    log.push(format!("accounting not loaded: {e}"));
                }
                Accounting::new()
            }
        };
        let roster = match persist::load_roster(data_dir.join("roster.bin"), settings.max_players())
        {
            Ok(r) => r,
            Err(e) => {
                if !is_missing_file(&e) {
                    log.push(format!("roster not loaded: {e}"));
                }
                Roster::new()
            }
        };

        Self {
            settings,
            roster,
            ledger,
            game: Match::new(),
            menu_index: 0,
            prompt: None,
            log,
            data_dir,
            current_orders: Vec::new(),
            last_orders: Vec::new(),
        }
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn menu_len(&self) -> usize {
        MENU.len()
    }

    pub fn menu_labels(&self) -> Vec<String> {
        MENU.iter().map(|a| a.label().to_string()).collect()
    }

    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU.len() - 1) % MENU.len();
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU.len();
    }

    /// Activates the highlighted menu entry: opens its prompt when it needs
    /// input, otherwise runs it. Returns true when the session should end.
    pub fn menu_select(&mut self) -> bool {
        let action = MENU[self.menu_index];
        if action == MenuAction::Quit {
            return true;
        }
        if action.prompt_fields().is_empty() {
            self.execute(action, &[]);
        } else {
            self.prompt = Some(Prompt::new(action));
        }
        false
    }

    pub fn prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ' ' | '_') {
                p.values[p.current].push(c);
            }
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.values[p.current].pop();
        }
    }

    pub fn prompt_cancel(&mut self) {
        self.prompt = None;
    }

    /// Advances to the next field, or submits once every field is filled.
    pub fn prompt_enter(&mut self) {
        let Some(p) = self.prompt.as_mut() else { return };
        if p.current + 1 < p.labels.len() {
            p.current += 1;
            return;
        }
        let p = self.prompt.take().unwrap();
        let values: Vec<&str> = p.values.iter().map(|s| s.trim()).collect();
        self.execute(p.action, &values);
    }

    fn execute(&mut self, action: MenuAction, args: &[&str]) {
        match action {
            MenuAction::AddPlayer => self.do_add_player(args),
            MenuAction::RemovePlayer => self.do_remove_player(args),
            MenuAction::RechargeBalance => self.do_recharge(args),
            MenuAction::StartNormal => self.do_start(GameMode::Normal, args),
            MenuAction::StartFullHouse => self.do_start(GameMode::FullHouse, args),
            MenuAction::BuyCards => self.do_buy_cards(args),
            MenuAction::RebuyLastOrders => self.do_rebuy_last(),
            MenuAction::AddWinner => self.do_add_winner(args),
            MenuAction::RemoveWinner => self.do_remove_winner(args),
            MenuAction::PreviewPayout => self.do_preview(),
            MenuAction::EndMatch => self.do_end_match(),
            MenuAction::CancelMatch => self.do_cancel_match(),
            MenuAction::SetNormalCost => self.do_set_normal_cost(args),
            MenuAction::SetFullhouseCost => self.do_set_fullhouse_cost(args),
            MenuAction::SetSavedPct => self.do_set_saved_pct(args),
            MenuAction::ToggleMultiWinners => self.do_toggle_multi(),
            MenuAction::ExportPlayersCsv => self.do_export_csv(),
            MenuAction::SaveCheckpoint => self.do_checkpoint(),
            MenuAction::Quit => {}
        }
    }

    fn push_log(&mut self, msg: String) {
        self.log.push(msg);
        // Keep the pane from growing without bound over a long session.
        if self.log.len() > 200 {
            let drop = self.log.len() - 200;
            self.log.drain(..drop);
        }
    }

    fn do_add_player(&mut self, args: &[&str]) {
        let name = args[0];
        if name.is_empty() {
            self.push_log("name must not be empty".into());
            return;
        }
        let Some(balance) = parse_f64(args[1]) else {
            self.push_log(format!("invalid balance '{}'", args[1]));
            return;
        };
        match self.roster.add(name, balance, &self.settings) {
            Ok(id) => self.push_log(format!("added player {name} (ID {id})")),
            Err(e) => self.push_log(format!("add failed: {e}")),
        }
    }

    fn do_remove_player(&mut self, args: &[&str]) {
        let Some(id) = parse_u32(args[0]) else {
            self.push_log(format!("invalid player id '{}'", args[0]));
            return;
        };
        match self.roster.remove(id) {
            Ok(()) => self.push_log(format!("removed player {id}")),
            Err(e) => self.push_log(e.to_string()),
        }
    }

    fn do_recharge(&mut self, args: &[&str]) {
        let (Some(id), Some(amount)) = (parse_u32(args[0]), parse_f64(args[1])) else {
            self.push_log("invalid id or amount".into());
            return;
        };
        if amount <= 0.0 {
            self.push_log("amount must be positive".into());
            return;
        }
        let Some(p) = self.roster.find_mut(id) else {
            self.push_log(format!("player {id} not found"));
            return;
        };
        p.recharge(amount);
        let balance = p.balance();
        let name = p.name().to_string();
        self.push_log(format!("added {amount:.2} to {name}; new balance {balance:.2}"));
        self.save_snapshots();
        self.append_transaction("recharge", &format!("id={id},amount={amount:.2}"));
    }

    fn do_start(&mut self, mode: GameMode, args: &[&str]) {
        let override_cost = parse_f64(args[0]).unwrap_or(0.0);
        match self.game.start(mode, override_cost, &self.settings, &self.ledger) {
            Ok(()) => {
                if !self.current_orders.is_empty() {
                    self.last_orders = std::mem::take(&mut self.current_orders);
                }
                self.push_log(format!(
                    "match #{} started ({}, card cost {:.2})",
                    self.game.match_number(),
                    mode.label(),
                    self.game.card_cost()
                ));
            }
            Err(StartError::AlreadyActive) => {
                self.push_log("a match is already active; end it first".into());
            }
        }
    }

    fn do_buy_cards(&mut self, args: &[&str]) {
        if !self.game.is_active() {
            self.push_log("no active match".into());
            return;
        }
        let (Some(id), Some(count)) = (parse_u32(args[0]), parse_u32(args[1])) else {
            self.push_log("invalid id or card count".into());
            return;
        };
        if self.buy_checked(id, count) {
            let cost = self.game.card_cost() * f64::from(count);
            self.push_log(format!("player {id} bought {count} cards"));
            self.append_transaction("buy", &format!("id={id},count={count},cost={cost:.2}"));
        }
    }

    /// Purchase with the caller-side solvency check the engine leaves out.
    /// Returns false (and logs) when the player is missing or short.
    fn buy_checked(&mut self, id: u32, count: u32) -> bool {
        let total_cost = self.game.card_cost() * f64::from(count);
        let Some(p) = self.roster.find_mut(id) else {
            self.push_log(format!("player {id} not found"));
            return false;
        };
        if p.balance() < total_cost {
            let name = p.name().to_string();
            self.push_log(format!("{name} lacks balance for {count} cards (needs {total_cost:.2})"));
            return false;
        }
        self.game.buy_cards(p, count);
        if count > 0 {
            match self.current_orders.iter_mut().find(|(oid, _)| *oid == id) {
                Some(order) => order.1 += count,
                None => self.current_orders.push((id, count)),
            }
        }
        true
    }

    fn do_rebuy_last(&mut self) {
        if !self.game.is_active() {
            self.push_log("no active match".into());
            return;
        }
        if self.last_orders.is_empty() {
            self.push_log("no previous orders to replay".into());
            return;
        }
        let orders = self.last_orders.clone();
        for &(id, count) in &orders {
            self.buy_checked(id, count);
        }
        self.push_log(format!("replayed {} orders; pot now {:.2}", orders.len(), self.game.pot()));
    }

    fn do_add_winner(&mut self, args: &[&str]) {
        let Some(id) = parse_u32(args[0]) else {
            self.push_log(format!("invalid player id '{}'", args[0]));
            return;
        };
        match self.game.add_winner(&self.roster, id, &self.settings) {
            Ok(()) => self.push_log(format!("added winner {id}")),
            Err(WinnerError::Inactive) => self.push_log("no active match".into()),
            Err(e) => self.push_log(e.to_string()),
        }
    }

    fn do_remove_winner(&mut self, args: &[&str]) {
        let Some(id) = parse_u32(args[0]) else {
            self.push_log(format!("invalid player id '{}'", args[0]));
            return;
        };
        match self.game.remove_winner(id) {
            Ok(()) => self.push_log(format!("removed winner {id}")),
            Err(e) => self.push_log(e.to_string()),
        }
    }

    fn do_preview(&mut self) {
        if !self.game.is_active() {
            self.push_log("no active match".into());
            return;
        }
        let pv = payout::preview(&self.game, &self.ledger, &self.settings);
        let per = match pv.per_winner {
            Some(v) => format!("{v:.2} per winner"),
            None => "no winners yet".to_string(),
        };
        self.push_log(format!(
            "pot {:.2}, save {:.2}, distributable {:.2}, {}",
            pv.pot, pv.to_save, pv.distributable, per
        ));
    }

    fn do_end_match(&mut self) {
        if !self.game.is_active() {
            self.push_log("no active match".into());
            return;
        }
        // House rule from the session layer: with participants on the books,
        // somebody must have won. The engine itself allows the draw path.
        let had_participants = self.roster.players().iter().any(|p| p.cards_owned() > 0);
        if had_participants && self.game.winners().is_empty() {
            self.push_log("cannot end match: at least one winner required".into());
            return;
        }
        self.game.end(&mut self.ledger, &mut self.roster, &self.settings);
        self.push_log(format!(
            "match ended; saved pot total {:.2}",
            self.ledger.saved_pot()
        ));
        self.save_snapshots();
        if let Err(e) =
            persist::append_match_record(self.data_dir.join("matches.csv"), &self.game)
        {
            self.push_log(format!("match history not written: {e}"));
        }
    }

    fn do_cancel_match(&mut self) {
        if !self.game.is_active() {
            self.push_log("no active match".into());
            return;
        }
        self.game.cancel(&mut self.roster);
        self.push_log("match cancelled; purchases refunded".into());
        self.save_snapshots();
        self.append_transaction("cancel_match", "refunds issued");
    }

    fn do_set_normal_cost(&mut self, args: &[&str]) {
        match parse_f64(args[0]) {
            Some(c) => {
                self.settings.set_normal_card_cost(c);
                self.push_log(format!(
                    "normal card cost now {:.2}",
                    self.settings.normal_card_cost()
                ));
            }
            None => self.push_log(format!("invalid cost '{}'", args[0])),
        }
    }

    fn do_set_fullhouse_cost(&mut self, args: &[&str]) {
        match parse_f64(args[0]) {
            Some(c) => {
                self.settings.set_fullhouse_card_cost(c);
                self.push_log(format!(
                    "full-house card cost now {:.2}",
                    self.settings.fullhouse_card_cost()
                ));
            }
            None => self.push_log(format!("invalid cost '{}'", args[0])),
        }
    }

    fn do_set_saved_pct(&mut self, args: &[&str]) {
        match parse_f64(args[0]) {
            Some(p) => {
                self.settings.set_saved_pot_percentage(p);
                self.push_log(format!(
                    "saved pot percentage now {:.2}",
                    self.settings.saved_pot_percentage()
                ));
            }
            None => self.push_log(format!("invalid percentage '{}'", args[0])),
        }
    }

    fn do_toggle_multi(&mut self) {
        let allow = !self.settings.allow_multi_winners();
        self.settings.set_allow_multi_winners(allow);
        self.push_log(format!(
            "multi winners now {} for normal matches",
            if allow { "ENABLED" } else { "DISABLED" }
        ));
    }

    fn do_export_csv(&mut self) {
        let path = self.data_dir.join("players_summary.csv");
        match persist::export_players_csv(&path, &self.roster) {
            Ok(()) => {
                self.push_log(format!("exported players summary to {}", path.display()));
                self.append_transaction("export_players", "players_summary.csv written");
            }
            Err(e) => self.push_log(format!("export failed: {e}")),
        }
    }

    fn do_checkpoint(&mut self) {
        self.save_snapshots();
        self.push_log("checkpoint saved".into());
        self.append_transaction("checkpoint", "manual save");
    }

    /// Best-effort roster + accounting save; failures land in the log and
    /// the session continues on in-memory state.
    pub fn save_snapshots(&mut self) {
        let _ = std::fs::create_dir_all(&self.data_dir);
        if let Err(e) = persist::save_roster(self.data_dir.join("roster.bin"), &self.roster) {
            self.push_log(format!("roster not saved: {e}"));
        }
        if let Err(e) =
            persist::save_accounting(self.data_dir.join("accounting.bin"), &self.ledger)
        {
            self.push_log(format!("accounting not saved: {e}"));
        }
    }

    fn append_transaction(&mut self, kind: &str, details: &str) {
        if let Err(e) =
            persist::append_transaction(self.data_dir.join("transactions.csv"), kind, details)
        {
            self.push_log(format!("transaction not logged: {e}"));
        }
    }
}

fn is_missing_file(e: &PersistError) -> bool {
    matches!(e, PersistError::Io(io) if io.kind() == ErrorKind::NotFound)
}

fn parse_u32(s: &str) -> Option<u32> {
    s.parse().ok()
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse().ok()
}
