//! On-disk state: binary snapshots for roster and accounting, line-oriented
//! CSV for match history, player exports, and the transaction log.
//!
//! The binary codecs are written against `io::Read`/`io::Write` so the
//! format logic stays testable over in-memory buffers; thin path-based
//! wrappers handle the files. The roster format is versioned: a magic-tagged
//! header selects the current decoder, and a stream without the magic falls
//! back to the legacy layout (a bare player count, records without the
//! cumulative money counters).

use crate::game::Match;
use crate::ledger::Accounting;
use crate::roster::{Player, Record, Roster};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// "BGOP" tag opening a current-format roster stream.
pub const ROSTER_MAGIC: u32 = 0x4247_4F50;
pub const ROSTER_VERSION: u16 = 2;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum PersistError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("stored roster holds {count} players but the limit is {max}")]
    RosterTooLarge { count: u32, max: u32 },
    #[error("unsupported roster version {0}")]
    UnsupportedVersion(u16),
    #[error("stored player name is not valid UTF-8")]
    BadName,
}

/// Writes the roster in the current (v2) format.
pub fn write_roster<W: Write>(w: &mut W, roster: &Roster) -> Result<(), PersistError> {
    w.write_u32::<LittleEndian>(ROSTER_MAGIC)?;
    w.write_u16::<LittleEndian>(ROSTER_VERSION)?;
    w.write_u16::<LittleEndian>(0)?; // reserved
    w.write_u32::<LittleEndian>(roster.len() as u32)?;
    for p in roster.players() {
        w.write_u32::<LittleEndian>(p.id())?;
        write_name(w, p.name())?;
        w.write_f64::<LittleEndian>(p.balance())?;
        w.write_u32::<LittleEndian>(p.record().wins)?;
        w.write_u32::<LittleEndian>(p.record().losses)?;
        w.write_u32::<LittleEndian>(p.record().draws)?;
        w.write_u32::<LittleEndian>(p.cards_owned())?;
        w.write_u32::<LittleEndian>(p.lifetime_cards())?;
        w.write_f64::<LittleEndian>(p.total_recharged())?;
        w.write_f64::<LittleEndian>(p.total_spent())?;
        w.write_f64::<LittleEndian>(p.total_won())?;
    }
    Ok(())
}

/// Reads a roster, dispatching on the leading magic: current format when
/// present, legacy layout otherwise. `max_players` bounds what a stored
/// stream may claim.
pub fn read_roster<R: Read>(r: &mut R, max_players: u32) -> Result<Roster, PersistError> {
    let lead = r.read_u32::<LittleEndian>()?;
    if lead == ROSTER_MAGIC {
        let version = r.read_u16::<LittleEndian>()?;
        let _reserved = r.read_u16::<LittleEndian>()?;
        match version {
            ROSTER_VERSION => read_roster_v2(r, max_players),
            v => Err(PersistError::UnsupportedVersion(v)),
        }
    } else {
        // Legacy stream: the word we just read is the player count.
        read_roster_v1(r, lead, max_players)
    }
}

fn read_roster_v2<R: Read>(r: &mut R, max_players: u32) -> Result<Roster, PersistError> {
    let count = r.read_u32::<LittleEndian>()?;
    if count > max_players {
        return Err(PersistError::RosterTooLarge { count, max: max_players });
    }
    let mut players = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let id = r.read_u32::<LittleEndian>()?;
        let name = read_name(r)?;
        let balance = r.read_f64::<LittleEndian>()?;
        let wins = r.read_u32::<LittleEndian>()?;
        let losses = r.read_u32::<LittleEndian>()?;
        let draws = r.read_u32::<LittleEndian>()?;
        let cards_owned = r.read_u32::<LittleEndian>()?;
        let lifetime_cards = r.read_u32::<LittleEndian>()?;
        let total_recharged = r.read_f64::<LittleEndian>()?;
        let total_spent = r.read_f64::<LittleEndian>()?;
        let total_won = r.read_f64::<LittleEndian>()?;
        players.push(Player {
            id,
            name,
            balance,
            record: Record { wins, losses, draws },
            cards_owned,
            lifetime_cards,
            total_recharged,
            total_spent,
            total_won,
        });
    }
    Ok(Roster::from_players(players))
}

fn read_roster_v1<R: Read>(
    r: &mut R,
    count: u32,
    max_players: u32,
) -> Result<Roster, PersistError> {
    if count > max_players {
        return Err(PersistError::RosterTooLarge { count, max: max_players });
    }
    let mut players = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let id = r.read_u32::<LittleEndian>()?;
        let name = read_name(r)?;
        let balance = r.read_f64::<LittleEndian>()?;
        let wins = r.read_u32::<LittleEndian>()?;
        let losses = r.read_u32::<LittleEndian>()?;
        let draws = r.read_u32::<LittleEndian>()?;
        let cards_owned = r.read_u32::<LittleEndian>()?;
        let lifetime_cards = r.read_u32::<LittleEndian>()?;
        players.push(Player {
            id,
            name,
            balance,
            record: Record { wins, losses, draws },
            cards_owned,
            lifetime_cards,
            // Unknown for legacy records.
            total_recharged: 0.0,
            total_spent: 0.0,
            total_won: 0.0,
        });
    }
    Ok(Roster::from_players(players))
}

fn write_name<W: Write>(w: &mut W, name: &str) -> Result<(), PersistError> {
    let bytes = name.as_bytes();
    let len = bytes.len().min(u16::MAX as usize);
    w.write_u16::<LittleEndian>(len as u16)?;
    w.write_all(&bytes[..len])?;
    Ok(())
}

fn read_name<R: Read>(r: &mut R) -> Result<String, PersistError> {
    let len = r.read_u16::<LittleEndian>()?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| PersistError::BadName)
}

pub fn write_accounting<W: Write>(w: &mut W, acc: &Accounting) -> Result<(), PersistError> {
    w.write_f64::<LittleEndian>(acc.total_bank())?;
    w.write_f64::<LittleEndian>(acc.saved_pot())?;
    w.write_u32::<LittleEndian>(acc.total_matches())?;
    Ok(())
}

pub fn read_accounting<R: Read>(r: &mut R) -> Result<Accounting, PersistError> {
    let total_bank = r.read_f64::<LittleEndian>()?;
    let saved_pot = r.read_f64::<LittleEndian>()?;
    let total_matches = r.read_u32::<LittleEndian>()?;
    Ok(Accounting::with_totals(total_bank, saved_pot, total_matches))
}

/// One match-history record:
/// `match_number,mode_code,card_cost,pot,saved_for_fullhouse,winner_count[,winner_id...]`.
pub fn write_match_record<W: Write>(w: &mut W, m: &Match) -> Result<(), PersistError> {
    write!(
        w,
        "{},{},{:.2},{:.2},{:.2},{}",
        m.match_number(),
        m.mode().code(),
        m.card_cost(),
        m.pot(),
        m.saved_for_fullhouse(),
        m.winners().len()
    )?;
    for id in m.winners() {
        write!(w, ",{id}")?;
    }
    writeln!(w)?;
    Ok(())
}

/// One transaction-log line: `type,unix_timestamp,details`.
pub fn write_transaction<W: Write>(
    w: &mut W,
    kind: &str,
    timestamp: i64,
    details: &str,
) -> Result<(), PersistError> {
    writeln!(w, "{kind},{timestamp},{details}")?;
    Ok(())
}

/// Financial summary of every player, one CSV row each.
pub fn write_players_csv<W: Write>(w: &mut W, roster: &Roster) -> Result<(), PersistError> {
    writeln!(
        w,
        "id,name,balance,total_recharged,total_spent,total_won,wins,losses,draws,lifetime_cards,net_gain"
    )?;
    for p in roster.players() {
        writeln!(
            w,
            "{},{},{:.2},{:.2},{:.2},{:.2},{},{},{},{},{:.2}",
            p.id(),
            p.name(),
            p.balance(),
            p.total_recharged(),
            p.total_spent(),
            p.total_won(),
            p.record().wins,
            p.record().losses,
            p.record().draws,
            p.lifetime_cards(),
            p.net_gain()
        )?;
    }
    Ok(())
}

pub fn save_roster<P: AsRef<Path>>(path: P, roster: &Roster) -> Result<(), PersistError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_roster(&mut w, roster)?;
    w.flush()?;
    Ok(())
}

pub fn load_roster<P: AsRef<Path>>(path: P, max_players: u32) -> Result<Roster, PersistError> {
    let mut r = BufReader::new(File::open(path)?);
    read_roster(&mut r, max_players)
}

pub fn save_accounting<P: AsRef<Path>>(path: P, acc: &Accounting) -> Result<(), PersistError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_accounting(&mut w, acc)?;
    w.flush()?;
    Ok(())
}

pub fn load_accounting<P: AsRef<Path>>(path: P) -> Result<Accounting, PersistError> {
    let mut r = BufReader::new(File::open(path)?);
    read_accounting(&mut r)
}

pub fn append_match_record<P: AsRef<Path>>(path: P, m: &Match) -> Result<(), PersistError> {
    let mut w = OpenOptions::new().create(true).append(true).open(path)?;
    write_match_record(&mut w, m)
}

/// Appends a timestamped entry to the transaction log.
pub fn append_transaction<P: AsRef<Path>>(
    path: P,
    kind: &str,
    details: &str,
) -> Result<(), PersistError> {
    let mut w = OpenOptions::new().create(true).append(true).open(path)?;
    write_transaction(&mut w, kind, Utc::now().timestamp(), details)
}

pub fn export_players_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> Result<(), PersistError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_players_csv(&mut w, roster)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::io::Cursor;

    fn sample_roster() -> Roster {
        let settings = Settings::default();
        let mut r = Roster::new();
        r.add("Alice", 12.5, &settings).unwrap();
        r.add("Bob", -3.0, &settings).unwrap();
        let p = r.find_mut(1).unwrap();
        p.recharge(10.0);
        p.record.wins = 2;
        p.record.losses = 1;
        p.lifetime_cards = 7;
        p.total_spent = 4.0;
        p.total_won = 9.0;
        r
    }

    #[test]
    fn roster_roundtrips_in_current_format() {
        let roster = sample_roster();
        let mut buf = Vec::new();
        write_roster(&mut buf, &roster).unwrap();
        let loaded = read_roster(&mut Cursor::new(&buf), 512).unwrap();
        assert_eq!(loaded, roster);
    }

    #[test]
    fn legacy_stream_loads_with_zeroed_money_counters() {
        // Legacy layout: count, then per player id/name/balance/record/cards,
        // no cumulative money fields.
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(1).unwrap();
        buf.write_u32::<LittleEndian>(5).unwrap();
        write_name(&mut buf, "Carol").unwrap();
        buf.write_f64::<LittleEndian>(7.5).unwrap();
        for v in [3u32, 2, 1, 0, 11] {
            buf.write_u32::<LittleEndian>(v).unwrap();
        }

        let loaded = read_roster(&mut Cursor::new(&buf), 512).unwrap();
        let p = loaded.find(5).unwrap();
        assert_eq!(p.name(), "Carol");
        assert_eq!(p.balance(), 7.5);
        assert_eq!(p.record(), Record { wins: 3, losses: 2, draws: 1 });
        assert_eq!(p.lifetime_cards(), 11);
        assert_eq!(p.total_recharged(), 0.0);
        assert_eq!(p.total_spent(), 0.0);
        assert_eq!(p.total_won(), 0.0);
    }

    #[test]
    fn oversized_roster_is_rejected() {
        let roster = sample_roster();
        let mut buf = Vec::new();
        write_roster(&mut buf, &roster).unwrap();
        let err = read_roster(&mut Cursor::new(&buf), 1).unwrap_err();
        assert!(matches!(err, PersistError::RosterTooLarge { count: 2, max: 1 }));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(ROSTER_MAGIC).unwrap();
        buf.write_u16::<LittleEndian>(9).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(0).unwrap();
        let err = read_roster(&mut Cursor::new(&buf), 512).unwrap_err();
        assert!(matches!(err, PersistError::UnsupportedVersion(9)));
    }

    #[test]
    fn truncated_stream_surfaces_io_error() {
        let roster = sample_roster();
        let mut buf = Vec::new();
        write_roster(&mut buf, &roster).unwrap();
        buf.truncate(buf.len() - 4);
        let err = read_roster(&mut Cursor::new(&buf), 512).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[test]
    fn accounting_roundtrips() {
        let acc = Accounting::with_totals(100.0, 12.75, 9);
        let mut buf = Vec::new();
        write_accounting(&mut buf, &acc).unwrap();
        let loaded = read_accounting(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(loaded, acc);
    }

    #[test]
    fn match_record_lists_winners_after_the_count() {
        use crate::game::GameMode;
        let settings = Settings::default();
        let mut roster = Roster::new();
        roster.add("A", 10.0, &settings).unwrap();
        roster.add("B", 10.0, &settings).unwrap();
        let ledger = Accounting::with_totals(0.0, 0.0, 4);
        let mut m = Match::new();
        m.start(GameMode::Normal, 0.5, &settings, &ledger).unwrap();
        for id in [1, 2] {
            let p = roster.find_mut(id).unwrap();
            m.buy_cards(p, 2);
        }
        m.add_winner(&roster, 2, &settings).unwrap();
        m.add_winner(&roster, 1, &settings).unwrap();

        let mut buf = Vec::new();
        write_match_record(&mut buf, &m).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(line, "5,1,0.50,2.00,0.00,2,2,1\n");
    }

    #[test]
    fn transaction_line_shape() {
        let mut buf = Vec::new();
        write_transaction(&mut buf, "recharge", 1_700_000_000, "id=3,amount=5.00").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "recharge,1700000000,id=3,amount=5.00\n"
        );
    }

    #[test]
    fn players_csv_includes_net_gain() {
        let roster = sample_roster();
        let mut buf = Vec::new();
        write_players_csv(&mut buf, &roster).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,balance,total_recharged,total_spent,total_won,wins,losses,draws,lifetime_cards,net_gain"
        );
        assert_eq!(lines.next().unwrap(), "1,Alice,22.50,10.00,4.00,9.00,2,1,0,7,5.00");
        assert_eq!(lines.next().unwrap(), "2,Bob,-3.00,0.00,0.00,0.00,0,0,0,0,0.00");
        assert!(lines.next().is_none());
    }
}
