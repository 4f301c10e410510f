//! SQLite access to fighters and fight history
//!
//! Every query opens its own connection and drops it before returning.

use crate::features::FighterStats;
use crate::{FightError, FightRecord, Fighter, FighterId, Result, Stance};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const STATS_QUERY: &str = "
    SELECT f.id, f.name, f.nickname, f.weight_class, f.height_cm, f.reach_cm, f.stance,
           COALESCE(f.wins, 0), COALESCE(f.losses, 0), COALESCE(f.draws, 0),
           COALESCE(f.win_by_ko, 0), COALESCE(f.win_by_submission, 0),
           COALESCE(f.win_by_decision, 0),
           COUNT(fights.id),
           COALESCE(SUM(CASE WHEN fights.winner_id = f.id THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN fights.winner_id != f.id
                             AND fights.winner_id IS NOT NULL THEN 1 ELSE 0 END), 0)
    FROM fighters f
    LEFT JOIN fights ON (f.id = fights.fighter1_id OR f.id = fights.fighter2_id)";

const FIGHTS_QUERY: &str = "
    SELECT fighter1_id, fighter2_id, winner_id, fight_date, weight_class,
           rounds, method, event_name
    FROM fights";

/// Handle to the fight store
///
/// Only the path is kept; connections are scoped to a single query.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

/// A resolved fight with both fighters' aggregated stats
#[derive(Debug, Clone)]
pub struct LabeledFight {
    pub fighter1: FighterStats,
    pub fighter2: FighterStats,
    pub fighter1_won: bool,
}

/// Fighters and fights to seed a store with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub fighters: Vec<Fighter>,
    #[serde(default)]
    pub fights: Vec<FightRecord>,
}

impl Roster {
    /// Read a roster from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Database {
    /// Point at an existing store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FightError::Config(format!(
                "Database not found at {}",
                path.display()
            )));
        }
        Ok(Database {
            path: path.to_path_buf(),
        })
    }

    /// Open or create a store and make sure the schema exists
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database {
            path: path.to_path_buf(),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect_read_only(&self) -> Result<Connection> {
        log::debug!("Opening read-only connection to {}", self.path.display());
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn connect(&self) -> Result<Connection> {
        log::debug!("Opening connection to {}", self.path.display());
        Ok(Connection::open(&self.path)?)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS fighters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE,
                nickname TEXT,
                weight_class TEXT,
                height_cm REAL,
                reach_cm REAL,
                stance TEXT,
                wins INTEGER DEFAULT 0,
                losses INTEGER DEFAULT 0,
                draws INTEGER DEFAULT 0,
                win_by_ko INTEGER DEFAULT 0,
                win_by_submission INTEGER DEFAULT 0,
                win_by_decision INTEGER DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS fights (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fighter1_id INTEGER REFERENCES fighters(id),
                fighter2_id INTEGER REFERENCES fighters(id),
                winner_id INTEGER REFERENCES fighters(id),
                fight_date TEXT,
                weight_class TEXT,
                rounds INTEGER,
                method TEXT,
                event_name TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_fights_fighter1 ON fights(fighter1_id);
            CREATE INDEX IF NOT EXISTS idx_fights_fighter2 ON fights(fighter2_id);
            "#,
        )?;
        Ok(())
    }

    // ==================== Fighter Queries ====================

    /// Get a fighter's row with record counts from the fights table
    pub fn fighter_stats(&self, id: FighterId) -> Result<Option<FighterStats>> {
        let conn = self.connect_read_only()?;
        let query = format!("{STATS_QUERY} WHERE f.id = ?1 GROUP BY f.id");
        let stats = conn
            .query_row(&query, params![id.0], Self::row_to_stats)
            .optional()?;
        Ok(stats)
    }

    /// Get stats for every fighter, keyed by id
    pub fn all_fighter_stats(&self) -> Result<HashMap<FighterId, FighterStats>> {
        let conn = self.connect_read_only()?;
        let query = format!("{STATS_QUERY} GROUP BY f.id");
        let mut stmt = conn.prepare(&query)?;
        let stats = stmt
            .query_map([], Self::row_to_stats)?
            .map(|row| row.map(|s| (s.id(), s)))
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;
        Ok(stats)
    }

    /// Get stats for every fighter, ordered by name
    pub fn list_fighters(&self) -> Result<Vec<FighterStats>> {
        let mut fighters: Vec<_> = self.all_fighter_stats()?.into_values().collect();
        fighters.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(fighters)
    }

    /// Find fighters whose name or nickname contains `query`
    ///
    /// Queries shorter than two characters match nothing.
    pub fn search_fighters(&self, query: &str, limit: usize) -> Result<Vec<FighterStats>> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let conn = self.connect_read_only()?;
        let sql = format!(
            "{STATS_QUERY} WHERE f.name LIKE ?1 OR f.nickname LIKE ?1
             GROUP BY f.id ORDER BY f.name LIMIT ?2"
        );
        let pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(&sql)?;
        let fighters = stmt
            .query_map(params![pattern, limit as i64], Self::row_to_stats)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(fighters)
    }

    fn row_to_stats(row: &rusqlite::Row) -> rusqlite::Result<FighterStats> {
        let stance: Option<String> = row.get(6)?;
        let fighter = Fighter {
            id: FighterId(row.get(0)?),
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            nickname: row.get(2)?,
            weight_class: row.get(3)?,
            height_cm: row.get(4)?,
            reach_cm: row.get(5)?,
            stance: stance.as_deref().and_then(Stance::parse),
            wins: row.get(7)?,
            losses: row.get(8)?,
            draws: row.get(9)?,
            ko_wins: row.get(10)?,
            submission_wins: row.get(11)?,
            decision_wins: row.get(12)?,
        };

        Ok(FighterStats {
            fighter,
            total_fights: row.get(13)?,
            wins: row.get(14)?,
            losses: row.get(15)?,
        })
    }

    // ==================== Fight Queries ====================

    /// Get all fights with a recorded winner, paired with both fighters' stats
    ///
    /// Fights referencing a fighter missing from the fighters table are skipped.
    pub fn labeled_fights(&self) -> Result<Vec<LabeledFight>> {
        let stats = self.all_fighter_stats()?;

        let conn = self.connect_read_only()?;
        let mut stmt = conn.prepare(
            "SELECT fighter1_id, fighter2_id, winner_id
             FROM fights
             WHERE winner_id IS NOT NULL
             ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    FighterId(row.get(0)?),
                    FighterId(row.get(1)?),
                    FighterId(row.get(2)?),
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let fights: Vec<LabeledFight> = rows
            .into_iter()
            .filter_map(|(f1, f2, winner)| {
                Some(LabeledFight {
                    fighter1: stats.get(&f1)?.clone(),
                    fighter2: stats.get(&f2)?.clone(),
                    fighter1_won: winner == f1,
                })
            })
            .collect();

        log::debug!("Loaded {} labeled fights", fights.len());
        Ok(fights)
    }

    /// Get all fights in insertion order
    pub fn fights(&self) -> Result<Vec<FightRecord>> {
        let conn = self.connect_read_only()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", FIGHTS_QUERY))?;

        let fights = stmt
            .query_map([], Self::row_to_fight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(fights)
    }

    /// Get one fighter's fights, latest fight date first.
    /// Undated fights come last, most recently recorded first.
    pub fn fighter_history(&self, id: FighterId) -> Result<Vec<FightRecord>> {
        let conn = self.connect_read_only()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE fighter1_id = ?1 OR fighter2_id = ?1 ORDER BY fight_date DESC, id DESC",
            FIGHTS_QUERY
        ))?;

        let fights = stmt
            .query_map(params![id.0], Self::row_to_fight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        log::debug!("Fighter {} has {} recorded fights", id, fights.len());
        Ok(fights)
    }

    fn row_to_fight(row: &rusqlite::Row) -> rusqlite::Result<FightRecord> {
        Ok(FightRecord {
            fighter1: FighterId(row.get(0)?),
            fighter2: FighterId(row.get(1)?),
            winner: row.get::<_, Option<i64>>(2)?.map(FighterId),
            fight_date: row.get(3)?,
            weight_class: row.get(4)?,
            rounds: row.get(5)?,
            method: row.get(6)?,
            event_name: row.get(7)?,
        })
    }

    // ==================== Seeding ====================

    /// Insert or replace a fighter row
    pub fn insert_fighter(&self, fighter: &Fighter) -> Result<()> {
        let conn = self.connect()?;
        Self::write_fighter(&conn, fighter)
    }

    /// Insert a fight, returning its row id
    pub fn insert_fight(&self, fight: &FightRecord) -> Result<i64> {
        let conn = self.connect()?;
        Self::write_fight(&conn, fight)?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a whole roster in one transaction
    pub fn import(&self, roster: &Roster) -> Result<(usize, usize)> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        for fighter in &roster.fighters {
            Self::write_fighter(&tx, fighter)?;
        }
        for fight in &roster.fights {
            Self::write_fight(&tx, fight)?;
        }
        tx.commit()?;

        log::info!(
            "Imported {} fighters and {} fights",
            roster.fighters.len(),
            roster.fights.len()
        );
        Ok((roster.fighters.len(), roster.fights.len()))
    }

    fn write_fighter(conn: &Connection, fighter: &Fighter) -> Result<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO fighters (id, name, nickname, weight_class, height_cm,
                                             reach_cm, stance, wins, losses, draws,
                                             win_by_ko, win_by_submission, win_by_decision)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                fighter.id.0,
                fighter.name,
                fighter.nickname,
                fighter.weight_class,
                fighter.height_cm,
                fighter.reach_cm,
                fighter.stance.as_ref().map(|s| s.label().to_string()),
                fighter.wins,
                fighter.losses,
                fighter.draws,
                fighter.ko_wins,
                fighter.submission_wins,
                fighter.decision_wins,
            ],
        )?;
        Ok(())
    }

    fn write_fight(conn: &Connection, fight: &FightRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO fights (fighter1_id, fighter2_id, winner_id, fight_date,
                                weight_class, rounds, method, event_name)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                fight.fighter1.0,
                fight.fighter2.0,
                fight.winner.map(|w| w.0),
                fight.fight_date,
                fight.weight_class,
                fight.rounds,
                fight.method,
                fight.event_name,
            ],
        )?;
        Ok(())
    }

    // ==================== Statistics ====================

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let conn = self.connect_read_only()?;

        let fighter_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM fighters", [], |row| row.get(0))?;
        let fight_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM fights", [], |row| row.get(0))?;
        let resolved_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM fights WHERE winner_id IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        Ok(DatabaseStats {
            fighter_count: fighter_count as usize,
            fight_count: fight_count as usize,
            resolved_fight_count: resolved_count as usize,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    pub fighter_count: usize,
    pub fight_count: usize,
    pub resolved_fight_count: usize,
}
