//! Fight Prediction CLI
//!
//! Predicts the winner of a matchup from stored fight history, using a
//! freshly trained classifier or a heuristic score when history is thin.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use fightcast::predict::MatchResponse;
use fightcast::{Config, Result};

const USAGE: &str =
    "Usage: fightcast predict <FIGHTER1_ID> <FIGHTER2_ID> [WEIGHT_CLASS] [ROUNDS]";

#[derive(Parser)]
#[command(name = "fightcast")]
#[command(about = "Fight outcome prediction from historical records", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Database path (overrides the config file)
    #[arg(long)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the winner of a fight
    Predict {
        /// First fighter id
        fighter1: i64,
        /// Second fighter id
        fighter2: i64,
        /// Weight class, echoed in the result
        weight_class: Option<String>,
        /// Scheduled rounds
        #[arg(default_value_t = 3)]
        rounds: u32,
        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show database status
    Status,
    /// List all fighters with their records
    Fighters,
    /// Find fighters by name or nickname
    Search {
        /// At least two characters
        query: String,
        /// Maximum number of matches
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show a fighter's fights
    History {
        /// Fighter id
        fighter: i64,
    },
    /// Seed the database from a JSON roster
    Import {
        /// Roster file with `fighters` and `fights` arrays
        file: String,
    },
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Unknown format: {}. Use json or table.", s)),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                eprint!("{}", err.render());
                println!("{}", commands::to_json(&MatchResponse::error(USAGE)));
                std::process::exit(1);
            }
        },
    };

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    if let Some(path) = cli.database {
        config.data.database_path = path;
    }

    // Run command
    let result = match cli.command {
        Commands::Predict {
            fighter1,
            fighter2,
            weight_class,
            rounds,
            format,
        } => commands::predict(
            &config,
            fighter1,
            fighter2,
            weight_class.unwrap_or_default(),
            rounds,
            format,
        ),
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
            DataCommands::Fighters => commands::data_fighters(&config),
            DataCommands::Search { query, limit } => commands::data_search(&config, &query, limit),
            DataCommands::History { fighter } => commands::data_history(&config, fighter),
            DataCommands::Import { file } => commands::data_import(&config, &file),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use fightcast::data::{Database, Roster};
    use fightcast::features::FighterStats;
    use fightcast::predict::inference::error_response;
    use fightcast::predict::{format_prediction, Predictor};
    use fightcast::FighterId;

    pub fn to_json(response: &MatchResponse) -> String {
        serde_json::to_string_pretty(response)
            .unwrap_or_else(|e| format!("{{\"error\": \"Prediction error: {}\"}}", e))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        // Create data directory
        let db_path = std::path::Path::new(&config.data.database_path);
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
            println!("Created {}/ directory", dir.display());
        }

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'fightcast data import roster.json' to load fighters and fights");
        println!("  3. Run 'fightcast data search <NAME>' to look up fighter ids");
        println!("  4. Run 'fightcast predict <ID1> <ID2>' to make predictions");

        Ok(())
    }

    pub fn predict(
        config: &Config,
        fighter1: i64,
        fighter2: i64,
        weight_class: String,
        rounds: u32,
        format: OutputFormat,
    ) -> Result<()> {
        let response = match Database::open(&config.data.database_path) {
            Ok(db) => Predictor::new(db, config.training.clone()).respond(
                FighterId(fighter1),
                FighterId(fighter2),
                &weight_class,
                rounds,
            ),
            Err(e) => error_response(&e),
        };
        if response.is_error() {
            log::debug!("Prediction for {} vs {} returned an error record", fighter1, fighter2);
        }

        match format {
            OutputFormat::Json => println!("{}", to_json(&response)),
            OutputFormat::Table => match &response {
                MatchResponse::Prediction(prediction) => print!("{}", format_prediction(prediction)),
                MatchResponse::Error { error } => println!("Error: {}", error),
            },
        }

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:      {}", db.path().display());
        println!("  Fighters:  {}", stats.fighter_count);
        println!("  Fights:    {}", stats.fight_count);
        println!("  Resolved:  {}", stats.resolved_fight_count);

        if stats.resolved_fight_count < config.training.min_samples {
            println!(
                "\nFewer than {} resolved fights: predictions use the heuristic fallback",
                config.training.min_samples
            );
        }

        Ok(())
    }

    fn print_fighters(fighters: &[FighterStats]) {
        println!(
            "{:>6}  {:<28} {:<20} {:>7} {:>8}",
            "ID", "Name", "Nickname", "Fights", "Win %"
        );
        println!("{}", "─".repeat(74));
        for f in fighters {
            println!(
                "{:>6}  {:<28} {:<20} {:>7} {:>7.1}%",
                f.id().0,
                f.name(),
                f.fighter.nickname.as_deref().unwrap_or("-"),
                f.total_fights,
                f.win_rate() * 100.0
            );
        }
    }

    pub fn data_fighters(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let fighters = db.list_fighters()?;

        if fighters.is_empty() {
            println!("No fighters in database. Run 'fightcast data import <FILE>' first.");
            return Ok(());
        }

        print_fighters(&fighters);
        println!("\n{} fighters", fighters.len());
        Ok(())
    }

    pub fn data_search(config: &Config, query: &str, limit: usize) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let fighters = db.search_fighters(query, limit)?;

        if fighters.is_empty() {
            println!("No fighters matching '{}'", query);
            return Ok(());
        }

        print_fighters(&fighters);
        Ok(())
    }

    pub fn data_history(config: &Config, fighter: i64) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let id = FighterId(fighter);
        let stats = db
            .fighter_stats(id)?
            .ok_or(fightcast::FightError::FighterNotFound(id))?;
        let names = db.all_fighter_stats()?;
        let name_of = |id: FighterId| {
            names
                .get(&id)
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| id.to_string())
        };

        println!(
            "{} ({}-{}, {} fights)",
            stats.name(),
            stats.wins,
            stats.losses,
            stats.total_fights
        );
        println!("───────────────────────────────");
        for fight in db.fighter_history(id)? {
            let opponent = if fight.fighter1 == id {
                fight.fighter2
            } else {
                fight.fighter1
            };
            let outcome = match fight.winner {
                Some(winner) if winner == id => "W",
                Some(_) => "L",
                None => "-",
            };
            println!(
                "  {}  vs {:<28} {:<12} {}",
                outcome,
                name_of(opponent),
                fight.method.as_deref().unwrap_or(""),
                fight.fight_date.as_deref().unwrap_or("")
            );
        }

        Ok(())
    }

    pub fn data_import(config: &Config, file: &str) -> Result<()> {
        let roster = Roster::load(file)?;
        let db = Database::create(&config.data.database_path)?;

        let (fighters, fights) = db.import(&roster)?;
        println!(
            "Imported {} fighters and {} fights into {}",
            fighters, fights, config.data.database_path
        );

        Ok(())
    }
}
