use std::fmt;

use chrono::{DateTime, Duration, Utc};
use storage::repository::Storage;
use tango_core::StudyCalendar;
use tango_core::model::{MemoryScore, Word, WordId};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    words: u32,
    history: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidWords { raw: String },
    InvalidHistory { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidWords { raw } => write!(f, "invalid --words value: {raw}"),
            ArgsError::InvalidHistory { raw } => write!(f, "invalid --history value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TANGO_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut words = std::env::var("TANGO_WORDS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(12);
        let mut history = std::env::var("TANGO_HISTORY")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(5);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--words" => {
                    let value = require_value(&mut args, "--words")?;
                    words = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidWords { raw: value.clone() })?;
                }
                "--history" => {
                    let value = require_value(&mut args, "--history")?;
                    history = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidHistory { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            words,
            history,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --words <n>               Number of sample words to upsert (default: 12)");
    eprintln!("  --history <n>             Days of study history to backfill (default: 5)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TANGO_DB_URL, TANGO_WORDS, TANGO_HISTORY");
}

const SAMPLES: [(&str, &str); 12] = [
    ("run", "走る"),
    ("eat", "食べる"),
    ("library", "図書館"),
    ("weather", "天気"),
    ("borrow", "借りる"),
    ("journey", "旅"),
    ("quiet", "静かな"),
    ("decide", "決める"),
    ("window", "窓"),
    ("practice", "練習する"),
    ("forget", "忘れる"),
    ("improve", "改善する"),
];

const SCORE_STEPS: [f64; 5] = [12.5, 37.5, 50.0, 62.5, 87.5];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let calendar = StudyCalendar::default();

    for i in 0..args.words {
        let idx = (i as usize) % SAMPLES.len();
        let (term, translation) = SAMPLES[idx];
        let score = MemoryScore::new(SCORE_STEPS[(i as usize) % SCORE_STEPS.len()])?;
        // stagger study dates over the past week, leaving every third word
        // unstudied so decay has something to count from creation
        let last_studied = if i % 3 == 2 {
            None
        } else {
            Some(calendar.date_of(now - Duration::days(i64::from(i % 7))))
        };
        let word = Word::from_persisted(
            WordId::new(u64::from(i + 1)),
            term.to_string(),
            vec![translation.to_string()],
            score,
            last_studied,
            now - Duration::days(30),
        );
        storage.words.upsert_word(&word).await?;
    }

    for i in 0..args.history {
        let date = calendar.date_of(now - Duration::days(i64::from(i)));
        for _ in 0..=(i % 3) {
            storage.daily_stats.increment_study_count(date, now).await?;
        }
    }

    println!(
        "Seeded {} words and {} days of study history into {}",
        args.words, args.history, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
