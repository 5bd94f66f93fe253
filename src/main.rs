use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flashcards_srs::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flashcards-srs", about = "SM-2 spaced repetition scheduler", version)]
struct Cli {
    /// JSON file with scheduler tuning (defaults to standard SM-2)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next schedule for a single review
    Review {
        #[arg(long, default_value_t = 0)]
        repetitions: u32,
        #[arg(long, default_value_t = 2.5)]
        easiness: f64,
        #[arg(long, default_value_t = 1)]
        interval: u32,
        /// Recall quality, 0 (blackout) to 5 (perfect)
        #[arg(long, allow_negative_numbers = true)]
        quality: i64,
    },

    /// Simulate daily review sessions over a sample deck
    Simulate {
        /// Number of days to simulate
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Grades applied in turn to every review, e.g. "5,4,2,3"
        #[arg(long, value_delimiter = ',', default_values_t = vec![5, 4, 3, 2])]
        grades: Vec<i64>,
        /// Upper bound on retry rounds per daily session
        #[arg(long, default_value_t = 5)]
        max_rounds: usize,
    },
}

const SAMPLE_DECK: &str = "Polish Vocabulary";
const SAMPLE_CARDS: [(&str, &str); 5] = [
    ("cześć", "hello"),
    ("dziękuję", "thank you"),
    ("proszę", "please"),
    ("tak", "yes"),
    ("nie", "no"),
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Sm2Config::from_json_file(path)
            .with_context(|| format!("failed to load config from '{}'", path.display()))?,
        None => Sm2Config::default(),
    };
    let scheduler = Scheduler::new(config);

    match cli.command {
        Command::Review {
            repetitions,
            easiness,
            interval,
            quality,
        } => {
            let current = SchedulingState {
                repetitions,
                easiness_factor: easiness,
                interval_days: interval,
                next_review_at: SystemClock.now(),
            };
            let next = scheduler.review_at(&current, quality, &SystemClock)?;
            print_state(&next);
        }
        Command::Simulate {
            days,
            grades,
            max_rounds,
        } => {
            if grades.is_empty() {
                bail!("at least one grade is required");
            }
            for &grade in &grades {
                Quality::new(grade)?;
            }
            simulate(scheduler, days, &grades, max_rounds)?;
        }
    }

    Ok(())
}

fn print_state(state: &SchedulingState) {
    println!("repetitions:     {}", state.repetitions);
    println!("easiness factor: {:.2}", state.easiness_factor);
    println!("interval:        {} days", state.interval_days);
    println!("next review:     {}", format_date(state.next_review_at));
}

/// Formats a timestamp as YYYY-MM-DD
fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

fn simulate(scheduler: Scheduler, days: u32, grades: &[i64], max_rounds: usize) -> anyhow::Result<()> {
    let mut clock = SimulatedClock::new(SystemClock.now());
    let mut store = DeckStore::new(scheduler);

    let config = store.scheduler().config();
    println!(
        "Config: initial EF {:.2}, minimum EF {:.2}, steps {}/{} days, lapse {} days, scaling {:?}",
        config.initial_easiness,
        config.minimum_easiness,
        config.first_interval_days,
        config.second_interval_days,
        config.lapse_interval_days,
        config.interval_scaling
    );

    store.new_deck(SAMPLE_DECK)?;
    for (term, definition) in SAMPLE_CARDS {
        store.add_flashcard(SAMPLE_DECK, term, definition, clock.now())?;
    }

    let mut grade_cycle = grades.iter().copied().cycle();
    for day in 1..=days {
        let now = clock.now();
        let mut session = ReviewSession::start(&store, SAMPLE_DECK, now)?;
        let due = session.total_count();
        let mut reviews = 0;

        while !session.is_completed() && session.round_number <= max_rounds {
            if let Some(grade) = grade_cycle.next() {
                session.grade_current_card(&mut store, grade, now)?;
                reviews += 1;
            }
            session.next_card();
        }

        if due > 0 {
            println!(
                "Day {:>3} ({}): {} due, {} reviews, {} rounds",
                day,
                format_date(now),
                due,
                reviews,
                session.round_number
            );
        }
        clock.advance_day();
    }

    println!();
    for card in store.cards_for_deck(SAMPLE_DECK)? {
        println!(
            "{:<10} reps {:>2}  EF {:.2}  interval {:>4} days  next {}",
            card.flashcard.term,
            card.schedule.repetitions,
            card.schedule.easiness_factor,
            card.schedule.interval_days,
            format_date(card.schedule.next_review_at)
        );
    }
    Ok(())
}
