pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use clock::{Clock, SimulatedClock, SystemClock};
pub use config::{IntervalScaling, Sm2Config};
pub use error::{ConfigError, SchedulerError, StoreError};
pub use models::sm2::{Scheduler, calculate_next_review};
pub use models::{Card, CardId, Deck, Flashcard, LearningCard, Quality, ReviewSession, SchedulingState};
pub use store::DeckStore;
