pub mod card;
pub mod deck;
pub mod flashcard;
pub mod learning_card;
pub mod quality;
pub mod review_session;
pub mod scheduling_state;
pub mod sm2;

pub use card::{Card, CardId};
pub use deck::Deck;
pub use flashcard::Flashcard;
pub use learning_card::LearningCard;
pub use quality::Quality;
pub use review_session::ReviewSession;
pub use scheduling_state::SchedulingState;
