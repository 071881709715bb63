mod question;
mod request;
mod score;

pub use question::{Question, RawQuestion};
pub use request::{
    BatchRequest, DEFAULT_BATCH_SIZE, DEFAULT_CATEGORY, Difficulty, MAX_BATCH_SIZE, QuestionKind,
    RequestError,
};
pub use score::{HIGH_SCORE_KEY, Score};
