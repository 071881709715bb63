#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod normalize;
pub mod session;
pub mod shuffle;
pub mod text;

pub use error::{LOAD_FAILURE_MESSAGE, LoadFailure};
pub use normalize::normalize_batch;
pub use session::QuizMachine;
pub use shuffle::{shuffle, shuffled};
