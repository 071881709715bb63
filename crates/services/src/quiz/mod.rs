mod ledger;
mod navigation;
mod workflow;

// Public API of the quiz subsystem.
pub use ledger::{DEFAULT_IO_TIMEOUT, ScoreLedger};
pub use navigation::{Navigator, Screen, SummaryView};
pub use workflow::QuizLoopService;
