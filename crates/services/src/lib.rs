#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_bank;
pub mod quiz;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProviderCode, QuestionBankError};
pub use question_bank::{OpenTdbClient, OpenTdbConfig, QuestionBank};
pub use quiz::{Navigator, QuizLoopService, Screen, ScoreLedger, SummaryView};
