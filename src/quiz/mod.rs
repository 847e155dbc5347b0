//! Quiz mode: question sequencing, answer sets, score tracking

pub mod controller;

pub use controller::{AnswerOutcome, Question, QuizController, QuizPhase};
