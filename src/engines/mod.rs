pub mod seeding;
pub mod evaluation;
pub mod generation;
