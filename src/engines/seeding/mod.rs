pub mod timing;
pub mod webster;
pub mod population;

pub use population::generate_population;
pub use webster::{WebsterDraw, WebsterSeeder, DEFAULT_MAX_ATTEMPTS};
