mod bit;
pub use bit::*;

pub mod floating_score;
pub mod input;
pub mod welcome_screen;

mod ribbit_communication;
pub use ribbit_communication::*;

mod window_resizing;
