//! Quiz session flow: the pure state machine, its timers, and the actor tying them together.

mod controller;
mod engine;
mod timers;

pub use controller::{QuizController, QuizEvent};
pub use engine::{Advance, PresentedQuestion, QuizEngine, QuizPhase, QuizProgress};
pub use timers::{SessionTimers, TICK_PERIOD, TimerEvent};
