//! Titled-separation search
//!
//! - `title`: goal test
//! - `wins`: lazy edge expansion
//! - `engine`: bounded BFS with result memoization

pub mod engine;
pub mod title;
pub mod wins;

pub use engine::{SearchStats, Separation, SeparationEngine};
pub use title::{classify, is_titled, TitleSource};
pub use wins::beaten_opponents;
