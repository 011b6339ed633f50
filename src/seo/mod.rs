pub mod score;

pub use score::score;
