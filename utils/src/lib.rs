pub mod pairs;
pub mod time;
