pub mod scrap;
pub mod story;
