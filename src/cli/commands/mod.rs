pub mod check;
pub mod scrape;
pub mod verify;
