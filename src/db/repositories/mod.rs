pub mod anime;
pub mod genre;
