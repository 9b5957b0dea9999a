pub use super::anime::Entity as Anime;
pub use super::genre::Entity as Genre;
