pub mod escape;
pub mod generator;
pub mod movie;
pub mod page;
pub mod repair;
pub mod sitemap;
pub mod slug;
pub mod source;
