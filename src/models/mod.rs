//! Data models for the Bookshelf server

pub mod book;
pub mod shelf;
pub mod user;

pub use book::{Book, UpdateBook};
pub use shelf::{ShelfBook, ShelfEntry};
pub use user::{Role, User, UserClaims};
