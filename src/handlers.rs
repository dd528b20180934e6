pub mod auth;
pub mod health;
pub mod printer;
pub mod users;
