pub mod conversations;
pub mod health;
