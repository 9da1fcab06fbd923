pub mod course;
pub mod error;
pub mod moderation;
pub mod notification;
pub mod user;
