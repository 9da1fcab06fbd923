pub mod moderator_auth;
pub mod request_id;
