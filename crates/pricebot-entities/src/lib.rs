pub mod followed_profile;
pub mod user;
