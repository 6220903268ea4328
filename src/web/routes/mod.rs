pub mod auth;
pub mod finder;
pub mod home;
pub mod profile;
pub mod role;
pub mod seeker;
