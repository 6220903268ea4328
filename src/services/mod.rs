pub mod account_service;
pub mod auth_service;
pub mod catalog_service;
pub mod finder_service;
pub mod password;
pub mod role_service;
pub mod seeker_service;
pub mod validation;
