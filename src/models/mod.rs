pub mod accounts;
pub mod finder_profiles;
pub mod interests;
pub mod opportunity_types;
pub mod role;
pub mod seeker_profiles;
pub mod sessions;

pub use accounts::AccountsRow;
pub use finder_profiles::FinderProfilesRow;
pub use interests::InterestRow;
pub use opportunity_types::OpportunityTypeRow;
pub use role::Role;
pub use seeker_profiles::SeekerProfilesRow;
pub use sessions::SessionsRow;
