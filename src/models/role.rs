use std::fmt;

/// Which side of the platform an account is currently acting on.
///
/// Stored as a single lowercase text column, so an account can never be a
/// seeker and a finder at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Undecided,
    Seeker,
    Finder,
}

impl Role {
    /// Parses the `{role}` segment of `/set-role/{role}/`. Only the two
    /// selectable roles are accepted.
    pub fn from_selection(token: &str) -> Option<Role> {
        match token {
            "seeker" => Some(Role::Seeker),
            "finder" => Some(Role::Finder),
            _ => None,
        }
    }

    /// Initial role for a fresh signup: finder only when explicitly requested.
    pub fn for_signup(is_finder: bool) -> Role {
        if is_finder {
            Role::Finder
        } else {
            Role::Seeker
        }
    }

    /// Maps the legacy pair of role checkboxes. Both ticked has no
    /// representation and yields `None`.
    pub fn from_flags(is_finder: bool, is_seeker: bool) -> Option<Role> {
        match (is_finder, is_seeker) {
            (true, true) => None,
            (true, false) => Some(Role::Finder),
            (false, true) => Some(Role::Seeker),
            (false, false) => Some(Role::Undecided),
        }
    }

    pub fn is_seeker(self) -> bool {
        self == Role::Seeker
    }

    pub fn is_finder(self) -> bool {
        self == Role::Finder
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Undecided => "undecided",
            Role::Seeker => "seeker",
            Role::Finder => "finder",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Undecided => "No role selected",
            Role::Seeker => "Talent Seeker",
            Role::Finder => "Talent Finder",
        }
    }

    pub fn setup_path(self) -> &'static str {
        match self {
            Role::Seeker => "/seeker-setup/",
            Role::Finder => "/finder-setup/",
            Role::Undecided => "/role-selection/",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Seeker => "/seeker-dashboard/",
            Role::Finder => "/finder-dashboard/",
            Role::Undecided => "/role-selection/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
