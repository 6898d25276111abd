use board_core::UserProfile;

use std::collections::HashMap;

/// Read-only lookup of known users by email, supplied by the identity
/// source. Assignee emails that do not resolve here are tolerated: they
/// cost nothing and receive no notifications.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    by_email: HashMap<String, UserProfile>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            by_email: profiles
                .into_iter()
                .map(|p| (p.email.clone(), p))
                .collect(),
        }
    }

    pub fn insert(&mut self, profile: UserProfile) {
        self.by_email.insert(profile.email.clone(), profile);
    }

    pub fn by_email(&self, email: &str) -> Option<&UserProfile> {
        self.by_email.get(email)
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}
