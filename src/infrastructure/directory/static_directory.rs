use crate::domain::{Role, User, UserDirectory, UserDirectoryPtr};
use std::sync::Arc;

/// Returns the built-in login directory.
///
/// | username | password  | role    |
/// |----------|-----------|---------|
/// | user1    | password1 | cadet   |
/// | user2    | password2 | captain |
pub fn create_static_directory() -> UserDirectoryPtr {
    // ---
    Arc::new(StaticUserDirectory::new(vec![
        User::new("user1", "password1", Role::Cadet),
        User::new("user2", "password2", Role::Captain),
    ]))
}

/// Fixed, in-process list of login identities.
#[derive(Debug, Clone)]
pub struct StaticUserDirectory {
    users: Vec<User>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl UserDirectory for StaticUserDirectory {
    // ---
    fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        // ---
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned()
    }
}
