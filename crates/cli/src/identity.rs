//! Identity from configuration.

use pipeline::{IdentityProvider, User, UserId};

use crate::config::UserConfig;

/// The user named in the config file or `STORYSEED_USER_ID`.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredIdentity {
    user: Option<User>,
}

impl ConfiguredIdentity {
    pub fn from_config(config: &UserConfig) -> Self {
        let user = config.id.as_deref().and_then(UserId::new).map(|id| User {
            display_name: config
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| id.to_string()),
            id,
        });
        Self { user }
    }
}

impl IdentityProvider for ConfiguredIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
