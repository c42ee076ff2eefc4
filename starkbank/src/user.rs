//! API credentials.
//!
//! A [`User`] identifies the caller (a project or an organization) and holds
//! the private key that signs outbound requests. Operations that talk to the
//! service take an optional user and fall back to the process-wide default
//! configured with [`set_default_user`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::key::PrivateKey;

/// Deployment environment of the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test environment, no real money moves.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl Environment {
    /// Base URL of the API for this environment, with a trailing slash.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.api.starkbank.com/",
            Self::Production => "https://api.starkbank.com/",
        }
    }

    /// Lowercase name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}', expected 'sandbox' or 'production'"
            )),
        }
    }
}

/// Credentials used to authenticate requests to the service.
#[derive(Debug, Clone)]
pub enum User {
    /// A project: a scoped API client inside a workspace.
    Project {
        /// Target environment.
        environment: Environment,
        /// Project id.
        id: String,
        /// Key registered for the project.
        private_key: PrivateKey,
    },
    /// An organization, optionally acting on one of its workspaces.
    Organization {
        /// Target environment.
        environment: Environment,
        /// Organization id.
        id: String,
        /// Key registered for the organization.
        private_key: PrivateKey,
        /// Workspace the organization acts on, if any.
        workspace_id: Option<String>,
    },
}

impl User {
    /// Creates project credentials.
    pub fn project(environment: Environment, id: impl Into<String>, private_key: PrivateKey) -> Self {
        Self::Project {
            environment,
            id: id.into(),
            private_key,
        }
    }

    /// Creates organization credentials without a workspace.
    pub fn organization(
        environment: Environment,
        id: impl Into<String>,
        private_key: PrivateKey,
    ) -> Self {
        Self::Organization {
            environment,
            id: id.into(),
            private_key,
            workspace_id: None,
        }
    }

    /// Scopes organization credentials to a workspace. No-op for projects.
    #[must_use]
    pub fn with_workspace(self, workspace: impl Into<String>) -> Self {
        match self {
            Self::Organization {
                environment,
                id,
                private_key,
                ..
            } => Self::Organization {
                environment,
                id,
                private_key,
                workspace_id: Some(workspace.into()),
            },
            project @ Self::Project { .. } => project,
        }
    }

    /// The environment these credentials belong to.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        match self {
            Self::Project { environment, .. } | Self::Organization { environment, .. } => {
                *environment
            }
        }
    }

    /// The private key used to sign requests.
    #[must_use]
    pub const fn private_key(&self) -> &PrivateKey {
        match self {
            Self::Project { private_key, .. } | Self::Organization { private_key, .. } => {
                private_key
            }
        }
    }

    /// Value of the `Access-Id` request header.
    #[must_use]
    pub fn access_id(&self) -> String {
        match self {
            Self::Project { id, .. } => format!("project/{id}"),
            Self::Organization {
                id,
                workspace_id: None,
                ..
            } => format!("organization/{id}"),
            Self::Organization {
                id,
                workspace_id: Some(workspace),
                ..
            } => format!("organization/{id}/workspace/{workspace}"),
        }
    }
}

static DEFAULT_USER: RwLock<Option<Arc<User>>> = RwLock::new(None);

/// Sets the process-wide default credentials.
pub fn set_default_user(user: User) {
    let mut slot = DEFAULT_USER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Arc::new(user));
}

/// Removes the process-wide default credentials.
pub fn clear_default_user() {
    let mut slot = DEFAULT_USER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

/// Returns the process-wide default credentials, if configured.
#[must_use]
pub fn default_user() -> Option<Arc<User>> {
    DEFAULT_USER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Returns `explicit` if given, else the process-wide default, else `None`
/// (anonymous access).
#[must_use]
pub fn resolve_user(explicit: Option<&User>) -> Option<Arc<User>> {
    explicit
        .map(|user| Arc::new(user.clone()))
        .or_else(default_user)
}
