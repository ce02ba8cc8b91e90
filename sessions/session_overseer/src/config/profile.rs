use std::str::FromStr;

/// The environment variable used to select the active [`Profile`].
pub const PROFILE_ENV_VAR: &str = "APP_ENV";

/// The set of deployment profiles the session configuration is tailored for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Local development, usually over plain HTTP.
    Development,
    /// Anything that faces real users.
    ///
    /// This is the default.
    #[default]
    Production,
}

impl Profile {
    /// Determine the active profile by reading the `APP_ENV` environment variable.
    ///
    /// If the variable is not set, it defaults to [`Profile::Production`].
    pub fn from_env() -> Result<Self, ProfileLoadError> {
        match std::env::var(PROFILE_ENV_VAR) {
            Ok(value) => Ok(value.parse()?),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ProfileLoadError::NotUnicode),
        }
    }
}

impl AsRef<str> for Profile {
    fn as_ref(&self) -> &str {
        match self {
            Profile::Development => "dev",
            Profile::Production => "prod",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for Profile {
    type Err = UnknownProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Development),
            "prod" | "production" => Ok(Profile::Production),
            _ => Err(UnknownProfileError {
                profile: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{profile}` is not a known profile. Use either `dev` or `prod`")]
/// The error returned when parsing a [`Profile`] from a string fails.
pub struct UnknownProfileError {
    pub profile: String,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`Profile::from_env`].
pub enum ProfileLoadError {
    #[error("The `APP_ENV` environment variable is not valid UTF-8")]
    NotUnicode,
    #[error("Failed to parse the `APP_ENV` environment variable")]
    Unknown(#[from] UnknownProfileError),
}
