use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};

use super::{InvalidSessionConfig, Profile, ProfileLoadError};
use crate::SessionConfig;

/// The key, at the top level of each configuration source, that holds the session configuration.
const SESSION_KEY: &str = "session";
const ENV_PREFIX: &str = "APP_";

#[derive(Clone, Debug, Default)]
/// A utility to load [`SessionConfig`] out of layered configuration sources.
///
/// Check out [`ConfigLoader::load`] for more information.
///
/// # Example
///
/// ```rust,no_run
/// use session_overseer::config::{ConfigLoader, Profile};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new()
///     .configuration_dir("configuration")
///     .profile(Profile::Development)
///     .load()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    configuration_dir: Option<PathBuf>,
    profile: Option<Profile>,
}

impl ConfigLoader {
    /// Initialize a new [`ConfigLoader`] instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the profile manually, rather than loading it
    /// from the `APP_ENV` environment variable.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Specify the path to the directory where configuration files are stored.
    ///
    /// By default, configuration files are looked up under `configuration/`,
    /// relative to the current working directory.
    pub fn configuration_dir<Dir>(mut self, dir: Dir) -> Self
    where
        Dir: Into<PathBuf>,
    {
        self.configuration_dir = Some(dir.into());
        self
    }

    /// Load the session configuration by merging together four sources:
    ///
    /// 1. Environment variables (`APP_SESSION__*`)
    /// 2. Profile-specific configuration file (`{configuration_dir}/{profile}.yml`)
    /// 3. Base configuration file (`{configuration_dir}/base.yml`)
    /// 4. The defaults for the active profile ([`SessionConfig::for_profile`])
    ///
    /// The list above is ordered by precedence.
    /// Configuration files are optional: a missing file is skipped.
    ///
    /// The merged configuration is [validated](SessionConfig::validate) before being returned.
    pub fn load(self) -> Result<SessionConfig, ConfigLoadError> {
        let profile = match self.profile {
            Some(profile) => profile,
            None => Profile::from_env()?,
        };
        let configuration_dir = self
            .configuration_dir
            .unwrap_or_else(|| PathBuf::from("configuration"));
        let span = tracing::info_span!(
            "Loading session configuration",
            configuration.directory = %configuration_dir.display(),
            configuration.profile = %profile,
        );
        let _guard = span.enter();

        let base_filepath = configuration_dir.join("base.yml");
        let profile_filepath = configuration_dir.join(format!("{}.yml", profile.as_ref()));
        // `APP_ENV` selects the profile, it isn't a configuration value.
        let env_source = Env::prefixed(ENV_PREFIX).split("__").ignore(&["ENV"]);
        let figment = Figment::new()
            .merge(Serialized::default(
                SESSION_KEY,
                SessionConfig::for_profile(profile),
            ))
            .merge(Yaml::file(base_filepath))
            .merge(Yaml::file(profile_filepath))
            .merge(env_source);

        let config: SessionConfig = figment
            .extract_inner(SESSION_KEY)
            .map_err(|e| ConfigLoadError::Extraction(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`ConfigLoader::load`].
pub enum ConfigLoadError {
    #[error("Failed to determine the active configuration profile")]
    Profile(#[from] ProfileLoadError),
    #[error("Failed to load the session configuration")]
    Extraction(#[source] Box<figment::Error>),
    #[error("The session configuration is invalid")]
    Invalid(#[from] InvalidSessionConfig),
}
