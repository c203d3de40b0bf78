//! Configuration for route matching, and a utility to load it hierarchically.
//!
//! [`RoutingConfig`] controls how request paths are matched against route templates.
//! [`ConfigLoader`] assembles it (or any other deserializable type) from YAML files and
//! environment variables.
use std::path::PathBuf;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
/// How request paths are matched against route templates.
///
/// # Example
///
/// ```yaml
/// # base.yml
/// case_sensitive: false
/// trailing_slash: strict
/// ```
pub struct RoutingConfig {
    /// If `true`, literal segments must match the request path exactly.
    /// If `false` (the default), literals are compared ignoring ASCII case.
    pub case_sensitive: bool,
    /// How a trailing `/` in the request path is treated.
    pub trailing_slash: TrailingSlash,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a trailing `/` in the request path is treated.
pub enum TrailingSlash {
    /// `/about/` matches the same templates as `/about`.
    #[default]
    Ignore,
    /// The trailing `/` must agree with the template: `/about/` matches `/about/`,
    /// or templates that accept an empty last segment (e.g. catch-alls), but not `/about`.
    Strict,
}

static PROFILE_ENV_VAR: &str = "ROUTEPLAN_PROFILE";
static ENV_PREFIX: &str = "ROUTEPLAN_";

#[derive(Clone, Debug, Default)]
/// A utility to load hierarchical configuration.
///
/// # Example
///
/// ```rust,no_run
/// use routeplan::config::{ConfigLoader, RoutingConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config: RoutingConfig = ConfigLoader::new()
///     .configuration_dir("configuration")
///     .profile("dev")
///     .load()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    configuration_dir: Option<PathBuf>,
    profile: Option<String>,
}

impl ConfigLoader {
    /// Initialize a new [`ConfigLoader`] instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the profile manually, rather than loading it
    /// from the `ROUTEPLAN_PROFILE` environment variable.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Specify the path to the directory where configuration files are stored.
    ///
    /// By default, configuration files are looked up under `configuration/`.
    pub fn configuration_dir<Dir>(mut self, dir: Dir) -> Self
    where
        Dir: Into<PathBuf>,
    {
        self.configuration_dir = Some(dir.into());
        self
    }

    /// Load the configuration by merging together three sources:
    ///
    /// 1. Environment variables (`ROUTEPLAN_*`, using `__` to separate nested keys)
    /// 2. Profile-specific configuration file (`{configuration_dir}/{profile}.yml`)
    /// 3. Base configuration file (`{configuration_dir}/base.yml`)
    ///
    /// The list above is ordered by precedence: environment variables take precedence
    /// over profile-specific configuration files, which in turn take precedence
    /// over the base configuration file.
    ///
    /// Missing files are skipped.
    /// If no profile was specified and `ROUTEPLAN_PROFILE` is not set, only the base file
    /// and the environment are considered.
    pub fn load<Config>(self) -> Result<Config, ConfigLoadError>
    where
        Config: DeserializeOwned,
    {
        let profile = self
            .profile
            .or_else(|| std::env::var(PROFILE_ENV_VAR).ok());
        let configuration_dir = self
            .configuration_dir
            .unwrap_or_else(|| PathBuf::from("configuration"));
        let span = tracing::info_span!(
            "Loading configuration",
            configuration.directory = %configuration_dir.display(),
            configuration.profile = ?profile,
        );
        let _guard = span.enter();

        let mut figment = Figment::new().merge(Yaml::file(configuration_dir.join("base.yml")));
        if let Some(profile) = &profile {
            figment = figment.merge(Yaml::file(
                configuration_dir.join(format!("{profile}.yml")),
            ));
        }
        let env_source = Env::prefixed(ENV_PREFIX)
            .split("__")
            // `ROUTEPLAN_PROFILE` selects the profile, it is not a configuration value.
            .ignore(&["profile"]);
        figment = figment.merge(env_source);

        figment
            .extract()
            .context("Failed to load hierarchical configuration")
            .map_err(ConfigLoadError)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to load configuration")]
/// The error returned by [`ConfigLoader::load`].
pub struct ConfigLoadError(#[source] anyhow::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RoutingConfig::default();
        assert!(!config.case_sensitive);
        assert_eq!(config.trailing_slash, TrailingSlash::Ignore);
    }

    #[test]
    fn layers_are_merged_by_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("base.yml", "case_sensitive: true\ntrailing_slash: strict")?;
            jail.create_file("dev.yml", "case_sensitive: false")?;
            jail.set_env("ROUTEPLAN_TRAILING_SLASH", "ignore");

            let config: RoutingConfig = ConfigLoader::new()
                .configuration_dir(".")
                .profile("dev")
                .load()
                .unwrap();
            assert_eq!(
                config,
                RoutingConfig {
                    case_sensitive: false,
                    trailing_slash: TrailingSlash::Ignore,
                }
            );
            Ok(())
        });
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config: RoutingConfig = ConfigLoader::new()
                .configuration_dir("does-not-exist")
                .profile("prod")
                .load()
                .unwrap();
            assert_eq!(config, RoutingConfig::default());
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_reported() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("base.yml", "trailing_slash: sometimes")?;
            let err = ConfigLoader::new()
                .configuration_dir(".")
                .profile("dev")
                .load::<RoutingConfig>()
                .unwrap_err();
            insta::assert_snapshot!(err, @"Failed to load configuration");
            Ok(())
        });
    }
}
