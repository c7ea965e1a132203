use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::config::DEFAULT_ENV;

pub const ARG_CONFIG_DIR: &str = "config-dir";
pub const ARG_ENV: &str = "env";
pub const ARG_RESOURCES_DIR: &str = "resources-dir";
pub const ARG_JWT_SECRET: &str = "jwt-secret";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_CONFIG_DIR)
                .long(ARG_CONFIG_DIR)
                .help("Directory holding <env>-config.properties files")
                .env("SIMPLESERVER_CONFIG_DIR")
                .default_value("config")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_ENV)
                .long(ARG_ENV)
                .help("Settings environment, selects <env>-config.properties")
                .env("SS_ENV")
                .default_value(DEFAULT_ENV),
        )
        .arg(
            Arg::new(ARG_RESOURCES_DIR)
                .long(ARG_RESOURCES_DIR)
                .help("Directory holding the catalog tab-separated files")
                .env("SIMPLESERVER_RESOURCES_DIR")
                .default_value("resources")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Override the built-in json web token signing secret")
                .env("SIMPLESERVER_JWT_SECRET")
                .hide_env_values(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub config_dir: PathBuf,
    pub env: String,
    pub resources_dir: PathBuf,
    pub jwt_secret: Option<SecretString>,
}

impl Options {
    /// Read settings-related arguments.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            config_dir: matches
                .get_one::<PathBuf>(ARG_CONFIG_DIR)
                .cloned()
                .context("missing required argument: --config-dir")?,
            env: matches
                .get_one::<String>(ARG_ENV)
                .cloned()
                .context("missing required argument: --env")?,
            resources_dir: matches
                .get_one::<PathBuf>(ARG_RESOURCES_DIR)
                .cloned()
                .context("missing required argument: --resources-dir")?,
            jwt_secret: matches
                .get_one::<String>(ARG_JWT_SECRET)
                .map(|secret| SecretString::from(secret.clone())),
        })
    }
}
