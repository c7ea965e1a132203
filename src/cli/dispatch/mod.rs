use crate::cli::{
    actions::{server, Action},
    commands::{settings::Options, ARG_PORT},
};
use anyhow::Result;

/// Turn parsed arguments into an [`Action`].
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = Options::parse(matches)?;

    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>(ARG_PORT).copied(),
        config_dir: options.config_dir,
        env: options.env,
        resources_dir: options.resources_dir,
        jwt_secret: options.jwt_secret,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    #[test]
    fn server_action_from_args() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "simpleserver",
            "-p",
            "7000",
            "--env",
            "test",
            "--jwt-secret",
            "s3cret",
        ]);

        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, Some(7000));
        assert_eq!(args.env, "test");
        assert_eq!(args.config_dir, PathBuf::from("config"));
        assert_eq!(
            args.jwt_secret.as_ref().map(|s| s.expose_secret().to_string()),
            Some("s3cret".to_string())
        );
        Ok(())
    }
}
