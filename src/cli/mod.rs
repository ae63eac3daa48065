use clap::{Parser, Subcommand};

use crate::config;
use crate::server;

#[derive(Parser)]
#[command(name = "besq-chart-api")]
#[command(about = "Role-gated production chart API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the users table and seed default accounts, then exit")]
    Seed,

    #[command(about = "Print an argon2id hash for a password")]
    HashPassword {
        #[arg(help = "Password to hash")]
        password: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::serve(config).await,
        Commands::Seed => {
            config.validate()?;
            let users = server::open_credentials(config).await?;
            server::seed(config, &users).await
        }
        Commands::HashPassword { password } => {
            println!("{}", crate::auth::hash_password(&password)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["besq-chart-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_hash_password() {
        let cli = Cli::try_parse_from(["besq-chart-api", "hash-password", "123456"]).unwrap();
        assert_eq!(cli.command, Some(Commands::HashPassword { password: "123456".into() }));
    }
}
