use crate::domain_model::{Email, Nif, UserId, UserRole};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "Administer the user directory")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every user as JSON
    List,
    /// Print one user as JSON
    Show { id: UserId },
    /// Print the canonical id behind an id, NIF or email
    Resolve { key: String },
    /// Remove a user and its alternate keys
    Delete { id: UserId },
    /// Add a user; the id is derived from names and NIF when omitted
    Create(UserArgs),
    /// Replace a user's fields; the credential is kept when no password is given
    Update(UserArgs),
}

#[derive(Args, Debug)]
pub struct UserArgs {
    #[arg(long)]
    pub id: Option<UserId>,
    #[arg(long)]
    pub nif: Nif,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub email: Email,
    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: NaiveDate,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, default_value = "NORMAL")]
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_typed_fields() {
        let cli = Cli::try_parse_from([
            "user-directory",
            "--settings",
            "settings/dev.toml",
            "create",
            "--nif",
            "12345678a",
            "--first-name",
            "Ana",
            "--last-name",
            "López García",
            "--address",
            "Mayor, 1",
            "--email",
            "a@example.com",
            "--birth-date",
            "1990-05-17",
            "--password",
            "Miau#12",
        ])
        .unwrap();

        assert_eq!(cli.settings.as_deref(), Some("settings/dev.toml"));
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.nif.as_str(), "12345678A");
        assert_eq!(args.role, UserRole::Normal);
        assert!(args.id.is_none());
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(Cli::try_parse_from(["user-directory", "show", "TOOLONG"]).is_err());
        assert!(Cli::try_parse_from(["user-directory", "delete", "u0001"]).is_ok());
    }
}
