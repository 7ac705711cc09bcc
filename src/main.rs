use anyhow::{Context, anyhow, bail};
use serde::Serialize;
use user_directory::app::App;
use user_directory::application_port::UserDirectory;
use user_directory::domain_model::{Credential, User, UserId};
use user_directory::logger::*;
use user_directory::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap()?;

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let app = App::try_new(&project_settings).await?;
    let outcome = run(app.user_directory.as_ref(), cli.command).await;
    app.shutdown().await;

    outcome
}

async fn run(directory: &dyn UserDirectory, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List => print_json(&directory.fetch_all().await?)?,
        Command::Show { id } => match directory.fetch_by_id(&id).await? {
            Some(user) => print_json(&user)?,
            None => bail!("user {id} not found"),
        },
        Command::Resolve { key } => match directory.resolve_equivalent(&key).await? {
            Some(id) => println!("{id}"),
            None => bail!("no user for {key:?}"),
        },
        Command::Delete { id } => print_json(&directory.delete(&id).await?)?,
        Command::Create(args) => {
            let password = args
                .password
                .as_deref()
                .ok_or_else(|| anyhow!("--password is required to create a user"))?;
            let credential = Credential::from_plain(password)?;
            let id = match &args.id {
                Some(id) => id.clone(),
                None => UserId::derive(&args.first_name, &args.last_name, &args.nif)?,
            };
            let user = user_from_args(id.clone(), args, credential);
            directory.create(user).await?;
            println!("{id}");
        }
        Command::Update(args) => {
            let id = args
                .id
                .clone()
                .ok_or_else(|| anyhow!("--id is required to update a user"))?;
            let stored = directory
                .fetch_by_id(&id)
                .await?
                .with_context(|| format!("user {id} not found"))?;
            let credential = match args.password.as_deref() {
                Some(password) => Credential::from_plain(password)?,
                None => stored.credential,
            };
            let mut user = user_from_args(id, args, credential);
            user.registration_date = stored.registration_date;
            directory.update(user).await?;
        }
    }
    Ok(())
}

fn user_from_args(id: UserId, args: UserArgs, credential: Credential) -> User {
    User {
        id,
        national_id: args.nif,
        first_name: args.first_name,
        last_name: args.last_name,
        address: args.address,
        email: args.email,
        birth_date: args.birth_date,
        registration_date: chrono::Utc::now().date_naive(),
        credential,
        role: args.role,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
