use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::accounts::{
        AccountsService, PgAccountsService, data::NewAccount, records::AccountUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateAccountArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Unique username (stored lowercased)
    #[arg(long)]
    username: String,

    /// Unique email address (stored lowercased)
    #[arg(long)]
    email: String,

    /// Grant access to catalog and order administration
    #[arg(long)]
    admin: bool,
}

pub(crate) async fn run(args: CreateAccountArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAccountsService::new(Db::new(pool));

    let registered = service
        .register_account(NewAccount {
            uuid: AccountUuid::new(),
            username: args.username,
            email: args.email,
            is_admin: args.admin,
        })
        .await
        .map_err(|error| format!("failed to create account: {error}"))?;

    println!("account_uuid: {}", registered.account.uuid);
    println!("username: {}", registered.account.username);
    println!("email: {}", registered.account.email);
    println!("admin: {}", registered.account.is_admin);
    println!("api_token: {}", registered.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
