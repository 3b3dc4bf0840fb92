use anyhow::{Context, Result};
use colored::Colorize;
use lightbnb_db_postgres::{NewUser, PostgresLightbnbStorage};

use super::Outcome;
use crate::cli::{AddUserArgs, OutputFormat, UserArgs};
use crate::output::{print_json, print_success, user_table};

pub async fn show(
    storage: &PostgresLightbnbStorage,
    args: &UserArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let users = storage.users();
    let (user, key) = match (&args.email, args.id) {
        (Some(email), _) => (
            users.find_by_email(email).await?,
            format!("email {email}"),
        ),
        (None, Some(id)) => (users.find_by_id(id).await?, format!("id {id}")),
        (None, None) => anyhow::bail!("either --email or --id is required"),
    };

    let Some(user) = user else {
        return Ok(Outcome::NotFound(format!("No user with {key}")));
    };

    match format {
        OutputFormat::Json => print_json(&user)?,
        OutputFormat::Table => println!("{}", user_table(&user)),
    }
    Ok(Outcome::Done)
}

pub async fn add(
    storage: &PostgresLightbnbStorage,
    args: &AddUserArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let new_user = NewUser::new(&args.name, &args.email, &args.password);
    let user = storage
        .users()
        .create(&new_user)
        .await
        .context("Failed to add user")?;

    print_success(&format!("Created user {}", user.id.to_string().cyan()));
    match format {
        OutputFormat::Json => print_json(&user)?,
        OutputFormat::Table => println!("{}", user_table(&user)),
    }
    Ok(Outcome::Done)
}
