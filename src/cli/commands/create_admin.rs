//! Create-admin command handler

use anyhow::Context;

use crate::config::Config;
use crate::constants::roles::ADMIN_ROLE;
use crate::db::Store;
use crate::db::repositories::user::hash_password_blocking;
use crate::domain::validation::validate_new_user;
use crate::models::NewUser;

pub async fn cmd_create_admin(
    config: &Config,
    user_name: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let input = NewUser {
        user_name,
        email,
        password,
        profile: None,
        birthday: None,
    };

    if let Err(errors) = validate_new_user(&input, config.security.min_password_length) {
        for error in errors {
            println!("{}: {}", error.field, error.message);
        }
        anyhow::bail!("Invalid admin account");
    }

    let users = store.users();
    if users.user_name_taken(&input.user_name, None).await?
        || users
            .email_taken(&input.email.trim().to_lowercase(), None)
            .await?
    {
        anyhow::bail!("User name or email is already registered");
    }

    let role = store
        .roles()
        .get_by_name(ADMIN_ROLE)
        .await?
        .context("Admin role is missing; run migrations first")?;

    let hash = hash_password_blocking(input.password.clone(), config.security.clone()).await?;
    let user = users.create(&input, hash, role.id).await?;

    println!("Created admin '{}' (ID: {})", user.user_name, user.id);
    println!("API key: {}", user.api_key);

    Ok(())
}
