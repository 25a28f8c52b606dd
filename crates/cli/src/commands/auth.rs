//! Account commands: register, login, logout, whoami.

use feirinha_app::services::NewAccount;

use super::{CliError, Context};

/// Create an account, write its profile, and cache the credential.
pub async fn register(
    email: String,
    password: String,
    name: String,
    phone: String,
    address: String,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    let session = ctx
        .state
        .auth()
        .register(&NewAccount {
            email,
            password,
            display_name: name,
            phone,
            address,
        })
        .await?;
    ctx.cache.save(&session.token)?;

    print_signed_in(&session.email);
    Ok(())
}

/// Sign in and cache the credential.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    let session = ctx.state.auth().login(email, password).await?;
    ctx.cache.save(&session.token)?;

    print_signed_in(&session.email);
    Ok(())
}

/// Forget the cached credential.
#[allow(clippy::unused_async)]
pub async fn logout() -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    ctx.cache.clear()?;

    #[allow(clippy::print_stdout)]
    {
        println!("Signed out.");
    }
    Ok(())
}

/// Show who the cached credential belongs to.
pub async fn whoami() -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{} ({})", session.email, session.user_id);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_signed_in(email: &str) {
    println!("Signed in as {email}.");
}
