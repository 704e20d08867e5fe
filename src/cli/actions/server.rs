use crate::api;
use crate::api::handlers::auth::AuthConfig;
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::ExposeSecret;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            frontend_url,
        } => {
            // Validate the DSN shape before handing it to the pool.
            Url::parse(dsn.expose_secret())?;

            let auth_config = AuthConfig::new(frontend_url);

            api::new(port, dsn.expose_secret().to_string(), auth_config).await?;
        }
    }

    Ok(())
}
