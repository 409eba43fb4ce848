//! Session CLI commands: login, logout, whoami.

use clap::Args;
use serde::Serialize;

use ptqa_auth::rbac::{CapabilitySet, Route};
use ptqa_core::error::AppError;
use ptqa_entity::user::Principal;
use ptqa_service::Application;

use crate::output::{self, OutputFormat};

/// Arguments for login
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username
    pub username: String,
    /// Password; prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Principal with its derived capabilities
#[derive(Debug, Serialize)]
struct WhoAmI<'a> {
    principal: &'a Principal,
    capabilities: CapabilitySet,
    routes: Vec<&'static str>,
}

/// Authenticate and persist the session
pub async fn login(app: &Application, args: &LoginArgs, format: OutputFormat) -> Result<(), AppError> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Failed to read password: {}", e)))?,
    };

    let principal = app.session.login(&args.username, &password).await?;
    output::print_success(&format!(
        "Logged in as {} ({})",
        principal.name,
        principal.role.label()
    ));
    print_principal(&principal, format);
    Ok(())
}

/// End the persisted session
pub async fn logout(app: &Application) -> Result<(), AppError> {
    let was_logged_in = app.session.state().is_authenticated();
    app.session.logout().await;
    if was_logged_in {
        output::print_success("Logged out");
    } else {
        output::print_warning("No active session");
    }
    Ok(())
}

/// Show the current principal
pub fn whoami(app: &Application, format: OutputFormat) -> Result<(), AppError> {
    match app.session.principal() {
        Some(principal) => print_principal(&principal, format),
        None => output::print_warning("Not logged in or session expired"),
    }
    Ok(())
}

fn print_principal(principal: &Principal, format: OutputFormat) {
    let capabilities = CapabilitySet::resolve(Some(principal));
    let routes: Vec<&'static str> = Route::visible_routes(&capabilities)
        .iter()
        .map(|r| r.path())
        .collect();

    let fields = [
        ("Username", principal.username.clone()),
        ("Name", principal.name.clone()),
        ("Role", principal.role.label().to_string()),
        ("Can edit", yes_no(capabilities.can_edit)),
        ("Can approve budgets", yes_no(capabilities.can_approve())),
        ("Can manage budgets", yes_no(capabilities.can_manage_budget())),
        ("Routes", routes.join(" ")),
    ];
    let item = WhoAmI {
        principal,
        capabilities,
        routes,
    };
    output::print_fields(&item, &fields, format);
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
