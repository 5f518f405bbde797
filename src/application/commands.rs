use std::path::PathBuf;

use anyhow::bail;
use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use yansi::Paint;

use super::views;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::answer_footer;
use crate::domain::models::ClientError;
use crate::domain::models::Credentials;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::models::NewRag;
use crate::domain::services::AppState;
use crate::domain::services::Dashboard;

/// Asks for a username and password. Returns `None` when either is blank.
/// Signing up asks for the password twice.
pub fn prompt_credentials(theme: &ColorfulTheme, signup: bool) -> Result<Option<Credentials>> {
    let mut username_input = Input::<String>::with_theme(theme)
        .with_prompt("Username")
        .allow_empty(true);
    let configured = Config::get(ConfigKey::Username);
    if !configured.is_empty() {
        username_input = username_input.with_initial_text(configured);
    }
    let username = username_input.interact_text()?;

    let mut password_input = Password::with_theme(theme)
        .with_prompt("Password")
        .allow_empty_password(true);
    if signup {
        password_input =
            password_input.with_confirmation("Confirm password", "Passwords do not match");
    }
    let password = password_input.interact()?;

    if username.trim().is_empty() || password.is_empty() {
        return Ok(None);
    }

    return Ok(Some(Credentials::new(username.trim(), &password)));
}

/// Routes a backend result through the shell, so a rejected session is
/// dropped the same way it is in interactive mode.
fn settle<T>(app_state: &mut AppState, res: Result<T, ClientError>) -> Result<T> {
    let res = app_state.observe(res);
    if let Some(notice) = app_state.take_notice() {
        views::print_warning(&format!("{notice} Run `ragdesk login` to start a new session."));
    }

    return Ok(res?);
}

fn require_session(app_state: &AppState) -> Result<()> {
    if !app_state.manager().is_authenticated() {
        bail!(ClientError::Authentication(
            "You are not logged in. Run `ragdesk login` first.".to_string()
        ));
    }

    return Ok(());
}

pub async fn login(app_state: &mut AppState) -> Result<()> {
    if app_state.manager().is_authenticated() {
        println!("Already logged in. Run `ragdesk logout` to switch accounts.");
        return Ok(());
    }

    let credentials = match prompt_credentials(&ColorfulTheme::default(), false)? {
        Some(credentials) => credentials,
        None => bail!(ClientError::Authentication(
            "Please enter both a username and password".to_string()
        )),
    };

    app_state.manager().login(&credentials).await?;
    views::print_success(&format!("Logged in as {}", credentials.username));
    return Ok(());
}

pub async fn signup(app_state: &mut AppState) -> Result<()> {
    let credentials = match prompt_credentials(&ColorfulTheme::default(), true)? {
        Some(credentials) => credentials,
        None => bail!(ClientError::Registration(
            "Please enter both a username and password".to_string()
        )),
    };

    app_state.manager().signup(&credentials).await?;
    views::print_success(&format!(
        "Account created. Logged in as {}",
        credentials.username
    ));
    return Ok(());
}

pub fn logout(app_state: &mut AppState) {
    app_state.logout();
    println!("Logged out.");
}

pub fn status(app_state: &AppState) {
    let url = Config::get(ConfigKey::ApiURL);
    if app_state.manager().is_authenticated() {
        println!("Logged in to {url}");
    } else {
        println!("Not logged in to {url}");
    }
}

pub async fn list_rags(app_state: &mut AppState) -> Result<()> {
    require_session(app_state)?;

    let mut dashboard = Dashboard::default();
    let res = dashboard.refresh(app_state.api()).await;
    settle(app_state, res)?;

    print_dashboard(&dashboard);
    return Ok(());
}

fn print_dashboard(dashboard: &Dashboard) {
    if dashboard.is_empty() {
        println!("{}", views::EMPTY_DASHBOARD);
        return;
    }

    for rag in dashboard.rags.iter() {
        println!("{}", views::rag_line(rag));
    }
}

pub async fn create_rag(
    app_state: &mut AppState,
    name: &str,
    key: Option<String>,
    documents: Vec<PathBuf>,
) -> Result<()> {
    require_session(app_state)?;

    let model = ModelName::parse(&Config::get(ConfigKey::Model)).unwrap_or(ModelName::Claude);
    let key = match key {
        Some(key) => key,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("API key for {}", model.label()))
            .allow_empty_password(true)
            .interact()?,
    };

    let rag = NewRag {
        name: name.trim().to_string(),
        model: model.to_string(),
        key,
        documents,
    };
    if !rag.is_complete() {
        bail!(ClientError::request(None, views::CREATE_INCOMPLETE));
    }
    if let Err(msg) = views::check_documents(&rag.documents) {
        bail!(ClientError::request(None, &msg));
    }

    let res = app_state.api().create_rag(&rag).await;
    let created = settle(app_state, res)?;

    views::print_success(&format!(
        "Created {} [ID: {}]",
        rag.name, created.rag_id
    ));
    return Ok(());
}

pub async fn delete_rag(app_state: &mut AppState, rag_id: &str, confirmed: bool) -> Result<()> {
    require_session(app_state)?;

    let confirmed = confirmed
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Are you sure you want to delete RAG instance {rag_id}?"
            ))
            .default(false)
            .interact()?;
    if !confirmed {
        return Ok(());
    }

    let mut dashboard = Dashboard::default();
    let res = dashboard.delete(app_state.api(), rag_id).await;
    settle(app_state, res)?;

    views::print_success(&format!("Deleted {rag_id}"));
    match &dashboard.error {
        Some(err) => views::print_warning(err),
        None => print_dashboard(&dashboard),
    }
    return Ok(());
}

pub async fn add_docs(app_state: &mut AppState, rag_id: &str, documents: Vec<PathBuf>) -> Result<()> {
    require_session(app_state)?;

    if let Err(msg) = views::check_documents(&documents) {
        bail!(ClientError::request(None, &msg));
    }

    let res = app_state.api().add_docs(rag_id, &documents).await;
    settle(app_state, res)?;

    views::print_success("Documents added successfully!");
    return Ok(());
}

pub async fn query(
    app_state: &mut AppState,
    rag_id: &str,
    text: &str,
    file: Option<PathBuf>,
) -> Result<()> {
    require_session(app_state)?;

    let res = match &file {
        Some(path) => app_state.api().file_query(rag_id, text, Some(path.as_path())).await,
        None => app_state.api().query(rag_id, text).await,
    };
    let answer = settle(app_state, res)?;

    views::print_message(&Message::answer(&answer), views::terminal_width());
    if let Some(footer) = answer_footer(&answer) {
        println!("  {}", Paint::new(footer).dimmed());
    }

    return Ok(());
}
