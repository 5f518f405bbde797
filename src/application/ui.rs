use std::path::PathBuf;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use dialoguer::Select;
use strum::IntoEnumIterator;
use yansi::Paint;

use super::commands::prompt_credentials;
use super::views;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::answer_footer;
use crate::domain::models::help_text;
use crate::domain::models::Author;
use crate::domain::models::ClientError;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ModelName;
use crate::domain::models::NewRag;
use crate::domain::models::RagListItem;
use crate::domain::models::Route;
use crate::domain::models::SlashCommand;
use crate::domain::services::AppState;
use crate::domain::services::Dashboard;
use crate::infrastructure::api::file_name;

/// Passes a tracked backend result through the shell. Errors other than an
/// expired session are printed here. `None` means there is nothing to act on.
fn settle<T>(app_state: &mut AppState, res: Option<Result<T, ClientError>>) -> Option<T> {
    return match app_state.observe(res?) {
        Ok(val) => Some(val),
        Err(ClientError::AuthorizationExpired) => None,
        Err(err) => {
            views::print_error(&err);
            None
        }
    };
}

fn header(text: &str) {
    println!("\n{}", Paint::new(text).bold().underline());
}

async fn upload_documents(app_state: &mut AppState, rag_id: &str, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        views::print_warning("Select at least one document to upload");
        return;
    }
    if let Err(msg) = views::check_documents(&paths) {
        views::print_warning(&msg);
        return;
    }

    let res = app_state
        .loading
        .track(app_state.api().add_docs(rag_id, &paths))
        .await;
    if settle(app_state, res).is_some() {
        views::print_success("Documents added successfully!");
    }
}

async fn login_screen(app_state: &mut AppState, theme: &ColorfulTheme) -> Result<()> {
    let choices = ["Log in", "Sign up", "Quit"];
    let signup = match Select::with_theme(theme)
        .with_prompt("Welcome to Ragdesk")
        .default(0)
        .items(&choices)
        .interact_opt()?
    {
        Some(0) => false,
        Some(1) => true,
        _ => {
            app_state.navigate(Route::Exit);
            return Ok(());
        }
    };

    let credentials = match prompt_credentials(theme, signup)? {
        Some(credentials) => credentials,
        None => {
            views::print_warning("Please enter both a username and password");
            return Ok(());
        }
    };

    let res = if signup {
        app_state
            .loading
            .track(app_state.manager().signup(&credentials))
            .await
    } else {
        app_state
            .loading
            .track(app_state.manager().login(&credentials))
            .await
    };

    match res {
        Some(Ok(())) => {
            views::print_success(&format!("Welcome, {}!", credentials.username));
            app_state.navigate(Route::Dashboard);
        }
        Some(Err(err)) => views::print_error(&err),
        None => {}
    }

    return Ok(());
}

async fn rag_menu(
    app_state: &mut AppState,
    dashboard: &mut Dashboard,
    rag: &RagListItem,
    theme: &ColorfulTheme,
) -> Result<()> {
    let choices = ["Ask questions", "Add documents", "Delete", "Back"];
    let idx = Select::with_theme(theme)
        .with_prompt(views::rag_line(rag))
        .default(0)
        .items(&choices)
        .interact_opt()?;

    match idx {
        Some(0) => {
            app_state.navigate(Route::Query(rag.rag_id.to_string()));
        }
        Some(1) => {
            let input = Input::<String>::with_theme(theme)
                .with_prompt("Documents (.pdf, .docx, .txt), separated by spaces")
                .allow_empty(true)
                .interact_text()?;
            upload_documents(app_state, &rag.rag_id, views::parse_paths(&input)).await;
        }
        Some(2) => {
            let confirmed = Confirm::with_theme(theme)
                .with_prompt(format!(
                    "Are you sure you want to delete {}? This cannot be undone.",
                    rag.rag_name
                ))
                .default(false)
                .interact()?;
            if confirmed {
                let res = app_state
                    .loading
                    .track(dashboard.delete(app_state.api(), &rag.rag_id))
                    .await;
                if settle(app_state, res).is_some() {
                    views::print_success(&format!("Deleted {}", rag.rag_name));
                }
            }
        }
        _ => {}
    }

    return Ok(());
}

async fn dashboard_screen(
    app_state: &mut AppState,
    dashboard: &mut Dashboard,
    theme: &ColorfulTheme,
) -> Result<()> {
    let res = app_state
        .loading
        .track(dashboard.refresh(app_state.api()))
        .await;
    settle(app_state, res);
    if app_state.route != Route::Dashboard {
        return Ok(());
    }

    header("Your RAG instances");
    if dashboard.is_empty() && dashboard.error.is_none() {
        println!("{}", views::EMPTY_DASHBOARD);
    }

    let mut items = dashboard
        .rags
        .iter()
        .map(|rag| return views::rag_line(rag))
        .collect::<Vec<String>>();
    let actions = ["Create new RAG", "Refresh", "Log out", "Quit"];
    items.extend(actions.iter().map(|action| return action.to_string()));

    let idx = match Select::with_theme(theme)
        .with_prompt("What would you like to do?")
        .default(0)
        .items(&items)
        .interact_opt()?
    {
        Some(idx) => idx,
        None => {
            app_state.navigate(Route::Exit);
            return Ok(());
        }
    };

    if idx < dashboard.rags.len() {
        let rag = dashboard.rags[idx].clone();
        return rag_menu(app_state, dashboard, &rag, theme).await;
    }

    match idx - dashboard.rags.len() {
        0 => app_state.navigate(Route::Create),
        1 => {}
        2 => {
            app_state.logout();
            println!("Logged out.");
        }
        _ => app_state.navigate(Route::Exit),
    }

    return Ok(());
}

fn retry_or_back(app_state: &mut AppState, theme: &ColorfulTheme) -> Result<()> {
    let retry = Confirm::with_theme(theme)
        .with_prompt("Try again?")
        .default(true)
        .interact()?;
    if !retry {
        app_state.navigate(Route::Dashboard);
    }

    return Ok(());
}

async fn create_screen(app_state: &mut AppState, theme: &ColorfulTheme) -> Result<()> {
    header("Create a new RAG instance");

    let name = Input::<String>::with_theme(theme)
        .with_prompt("Name")
        .allow_empty(true)
        .interact_text()?;

    let models = ModelName::iter().collect::<Vec<ModelName>>();
    let labels = models
        .iter()
        .map(|model| return model.label())
        .collect::<Vec<&str>>();
    let configured = Config::get(ConfigKey::Model);
    let default_idx = models
        .iter()
        .position(|model| return model.to_string() == configured)
        .unwrap_or(0);
    let model = match Select::with_theme(theme)
        .with_prompt("Model")
        .default(default_idx)
        .items(&labels)
        .interact_opt()?
    {
        Some(idx) => models[idx].to_string(),
        None => {
            app_state.navigate(Route::Dashboard);
            return Ok(());
        }
    };

    let key = Password::with_theme(theme)
        .with_prompt("API key")
        .allow_empty_password(true)
        .interact()?;

    let documents = Input::<String>::with_theme(theme)
        .with_prompt("Documents (.pdf, .docx, .txt), separated by spaces")
        .allow_empty(true)
        .interact_text()?;

    let rag = NewRag {
        name: name.trim().to_string(),
        model,
        key,
        documents: views::parse_paths(&documents),
    };
    if !rag.is_complete() {
        views::print_warning(views::CREATE_INCOMPLETE);
        return retry_or_back(app_state, theme);
    }
    if let Err(msg) = views::check_documents(&rag.documents) {
        views::print_warning(&msg);
        return retry_or_back(app_state, theme);
    }

    let res = app_state
        .loading
        .track(app_state.api().create_rag(&rag))
        .await;
    match settle(app_state, res) {
        Some(created) => {
            views::print_success(&format!(
                "Created {} [ID: {}]",
                rag.name, created.rag_id
            ));
            app_state.navigate(Route::Dashboard);
        }
        None => {
            if app_state.route == Route::Create {
                return retry_or_back(app_state, theme);
            }
        }
    }

    return Ok(());
}

async fn query_screen(
    app_state: &mut AppState,
    dashboard: &Dashboard,
    rag_id: &str,
    theme: &ColorfulTheme,
) -> Result<()> {
    let rag_name = dashboard
        .find(rag_id)
        .map(|rag| return rag.rag_name.to_string())
        .unwrap_or_else(|| return rag_id.to_string());
    header(&format!("Chatting with {rag_name}"));
    println!("Type /help for commands, /back to return to the dashboard.");

    let width = views::terminal_width();
    let mut attachment: Option<PathBuf> = None;

    loop {
        let prompt = match &attachment {
            Some(path) => format!("{} [{}]", Author::User.to_string(), file_name(path)),
            None => Author::User.to_string(),
        };
        let text = Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        if let Some(cmd) = SlashCommand::parse(&text) {
            if cmd.is_quit() {
                app_state.navigate(Route::Exit);
                return Ok(());
            }
            if cmd.is_back() {
                app_state.navigate(Route::Dashboard);
                return Ok(());
            }
            if cmd.is_logout() {
                app_state.logout();
                println!("Logged out.");
                return Ok(());
            }
            if cmd.is_help() {
                println!("\n{}", help_text());
                continue;
            }
            if cmd.is_clear() {
                print!("\x1B[2J\x1B[1;1H");
                header(&format!("Chatting with {rag_name}"));
                continue;
            }
            if cmd.is_attach_file() {
                match cmd.args.first() {
                    Some(arg) => {
                        let path = PathBuf::from(arg);
                        if path.is_file() {
                            println!(
                                "Attached {}. It will be sent with your next question.",
                                file_name(&path)
                            );
                            attachment = Some(path);
                        } else {
                            views::print_warning(&format!("File not found: {arg}"));
                        }
                    }
                    None => {
                        attachment = None;
                        println!("Attachment removed.");
                    }
                }
                continue;
            }
            if cmd.is_add_documents() {
                let paths = cmd.args.iter().map(PathBuf::from).collect();
                upload_documents(app_state, rag_id, paths).await;
                if app_state.route != Route::Query(rag_id.to_string()) {
                    return Ok(());
                }
                continue;
            }
        }

        if text.trim().is_empty() && attachment.is_none() {
            continue;
        }
        if app_state.loading.is_loading() {
            views::print_warning("Still waiting for the previous answer");
            continue;
        }

        let file = attachment.take();
        let attached_name = file.as_ref().map(|path| return file_name(path));
        views::print_message(&Message::question(&text, attached_name.as_deref()), width);
        println!("{}", Paint::new("Thinking...").dimmed());

        let res = match &file {
            Some(path) => {
                app_state
                    .loading
                    .track(app_state.api().file_query(rag_id, &text, Some(path.as_path())))
                    .await
            }
            None => {
                app_state
                    .loading
                    .track(app_state.api().query(rag_id, &text))
                    .await
            }
        };
        let res = match res {
            Some(res) => app_state.observe(res),
            None => continue,
        };

        match res {
            Ok(answer) => {
                views::print_message(&Message::answer(&answer), width);
                if let Some(footer) = answer_footer(&answer) {
                    println!("  {}", Paint::new(footer).dimmed());
                }
            }
            Err(ClientError::AuthorizationExpired) => return Ok(()),
            Err(err) => {
                let msg = Message::new_with_type(
                    Author::Ragdesk,
                    MessageType::Error,
                    &format!("Error: {err}"),
                );
                views::print_message(&msg, width);
            }
        }
    }
}

/// Runs the interactive client until the user quits.
pub async fn start(mut app_state: AppState) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut dashboard = Dashboard::default();

    loop {
        if let Some(notice) = app_state.take_notice() {
            views::print_warning(&notice);
        }

        match app_state.route.clone() {
            Route::Login => login_screen(&mut app_state, &theme).await?,
            Route::Dashboard => dashboard_screen(&mut app_state, &mut dashboard, &theme).await?,
            Route::Create => create_screen(&mut app_state, &theme).await?,
            Route::Query(rag_id) => {
                query_screen(&mut app_state, &dashboard, &rag_id, &theme).await?
            }
            Route::Exit => return Ok(()),
        }
    }
}
