#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use super::commands;
use super::ui;
use crate::configuration::cache_dir;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::help_text;
use crate::domain::models::ModelName;
use crate::domain::services::AppState;
use crate::domain::services::Session;
use crate::domain::services::SessionManager;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::storage::FileTokenStore;
use crate::infrastructure::storage::MemoryTokenStore;
use crate::infrastructure::storage::TokenStore;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!(
        "Created default config file at {}",
        config_file_path.display()
    );
    return Ok(());
}

/// Wires the session, the backend client and the shell together. This is the
/// only place a token store is chosen.
fn app_state(matches: &ArgMatches) -> AppState {
    let store: Arc<dyn TokenStore> = if matches.get_flag("ephemeral") {
        Arc::new(MemoryTokenStore::default())
    } else {
        Arc::new(FileTokenStore::default())
    };

    let session = Session::init(store);
    let api = ApiClient::from_config(session);

    return AppState::new(SessionManager::new(api));
}

fn arg_rag_id() -> Arg {
    return Arg::new("rag-id")
        .short('i')
        .long("id")
        .help("RAG instance ID, as shown by `rags list`.")
        .num_args(1)
        .required(true);
}

fn arg_documents() -> Arg {
    return Arg::new("documents")
        .help("Documents to upload (.pdf, .docx, .txt).")
        .num_args(1..)
        .value_parser(value_parser!(path::PathBuf))
        .required(true);
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Ragdesk")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Ragdesk with environment variable RUST_LOG=ragdesk")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_rags() -> Command {
    return Command::new("rags")
        .about("Manage RAG instances.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List your RAG instances."))
        .subcommand(
            Command::new("create")
                .about("Create a RAG instance from one or more documents.")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Display name of the RAG instance.")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .env("RAGDESK_MODEL_KEY")
                        .hide_env_values(true)
                        .help("API key for the chosen model. Prompted for when omitted.")
                        .num_args(1),
                )
                .arg(arg_documents()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a RAG instance.")
                .arg(arg_rag_id())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add-docs")
                .about("Upload more documents into an existing RAG instance.")
                .arg(arg_rag_id())
                .arg(arg_documents()),
        );
}

fn subcommand_query() -> Command {
    return Command::new("query")
        .about("Ask a RAG instance a single question.")
        .arg(arg_rag_id())
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Attach a file to this question only.")
                .num_args(1)
                .value_parser(value_parser!(path::PathBuf)),
        )
        .arg(
            Arg::new("text")
                .help("The question.")
                .num_args(1..)
                .required(true),
        );
}

fn arg_username() -> Arg {
    return Arg::new(ConfigKey::Username.to_string())
        .short('u')
        .long(ConfigKey::Username.to_string())
        .env("RAGDESK_USERNAME")
        .num_args(1)
        .help("Username prefilled on login and signup prompts.")
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("ragdesk")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the interactive client. This is the default."))
        .subcommand(Command::new("login").about("Log in and keep the session for later commands."))
        .subcommand(Command::new("signup").about("Create an account and log straight in."))
        .subcommand(Command::new("logout").about("End the current session."))
        .subcommand(Command::new("status").about("Show whether a session is active."))
        .subcommand(subcommand_rags())
        .subcommand(subcommand_query())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("RAGDESK_API_URL")
                .num_args(1)
                .help(format!("Base URL of the RAG backend. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("RAGDESK_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Model.to_string())
                .short('m')
                .long(ConfigKey::Model.to_string())
                .env("RAGDESK_MODEL")
                .num_args(1)
                .help(format!("Model preselected when creating a RAG instance. [default: {}]", Config::default(ConfigKey::Model)))
                .value_parser(PossibleValuesParser::new(ModelName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .env("RAGDESK_SESSION_FILE")
                .num_args(1)
                .help(format!("Where the session token is kept between runs. [default: {}]", Config::default(ConfigKey::SessionFile)))
                .global(true),
        )
        .arg(arg_username())
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .help("Keep the session in memory only. Nothing is written to the session file.")
                .action(ArgAction::SetTrue)
                .global(true),
        );
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => match debug_matches.subcommand() {
            Some(("log-path", _)) => {
                let log_path = env::var("RAGDESK_LOG_DIR")
                    .map(path::PathBuf::from)
                    .unwrap_or_else(|_| return cache_dir())
                    .join("debug.log");
                println!("{}", log_path.display());
            }
            Some(("enum-config", _)) => {
                println!("{}", ConfigKey::VARIANTS.join("\n"));
            }
            _ => {
                subcommand_debug().print_long_help()?;
            }
        },
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
            }
            _ => {
                subcommand_config().print_long_help()?;
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
        }
        Some(("login", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            commands::login(&mut app_state(subcmd_matches)).await?;
        }
        Some(("signup", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            commands::signup(&mut app_state(subcmd_matches)).await?;
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            commands::logout(&mut app_state(subcmd_matches));
        }
        Some(("status", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            commands::status(&app_state(subcmd_matches));
        }
        Some(("rags", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let mut state = app_state(subcmd_matches);

            match subcmd_matches.subcommand() {
                Some(("list", _)) => {
                    commands::list_rags(&mut state).await?;
                }
                Some(("create", create_matches)) => {
                    let name = create_matches
                        .get_one::<String>("name")
                        .cloned()
                        .unwrap_or_default();
                    let key = create_matches.get_one::<String>("key").cloned();
                    let documents = create_matches
                        .get_many::<path::PathBuf>("documents")
                        .map(|docs| return docs.cloned().collect::<Vec<path::PathBuf>>())
                        .unwrap_or_default();
                    commands::create_rag(&mut state, &name, key, documents).await?;
                }
                Some(("delete", delete_matches)) => {
                    let rag_id = delete_matches
                        .get_one::<String>("rag-id")
                        .cloned()
                        .unwrap_or_default();
                    commands::delete_rag(&mut state, &rag_id, delete_matches.get_flag("yes"))
                        .await?;
                }
                Some(("add-docs", add_matches)) => {
                    let rag_id = add_matches
                        .get_one::<String>("rag-id")
                        .cloned()
                        .unwrap_or_default();
                    let documents = add_matches
                        .get_many::<path::PathBuf>("documents")
                        .map(|docs| return docs.cloned().collect::<Vec<path::PathBuf>>())
                        .unwrap_or_default();
                    commands::add_docs(&mut state, &rag_id, documents).await?;
                }
                _ => {
                    subcommand_rags().print_long_help()?;
                }
            }
        }
        Some(("query", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let rag_id = subcmd_matches
                .get_one::<String>("rag-id")
                .cloned()
                .unwrap_or_default();
            let file = subcmd_matches.get_one::<path::PathBuf>("file").cloned();
            let text = subcmd_matches
                .get_many::<String>("text")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();
            commands::query(&mut app_state(subcmd_matches), &rag_id, &text, file).await?;
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            ui::start(app_state(subcmd_matches)).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
            ui::start(app_state(&matches)).await?;
        }
    }

    return Ok(());
}
