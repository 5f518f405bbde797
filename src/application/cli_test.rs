use std::path::PathBuf;

use anyhow::Result;

use super::build;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_a_query_with_attachment() -> Result<()> {
    let matches = build().try_get_matches_from([
        "ragdesk", "query", "--id", "r-1", "--file", "notes.txt", "what", "changed?",
    ])?;
    let (name, query) = matches.subcommand().unwrap();
    assert_eq!(name, "query");
    assert_eq!(query.get_one::<String>("rag-id").unwrap(), "r-1");
    assert_eq!(
        query.get_one::<PathBuf>("file").unwrap(),
        &PathBuf::from("notes.txt")
    );
    let words = query
        .get_many::<String>("text")
        .unwrap()
        .cloned()
        .collect::<Vec<String>>();
    assert_eq!(words, vec!["what", "changed?"]);
    return Ok(());
}

#[test]
fn it_requires_documents_to_create_a_rag() {
    let res = build().try_get_matches_from(["ragdesk", "rags", "create", "--name", "papers"]);
    assert!(res.is_err());
}

#[test]
fn it_rejects_unknown_models() {
    let res = build().try_get_matches_from(["ragdesk", "--model", "llama", "status"]);
    assert!(res.is_err());
}

#[test]
fn it_accepts_global_flags_after_subcommands() -> Result<()> {
    let matches =
        build().try_get_matches_from(["ragdesk", "rags", "list", "--ephemeral", "-m", "openai"])?;
    let (_, rags) = matches.subcommand().unwrap();
    let (_, list) = rags.subcommand().unwrap();
    assert!(list.get_flag("ephemeral"));
    assert_eq!(list.get_one::<String>("model").unwrap(), "openai");
    return Ok(());
}
