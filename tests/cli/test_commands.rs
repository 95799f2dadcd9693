//! CLI command tests
//!
//! Output goes to stdout; these tests check the exit path (Ok/Err)
//! that decides the process status.

use crate::common::{create_test_dispatcher, ProjectFixture};
use fsgate::cli::commands::{config, list, read, search, structure};
use fsgate::cli::commands::{ConfigArgs, ListArgs, ReadArgs, SearchArgs, StructureArgs};
use fsgate::cli::OutputFormat;

fn read_args(service: &str, path: &str) -> ReadArgs {
    ReadArgs {
        service: service.to_string(),
        path: path.to_string(),
    }
}

fn search_args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        file_type: Vec::new(),
        max_results: None,
        service: None,
        files_only: false,
    }
}

#[tokio::test]
async fn test_read_succeeds_in_both_formats() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = read::execute(read_args("frontend", "README.md"), &dispatcher, format).await;
        assert!(result.is_ok(), "{format:?}: {result:?}");
    }
}

#[tokio::test]
async fn test_read_denied_is_error_in_both_formats() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let err = read::execute(read_args("frontend", "../notes.txt"), &dispatcher, format)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("ACCESS_DENIED"), "{err}");
    }
}

#[tokio::test]
async fn test_list_command() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    let args = ListArgs {
        service: "api".to_string(),
        dir: Some("src".to_string()),
    };
    assert!(list::execute(args, &dispatcher, OutputFormat::Human).await.is_ok());

    let args = ListArgs {
        service: "api".to_string(),
        dir: Some("src/lib.rs".to_string()),
    };
    let err = list::execute(args, &dispatcher, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("NOT_FOUND"), "{err}");
}

#[tokio::test]
async fn test_search_command() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    assert!(search::execute(search_args("TODO"), &dispatcher, OutputFormat::Human)
        .await
        .is_ok());

    let mut args = search_args("TODO");
    args.files_only = true;
    args.file_type = vec!["rs".to_string()];
    assert!(search::execute(args, &dispatcher, OutputFormat::Json).await.is_ok());

    let err = search::execute(search_args(""), &dispatcher, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("INVALID_PARAMS"), "{err}");
}

#[tokio::test]
async fn test_structure_command() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    assert!(
        structure::execute(StructureArgs {}, &dispatcher, OutputFormat::Human)
            .await
            .is_ok()
    );
}

#[test]
fn test_show_config_command() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = ConfigArgs { all: true };
        assert!(config::execute(args, dispatcher.services(), format).is_ok());
    }
}
