//! Library integration tests.

use packrig::PackrigError;

#[test]
fn error_types_are_public() {
    let err = PackrigError::TargetNotFound {
        path: "packrig.yml".into(),
    };
    assert!(err.to_string().contains("packrig.yml"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> packrig::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use packrig::cli::{Cli, Commands};

    let cli = Cli::parse_from(["packrig", "list", "--json"]);
    assert!(cli.command.is_some());

    if let Some(Commands::List(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected List command");
    }
}

#[test]
fn builder_is_reexported() {
    use packrig::config::BuildTarget;

    let builder = packrig::ConfigBuilder::new(BuildTarget::new("app", "./a.js")).unwrap();
    assert!(builder.loaders().is_empty());
    assert!(builder.plugins().is_empty());
}
