//! Tests for CLI argument parsing.

use std::path::Path;

use clap::Parser;

use super::cli::{Cli, Command, OutputFormatArg};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::parse_from_iter(["node-addrs", "--server", "server.json"]);

        assert_eq!(cli.server.as_deref(), Some(Path::new("server.json")));
        assert!(cli.interfaces.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_networking_options() {
        let cli = Cli::parse_from_iter([
            "node-addrs",
            "--server",
            "server.json",
            "--interfaces",
            "interfaces.json",
            "--public-network",
            "public",
            "--public-network",
            "ext-net",
            "--address-order",
            "external-v4, internal-v4",
            "--hostname-key",
            "fqdn",
        ]);

        assert_eq!(cli.interfaces.as_deref(), Some(Path::new("interfaces.json")));
        assert_eq!(cli.public_networks, ["public", "ext-net"]);
        assert_eq!(
            cli.address_order.as_deref(),
            Some("external-v4, internal-v4")
        );
        assert_eq!(cli.hostname_key.as_deref(), Some("fqdn"));
    }

    #[test]
    fn parse_boolean_flags() {
        let cli = Cli::parse_from_iter([
            "node-addrs",
            "--ipv6-disabled",
            "--ignore-port-state",
            "-v",
        ]);

        assert!(cli.ipv6_disabled);
        assert!(cli.ignore_port_state);
        assert!(cli.verbose);
    }

    #[test]
    fn flags_default_to_false() {
        let cli = Cli::parse_from_iter(["node-addrs"]);

        assert!(!cli.ipv6_disabled);
        assert!(!cli.ignore_port_state);
        assert!(!cli.verbose);
        assert!(cli.public_networks.is_empty());
    }

    #[test]
    fn parse_all_output_formats() {
        let text = Cli::parse_from_iter(["node-addrs", "--format", "text"]);
        assert_eq!(text.format, Some(OutputFormatArg::Text));

        let json = Cli::parse_from_iter(["node-addrs", "--format", "json"]);
        assert_eq!(json.format, Some(OutputFormatArg::Json));

        let template = Cli::parse_from_iter([
            "node-addrs",
            "--format",
            "template",
            "--template",
            "{{#each addresses}}{{address}}{{/each}}",
        ]);
        assert_eq!(template.format, Some(OutputFormatArg::Template));
        assert_eq!(
            template.template.as_deref(),
            Some("{{#each addresses}}{{address}}{{/each}}")
        );
    }

    #[test]
    fn parse_config_path_short_flag() {
        let cli = Cli::parse_from_iter(["node-addrs", "-c", "custom.toml"]);

        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
    }

    #[test]
    fn invalid_format_is_rejected() {
        let result = Cli::try_parse_from(["node-addrs", "--format", "yaml"]);

        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["node-addrs", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, Path::new("node-addrs.toml")),
            None => panic!("expected init command"),
        }
    }

    #[test]
    fn init_accepts_custom_output() {
        let cli = Cli::parse_from_iter(["node-addrs", "init", "-o", "custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, Path::new("custom.toml")),
            None => panic!("expected init command"),
        }
    }

    #[test]
    fn resolve_mode_is_not_init() {
        let cli = Cli::parse_from_iter(["node-addrs", "--server", "server.json"]);

        assert!(!cli.is_init());
    }
}
