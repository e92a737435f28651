//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output
//! - `--schema <path>`: Registrations to enforce on the document

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// cmeta - inspect and edit clip metadata documents
#[derive(Parser, Debug)]
#[command(name = "cmeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Schema file whose registrations are enforced on the document
    #[arg(long, global = true, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every meta in a document
    #[command(
        name = "show",
        long_about = "List every meta in a document.\n\n\
            Each line shows the key, its type and its value in the document syntax. \
            Keys registered by the schema without the writable flag are marked \
            read-only. Schema defaults are written only when a command creates \
            a document, so a removed key stays removed.",
        after_help = "\
EXAMPLES:
    cmeta show clip.meta
    cmeta --schema title.schema.toml show clip.meta
    cmeta --json show clip.meta"
    )]
    Show {
        /// Metadata document
        file: PathBuf,
    },

    /// Print the value of one meta
    #[command(
        name = "get",
        after_help = "\
EXAMPLES:
    cmeta get clip.meta title
    cmeta --json get clip.meta markers"
    )]
    Get {
        /// Metadata document
        file: PathBuf,

        /// Meta key
        key: String,
    },

    /// Set the value of one meta
    #[command(
        name = "set",
        long_about = "Set the value of one meta.\n\n\
            The value is parsed as --type when given, else as the registered type \
            of the key, else its type is inferred (true/false, integers, decimals, \
            quoted strings, marker lists; anything else is a string). The document \
            is created if it does not exist.",
        after_help = "\
EXAMPLES:
    cmeta set clip.meta title 'Opening credits'
    cmeta set clip.meta width 1920 --type uint
    cmeta set clip.meta markers '{ flags=snappable, [1000, \"metadatas;\"] }'"
    )]
    Set {
        /// Metadata document
        file: PathBuf,

        /// Meta key
        key: String,

        /// Value, in the document value syntax
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Parse the value as this type
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        meta_type: Option<String>,
    },

    /// Remove one meta
    #[command(name = "unset")]
    Unset {
        /// Metadata document
        file: PathBuf,

        /// Meta key
        key: String,
    },

    /// Merge a serialized document into a document
    #[command(
        name = "import",
        long_about = "Merge a serialized document into a document.\n\n\
            Every key that the document's registrations accept is written; refused \
            keys are listed. With --strict (or `strict_import = true` in the \
            configuration) any refused key fails the import and leaves the file \
            unchanged.",
        after_help = "\
EXAMPLES:
    cmeta import clip.meta 'metadatas, title=(string)\"Intro\", rating=(int)4;'
    cmeta import clip.meta --from exported.meta --strict"
    )]
    #[command(group(ArgGroup::new("source").required(true).args(["text", "from"])))]
    Import {
        /// Metadata document
        file: PathBuf,

        /// Serialized document to merge
        text: Option<String>,

        /// Read the serialized document from a file
        #[arg(long, value_name = "PATH")]
        from: Option<PathBuf>,

        /// Fail if any key is refused
        #[arg(long)]
        strict: bool,
    },

    /// Validate a document against the schema
    #[command(
        name = "check",
        long_about = "Validate a document against the schema.\n\n\
            Parses the document and applies every registration of the global \
            configuration and --schema. Exits non-zero if the document does not \
            parse or holds a value whose type contradicts a registration."
    )]
    Check {
        /// Metadata document
        file: PathBuf,
    },

    /// Print a document in canonical form
    #[command(
        name = "normalize",
        long_about = "Print a document in canonical form.\n\n\
            Keys are sorted and every value carries its type annotation. Legacy \
            type names and untyped values are rewritten to their canonical form.",
        after_help = "\
EXAMPLES:
    cmeta normalize clip.meta
    cmeta normalize clip.meta --write"
    )]
    Normalize {
        /// Metadata document
        file: PathBuf,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// List the registered keys of the configuration and schema
    #[command(name = "registered")]
    Registered,

    /// Add a registration to a schema file
    #[command(
        name = "register",
        long_about = "Add a registration to a schema file.\n\n\
            The schema file is created if needed. An existing registration of the \
            same key is replaced.",
        after_help = "\
EXAMPLES:
    cmeta register title.schema.toml width --type int --default 1920
    cmeta register title.schema.toml ges:uri --type string --flags readable"
    )]
    Register {
        /// Schema file to edit
        schema_file: PathBuf,

        /// Meta key
        key: String,

        /// Registered type
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        meta_type: String,

        /// Permission flags
        #[arg(long, value_delimiter = ',', default_values = ["readable", "writable"])]
        flags: Vec<String>,

        /// Default value, in the document value syntax
        #[arg(long, allow_hyphen_values = true)]
        default: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for cmeta commands.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    cmeta completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    cmeta completion zsh >> ~/.zshrc

    # Fish
    cmeta completion fish > ~/.config/fish/completions/cmeta.fish

    # PowerShell
    cmeta completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn import_requires_a_source() {
        assert!(Cli::try_parse_from(["cmeta", "import", "f.meta"]).is_err());
        assert!(Cli::try_parse_from(["cmeta", "import", "f.meta", "metadatas;"]).is_ok());
        assert!(Cli::try_parse_from(["cmeta", "import", "f.meta", "--from", "x"]).is_ok());
        assert!(
            Cli::try_parse_from(["cmeta", "import", "f.meta", "metadatas;", "--from", "x"])
                .is_err()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cmeta", "show", "f.meta", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn register_flags_default() {
        let cli =
            Cli::try_parse_from(["cmeta", "register", "s.toml", "k", "--type", "int"]).unwrap();
        match cli.command {
            Command::Register { flags, .. } => assert_eq!(flags, vec!["readable", "writable"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn negative_values() {
        let cli = Cli::try_parse_from(["cmeta", "set", "f.meta", "offset", "-5"]).unwrap();
        match cli.command {
            Command::Set { value, .. } => assert_eq!(value, "-5"),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
