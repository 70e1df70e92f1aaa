//! Command-line interface module: parse with `clap`, then security-validate
//! every path/string before it reaches compiler or runtime code.

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Compile {
        module_dir: PathBuf,
        output_dir: PathBuf,
        module_name: Option<String>,
        descriptor_file: Option<PathBuf>,
        descriptor_dir: Option<PathBuf>,
        required_service: Vec<String>,
    },
    Run {
        module_dir: PathBuf,
    },
}

pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let command = match cli.command {
        Commands::Compile { module_dir, output_dir, module_name, descriptor_file, descriptor_dir, required_service } => {
            let module_dir = SecureArgParser::validate_existing_path(&module_dir)?;
            SecureArgParser::validate_future_path(&output_dir)?;
            if let Some(name) = &module_name {
                SecureArgParser::validate_argument(name)?;
            }
            let descriptor_file = match &descriptor_file {
                Some(path) => Some(SecureArgParser::validate_existing_path(path)?),
                None => None,
            };
            let descriptor_dir = match &descriptor_dir {
                Some(path) => Some(SecureArgParser::validate_existing_path(path)?),
                None => None,
            };
            for service in &required_service {
                SecureArgParser::validate_argument(service)?;
            }
            ValidatedCommand::Compile { module_dir, output_dir, module_name, descriptor_file, descriptor_dir, required_service }
        }
        Commands::Run { module_dir } => {
            let module_dir = SecureArgParser::validate_existing_path(&module_dir)?;
            ValidatedCommand::Run { module_dir }
        }
    };

    Ok(ValidatedCli { command, verbose: cli.verbose })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_rejects_dangerous_module_name() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            verbose: false,
            command: Commands::Compile {
                module_dir: dir.path().to_path_buf(),
                output_dir: dir.path().join("out"),
                module_name: Some("evil; rm -rf /".to_string()),
                descriptor_file: None,
                descriptor_dir: None,
                required_service: vec![],
            },
        };
        assert!(validate_cli(cli).is_err());
    }

    #[test]
    fn compile_accepts_well_formed_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            verbose: false,
            command: Commands::Compile {
                module_dir: dir.path().to_path_buf(),
                output_dir: dir.path().join("out"),
                module_name: Some("ingest".to_string()),
                descriptor_file: None,
                descriptor_dir: None,
                required_service: vec!["com.acme.AService".to_string()],
            },
        };
        assert!(validate_cli(cli).is_ok());
    }

    #[test]
    fn compile_allows_module_name_to_be_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            verbose: false,
            command: Commands::Compile {
                module_dir: dir.path().to_path_buf(),
                output_dir: dir.path().join("out"),
                module_name: None,
                descriptor_file: None,
                descriptor_dir: None,
                required_service: vec![],
            },
        };
        assert!(validate_cli(cli).is_ok());
    }
}
