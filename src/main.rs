use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trip_guide::Result;
use trip_guide::commands::{ask, build_index, query, serve, show_status};
use trip_guide::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "trip-guide")]
#[command(about = "A retrieval-augmented travel recommendation assistant with a web chat UI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama connection and settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Build or rebuild the vector index from the corpus
    Build {
        /// Path to the corpus CSV; persisted in the config for later runs
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Rebuild even if the index is current
        #[arg(long)]
        force: bool,
    },
    /// Retrieve the most similar documents for a query, without generation
    Query {
        /// Free-text query
        query: String,
        /// Maximum number of documents to return
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Ask a one-shot question without starting the web UI
    Ask {
        /// The travel-planning question
        question: String,
    },
    /// Start the web chat server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show detailed status of the corpus, index, and Ollama connection
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Build { corpus, force } => {
            build_index(corpus, force).await?;
        }
        Commands::Query { query: text, limit } => {
            query(&text, limit).await?;
        }
        Commands::Ask { question } => {
            ask(&question).await?;
        }
        Commands::Serve { port } => {
            serve(port).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["trip-guide", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Status);
        }
    }

    #[test]
    fn build_command_with_corpus() {
        let cli = Cli::try_parse_from(["trip-guide", "build", "--corpus", "data/spots.csv"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Build { corpus, force } = parsed.command {
                assert_eq!(corpus, Some(PathBuf::from("data/spots.csv")));
                assert!(!force);
            }
        }
    }

    #[test]
    fn build_command_with_force() {
        let cli = Cli::try_parse_from(["trip-guide", "build", "--force"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Build { corpus, force } = parsed.command {
                assert_eq!(corpus, None);
                assert!(force);
            }
        }
    }

    #[test]
    fn query_command_with_limit() {
        let cli = Cli::try_parse_from(["trip-guide", "query", "family trip", "--limit", "2"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Query { query, limit } = parsed.command {
                assert_eq!(query, "family trip");
                assert_eq!(limit, Some(2));
            }
        }
    }

    #[test]
    fn ask_command() {
        let cli = Cli::try_parse_from(["trip-guide", "ask", "where should a family go in winter?"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Ask { question } = parsed.command {
                assert_eq!(question, "where should a family go in winter?");
            }
        }
    }

    #[test]
    fn serve_command_with_port() {
        let cli = Cli::try_parse_from(["trip-guide", "serve", "--port", "9000"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Serve { port } = parsed.command {
                assert_eq!(port, Some(9000));
            }
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["trip-guide", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["trip-guide", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["trip-guide", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
