use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use gemini_nodes_rs::genai::Message;
use gemini_nodes_rs::nodes::{NodeRegistry, StaticHost, GOOGLE_PALM_API};
use serde_json::{json, Value};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Supply a chat model from a node and send it one prompt
    Chat {
        /// The prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Parse the prompt as a JSON message (string, object or array)
        #[arg(long)]
        json: bool,

        /// Node type to run
        #[arg(short, long, default_value = "lmChatGoogleGeminiRest")]
        node: String,

        /// Model name, overrides the parameters file
        #[arg(short, long)]
        model: Option<String>,

        /// Enable Google Search
        #[arg(long)]
        search: bool,

        /// Turn on the node's debug logging (proxy node only)
        #[arg(long)]
        debug: bool,

        /// YAML/JSON file with node parameters
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// List models available to the configured API key
    Models {
        /// Node type whose option loader to use
        #[arg(short, long, default_value = "lmChatGoogleGeminiRest")]
        node: String,
    },
    /// Print a node description as JSON
    Describe {
        /// Node type to describe
        #[arg(short, long)]
        node: String,
    },
}

fn credentials_from_env() -> anyhow::Result<Value> {
    let api_key = env::var("GOOGLE_API_KEY").context("GOOGLE_API_KEY must be set")?;
    let host = env::var("GOOGLE_API_HOST").ok();
    Ok(json!({ "apiKey": api_key, "host": host }))
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();
    let debug = matches!(args.command, Commands::Chat { debug: true, .. });
    init_logging(debug);

    let registry = NodeRegistry::with_builtin_nodes().await;

    match args.command {
        Commands::Chat {
            prompt,
            json: as_json,
            node,
            model,
            search,
            debug,
            params,
        } => {
            let mut host = match params {
                Some(path) => StaticHost::from_file(&path)
                    .with_context(|| format!("failed to load parameters from {}", path.display()))?,
                None => StaticHost::default(),
            };
            host = host.with_credentials(GOOGLE_PALM_API, credentials_from_env()?);
            if let Some(model) = model {
                host.set_parameter("modelName", json!(model));
            }
            if search {
                host.set_parameter("enableSearch", json!(true));
            }
            if debug {
                host.set_parameter("debug", json!(true));
            }

            let message = if as_json {
                serde_json::from_str::<Message>(&prompt).context("prompt is not valid JSON")?
            } else {
                Message::from(prompt)
            };

            let node = registry.require(&node).await?;
            log::info!("Using node: {}", node.description().name);

            let supplied = node.supply_data(&host, 0).await?;
            let response = supplied.response.call(&message).await?;
            println!("{}", response);
        }
        Commands::Models { node } => {
            let host =
                StaticHost::default().with_credentials(GOOGLE_PALM_API, credentials_from_env()?);
            let node = registry.require(&node).await?;
            for option in node.load_options("modelName", &host).await? {
                match option.description {
                    Some(description) => println!("{}\t{}", option.name, description),
                    None => println!("{}", option.name),
                }
            }
        }
        Commands::Describe { node } => {
            let node = registry.require(&node).await?;
            println!("{}", serde_json::to_string_pretty(node.description())?);
        }
    }

    Ok(())
}
