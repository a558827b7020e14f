use std::error::Error;

use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "issues-cli")]
#[command(about = "Query a running issues-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:7000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the API description
    Describe,
    /// List the labels of a repository
    Labels { owner: String, repo: String },
    /// List the issues of a repository
    Issues {
        owner: String,
        repo: String,
        /// created, updated or comments
        #[arg(long)]
        sort: Option<String>,
        /// desc or asc
        #[arg(long)]
        direction: Option<String>,
        /// open, closed or all
        #[arg(long)]
        state: Option<String>,
        /// Comma separated label names
        #[arg(long)]
        labels: Option<String>,
        /// ISO 8601 timestamp, YYYY-MM-DDTHH:MM:SSZ
        #[arg(long)]
        since: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.as_str();

    let request = match cli.command {
        Commands::Describe => client.get(endpoint(base, &["api", ""])?),
        Commands::Labels { owner, repo } => {
            client.get(endpoint(base, &["api", &owner, &repo, "labels"])?)
        }
        Commands::Issues {
            owner,
            repo,
            sort,
            direction,
            state,
            labels,
            since,
        } => {
            let query: Vec<(&str, String)> = [
                ("sort", sort),
                ("direction", direction),
                ("state", state),
                ("since", since),
                ("labels", labels),
            ]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

            client
                .get(endpoint(base, &["api", &owner, &repo])?)
                .query(&query)
        }
    };

    print_response(request.send().await?).await
}

/// Append `segments` to the proxy URL, percent-encoding each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| format!("{} cannot be a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
