use anyhow::Result;
use tracing::info;

use marquee::{CatalogService, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("marquee=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = Config::load()?;
    info!("Starting marquee catalog shell");

    let service = CatalogService::from_config(&config).await?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["category", action] => print(&service.fetch_category(action, 1).await)?,
        ["category", action, page] => {
            print(&service.fetch_category(action, page.parse()?).await)?
        }
        ["search", query] => print(&service.search(query).await)?,
        ["detail", path] => print(&service.get_detail(path).await)?,
        ["rows", actions @ ..] if !actions.is_empty() => {
            print(&service.fetch_rows(actions).await)?
        }
        _ => {
            eprintln!(
                "Usage: marquee <category ACTION [PAGE] | search QUERY | detail PATH | rows ACTION...>"
            );
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
