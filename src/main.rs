use clap::Parser;
use enrichr_bot::prelude::*;
use reqwest::Client;
use std::process::ExitCode;
use std::sync::Arc;

/// 监听 GWAS bot 的时间线，并以 Enrichr 链接和截图回复最新帖子
#[derive(Debug, Parser)]
#[command(name = "enrichr_bot", version)]
struct Cli {
    /// 只打印将要发布的回复，不调用发布接口
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "enrichr_bot=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let config = Config::from_env()?;
    let http = Arc::new(Client::new());

    let feed = Arc::new(TwitterFeedClient::new(
        http.clone(),
        config.credentials.clone(),
        &config.endpoints,
    ));
    let publisher = Arc::new(TwitterPublisher::new(
        http,
        config.credentials.clone(),
        &config.endpoints,
    ));
    let store = Arc::new(DirCheckpointStore::open(&config.storage_dir)?);

    let mode = if cli.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Publish
    };
    Bot::new(config, feed, publisher, store).run(mode).await
}
