use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use efolder_bridge::{
    cli::{Cli, Commands},
    config::{load_dotenv, EncompassConfig, ServerConfig},
    efolder::{EFolderUploader, UploadOutcome},
    encompass::{EncompassApi, EncompassClient},
    routes::create_router,
    utils::init_logger,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    // Configuration is loaded once per command and is immutable from here on
    load_dotenv();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(ServerConfig::from_env()?).await,
        Commands::Token => {
            let client = EncompassClient::new(encompass_config()?)?;
            let token = client.get_access_token().await?;
            println!("{}", token.as_str());
            Ok(())
        }
        Commands::Upload { loan_number, placeholder, file } => {
            let uploader = EFolderUploader::new(EncompassClient::new(encompass_config()?)?);
            match uploader.upload_file(&loan_number, &placeholder, &file).await? {
                UploadOutcome::Uploaded { loan_guid, document_id } => {
                    println!("Uploaded {} to loan {} (document {})", file.display(), loan_guid, document_id);
                }
                UploadOutcome::Rejected { filename } => {
                    anyhow::bail!("{} is not an accepted file type", filename);
                }
            }
            Ok(())
        }
    }
}

fn encompass_config() -> anyhow::Result<EncompassConfig> {
    let config = EncompassConfig::from_env()?;
    info!("Encompass configuration loaded: {:?}", config);
    Ok(config)
}

async fn serve(server: ServerConfig) -> anyhow::Result<()> {
    info!("Server configuration loaded: {:?}", server);
    tokio::fs::create_dir_all(&server.upload_dir).await?;

    let host: std::net::IpAddr = server.host.parse()?;
    let addr = SocketAddr::from((host, server.port));

    let state = AppState { server };
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
