use log::info;

mod config;
mod error;
mod handlers;
mod routes;
mod state;


use config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting RSVP service");

    let config = AppConfig::from_env()?;
    let app = routes::create_router(&config);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running inside Lambda");
        lambda_http::run(app).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
        info!("Listening on {}", config.bind_addr);
        axum::serve(listener, app).await?;
    }

    Ok(())
}
