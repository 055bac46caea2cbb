use std::net::TcpListener;
use std::sync::Arc;

use sprintboard::configuration::get_configuration;
use sprintboard::startup::run;
use sprintboard::store::MongoCredentialStore;
use sprintboard::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let settings = match get_configuration() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // Fail fast on missing secrets or a malformed database URI
    if let Err(e) = settings.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            e.to_string(),
        ));
    }
    tracing::info!("Configuration loaded successfully");

    tracing::info!(database = %settings.database.database_name, "Connecting to MongoDB");
    let store = MongoCredentialStore::connect(&settings.database)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    let address = settings.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(
        listener,
        Arc::new(store),
        settings.jwt.clone(),
        settings.application.secure_cookies,
    )?;

    server.await
}
