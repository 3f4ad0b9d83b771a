// API server example
// Author: Gabriel Demetrios Lafis

use rust_report_engine::{api::Server, utils::init_logging, utils::ServerSettings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    if let Err(err) = init_logging(log::LevelFilter::Info) {
        eprintln!("Error initializing logger: {}", err);
    }

    let settings = ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 8080,
        workers: Some(2),
        enable_cors: true,
    };

    println!("Starting API server at http://{}:{}", settings.host, settings.port);
    println!(
        r#"Try: curl -X POST http://127.0.0.1:8080/api/v1/parameters/extract -H 'Content-Type: application/json' -d '{{"template": "SELECT * FROM t WHERE d > {{START_DATE}}"}}'"#
    );
    println!("Press Ctrl+C to stop");

    Server::new(settings).with_delimiter(';').run().await
}
