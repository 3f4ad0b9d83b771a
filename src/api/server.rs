// API server implementation
// Author: Gabriel Demetrios Lafis

use std::io;
use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpServer};
use log::info;

use super::{routes, ApiState};
use crate::utils::ServerSettings;

/// API server
pub struct Server {
    settings: ServerSettings,
    state: ApiState,
}

impl Server {
    /// Create a new API server
    pub fn new(settings: ServerSettings) -> Self {
        Server {
            settings,
            state: ApiState::default(),
        }
    }

    /// Delimiter used by `/export` when the request names none
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.state.delimiter = delimiter;
        self
    }

    pub fn address(&self) -> io::Result<SocketAddr> {
        format!("{}:{}", self.settings.host, self.settings.port)
            .parse::<SocketAddr>()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
    }

    /// Run the API server
    pub async fn run(&self) -> io::Result<()> {
        let addr = self.address()?;
        let state = self.state;
        let enable_cors = self.settings.enable_cors;
        let workers = self.settings.workers.unwrap_or_else(num_cpus::get);

        info!("Starting server at http://{} ({} workers)", addr, workers);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .app_data(web::Data::new(state))
                .wrap(Condition::new(enable_cors, cors))
                .configure(routes::configure)
        })
        .workers(workers)
        .bind(addr)?
        .run()
        .await
    }
}
