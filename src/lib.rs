//! Pipeline CRM for a financial advisory practice.
//!
//! With the `data` feature the crate provides the domain model, the Diesel
//! repository, the change feed, the client directory and the services. The
//! default `server` feature adds the actix-web JSON API and webhook delivery.

#[cfg(feature = "data")]
pub mod changes;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod delivery;
#[cfg(feature = "data")]
pub mod directory;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
#[cfg(all(test, feature = "data"))]
mod test_support;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};
    use log::{error, info};

    use crate::changes::ChangeFeed;
    use crate::db::establish_connection_pool;
    use crate::delivery::webhook::WebhookDelivery;
    use crate::directory::{ClientDirectory, spawn_listener};
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let changes = ChangeFeed::default();
        let repo = DieselRepository::with_changes(pool, changes.clone());

        let directory = Arc::new(ClientDirectory::new(repo.clone()));
        match directory.refresh() {
            Ok(snapshot) => info!("Loaded {} clients", snapshot.entries().len()),
            Err(e) => error!("Starting with an empty client directory: {e}"),
        }
        let _listener = spawn_listener(&directory, &changes);

        let mut delivery = WebhookDelivery::new(server_config.delivery_webhook_url.clone());
        if let Some(secs) = server_config.delivery_timeout_secs {
            delivery = delivery.with_timeout(Duration::from_secs(secs));
        }

        let bind_address = (server_config.address.clone(), server_config.port);
        let directory = web::Data::from(directory);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .app_data(web::Data::new(repo.clone()))
                .app_data(directory.clone())
                .app_data(web::Data::new(delivery.clone()))
                .app_data(web::Data::new(server_config.clone()))
                .configure(routes::configure)
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
