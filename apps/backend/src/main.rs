use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::ai::build_generator;
use backend::config::ai::AiConfig;
use backend::config::app::AppConfig;
use backend::config::db::DbKind;
use backend::domain::SeedSource;
use backend::infra::state::build_state;
use backend::jobs::{JobContext, JobQueue, WorkerPool};
use backend::reconcile::Reconciler;
use backend::routes;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let (config, ai_config, db_kind) =
        match (AppConfig::from_env(), AiConfig::from_env(), DbKind::from_env()) {
            (Ok(config), Ok(ai), Ok(kind)) => (config, ai, kind),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                error!(error = %e, "invalid configuration");
                std::process::exit(1);
            }
        };

    if ai_config.api_key.is_none() {
        info!("AI_API_KEY not set; AI bots will use canned text");
    }
    let ai = build_generator(&ai_config);

    let app_state = match build_state()
        .with_db(db_kind)
        .with_ai(Arc::clone(&ai))
        .with_config(config.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let pool = Arc::new(WorkerPool::start(
        JobContext {
            db: app_state.db.clone(),
            ai,
            seeds: SeedSource::Entropy,
            pacing: config.pacing,
            expiry: config.expiry,
        },
        config.job_workers,
        config.job_queue_capacity,
    ));

    let cancel = CancellationToken::new();
    let reconciler = Reconciler::new(
        app_state.db.clone(),
        Arc::clone(&pool) as Arc<dyn JobQueue>,
        config.reconcile_interval,
        config.expiry,
    );
    let reconcile_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };

    info!(host = %config.host, port = config.port, "starting Turing Tag backend");

    let data = web::Data::new(app_state);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    // The server stops on SIGINT/SIGTERM; then the background side winds down.
    let result = server.await;

    cancel.cancel();
    if let Err(e) = reconcile_task.await {
        error!(error = %e, "reconciler task panicked");
    }
    pool.shutdown().await;
    info!("shutdown complete");
    result
}
