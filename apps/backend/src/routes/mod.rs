use actix_web::web;

pub mod games;
pub mod health;
pub mod players;

/// Register every route; shared by `main.rs` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Player routes: /api/players
    cfg.service(web::scope("/api/players").configure(players::configure_routes));

    // Games routes: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));
}
