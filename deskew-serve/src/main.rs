mod meta;
mod transform;

use axum::{
    routing::{get, post},
    Router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    log::info!("🚀 Starting the server");
    log::info!("🔥 Listening on: http://0.0.0.0:3000");
    log::info!("🔧 Press Ctrl+C to stop the server");

    // build our application with its routes
    let app = Router::new()
        .route("/", get(|| async { "Welcome to Deskew!" }))
        .route("/api/v0/transform", post(transform::transform_image))
        .route("/api/v0/meta", get(meta::api_description));

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    axum::serve(listener, app).await?;

    Ok(())
}
