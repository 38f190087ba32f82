#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward lookup API server binary.
//!
//! Reads `civic_map.toml` (or the file named by `CIVIC_MAP_CONFIG`) and
//! serves the `/api` routes.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    civic_map_server::run_server(None).await
}
