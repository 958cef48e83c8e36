//! Route table assembled from the resource descriptors.

use crate::handlers;
use crate::request_log::log_request;
use crate::state::AppState;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use clinica_core::{Laboratorio, Laboratory, Resource, Sample};

/// Builds the full API router over the shared store.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes::<Laboratorio>())
        .merge(resource_routes::<Laboratory>())
        .merge(resource_routes::<Sample>())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// The six routes every resource exposes.
fn resource_routes<R: Resource>() -> Router<AppState> {
    let descriptor = R::descriptor();
    Router::new()
        .route(
            descriptor.route_prefix,
            get(handlers::list::<R>).post(handlers::create::<R>),
        )
        .route(
            &descriptor.item_route(),
            get(handlers::get_one::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .route(&descriptor.filter_route(), get(handlers::filter::<R>))
}
