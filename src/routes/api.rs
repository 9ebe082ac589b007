//! Resource routes under `/api/v1`.

use crate::handlers::organisation;
use crate::handlers::resource::{create, delete, list, read, update};
use crate::model::{Account, Credential, Organisation, User};
use crate::service::Resource;
use crate::state::AppState;
use axum::{routing::get, Router};

pub const API_PREFIX: &str = "/api/v1";

/// `/{category}` and `/{category}/:id` for one resource.
fn resource_routes<R: Resource>() -> Router<AppState> {
    let collection = format!("/{}", R::SCHEMA.category);
    let item = format!("/{}/:id", R::SCHEMA.category);
    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(&item, get(read::<R>).put(update::<R>).delete(delete::<R>))
}

pub fn api_routes(state: AppState) -> Router {
    let organisations = Router::new()
        .route("/organisations", get(organisation::list).post(create::<Organisation>))
        .route(
            "/organisations/:id",
            get(read::<Organisation>)
                .put(update::<Organisation>)
                .delete(delete::<Organisation>),
        )
        .route("/organisations/:id/users", get(organisation::users))
        .route("/organisations/:id/customers", get(organisation::customers));

    let v1 = organisations
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Credential>())
        .merge(resource_routes::<Account>());

    Router::new().nest(API_PREFIX, v1).with_state(state)
}
