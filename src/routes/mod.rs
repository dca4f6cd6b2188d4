mod admin;
mod brands;
mod categories;
mod email_verification;
mod health;
mod login;
mod products;
mod register;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::{app::AppState, middleware};

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/users", post(admin::create_user).get(admin::list_users))
        .route("/users/role", put(admin::update_user_role))
        .route("/users/toggle-active", patch(admin::toggle_user_active))
        .route("/users/soft-delete", delete(admin::soft_delete_user))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::admin_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/register", post(register::register_user))
        .route("/auth/login", post(login::login_user))
        .route("/auth/verify-email", get(email_verification::verify_email))
        .route(
            "/auth/update-email",
            put(email_verification::update_email).route_layer(from_fn_with_state(
                state.clone(),
                middleware::auth_middleware,
            )),
        )
        .route(
            "/auth/confirm-email-update",
            get(email_verification::confirm_email_update),
        )
        .nest("/admin", admin_routes)
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/:id", put(products::update_product))
        .route(
            "/products/:id/toggle-active",
            patch(products::toggle_active),
        )
        .route("/products/:id/soft-delete", delete(products::soft_delete))
        .route(
            "/product-variants/:id/toggle-active",
            patch(products::toggle_variant_active),
        )
        .route(
            "/product-variants/:id/soft-delete",
            delete(products::soft_delete_variant),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/:id", put(categories::update_category))
        .route(
            "/categories/:id/toggle-active",
            patch(categories::toggle_active),
        )
        .route(
            "/categories/:id/soft-delete",
            delete(categories::soft_delete),
        )
        .route(
            "/brands",
            get(brands::list_brands).post(brands::create_brand),
        )
        .route("/brands/:id", put(brands::update_brand))
        .route("/brands/:id/toggle-active", patch(brands::toggle_active))
        .route("/brands/:id/soft-delete", delete(brands::soft_delete))
        .with_state(state)
}
