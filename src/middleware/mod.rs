use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::UserRole,
    utils::jwt::{self, Claims},
};

fn bearer_token(req: &Request) -> Result<&str> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}

fn authenticate(state: &AppState, req: &Request) -> Result<Claims> {
    let token = bearer_token(req)?;
    jwt::verify_token(&state.config.auth.jwt_secret, token)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = authenticate(&state, &req)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = authenticate(&state, &req)?;

    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = bearer_token(&request_with_auth(None)).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = bearer_token(&request_with_auth(Some("Basic abc"))).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let request = request_with_auth(Some("Bearer abc.def.ghi"));
        let token = bearer_token(&request).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
