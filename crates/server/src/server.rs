use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{expenses, goals, user::AuthUser};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"spendlog\"")],
    )
        .into_response()
}

/// Resolve the requesting user from HTTP basic credentials.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(unauthorized());
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(unauthorized());
    }

    let user_id = state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await
        .map_err(|err| {
            tracing::error!("failed to authenticate user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?
        .ok_or_else(unauthorized)?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

/// The full API, authentication included.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/total-spent", get(expenses::total_spent))
        .route(
            "/expenses/{id}",
            get(expenses::get_one).delete(expenses::delete),
        )
        .route("/goal", get(goals::get).post(goals::set))
        .route("/goal/progress", get(goals::progress))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Serve the API on an already bound listener until it fails.
pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
