//! Login and callback handlers for the authorization-code handshake.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use mixtape_oauth::{build_authorization_url, exchange_code_for_tokens, generate_state, now_millis};

use crate::state::AppState;

/// Name of the cookie carrying the login state nonce.
pub const STATE_COOKIE: &str = "spotify_auth_state";

/// How long a pending handshake nonce stays valid.
const STATE_COOKIE_TTL: time::Duration = time::Duration::minutes(10);

/// `302 Found` with a `Location` header.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// GET /login — redirect the user agent to the provider authorize endpoint.
pub async fn login_handler(State(app): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    info!("Requesting authorization");

    let nonce = generate_state();
    let cookie = Cookie::build((STATE_COOKIE, nonce.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(STATE_COOKIE_TTL)
        .build();

    let url = build_authorization_url(&app.oauth, &nonce);
    (jar.add(cookie), found(&url))
}

/// Query parameters of the provider redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /callback — validate the state nonce, exchange the code for tokens,
/// arm the refresh task.
pub async fn callback_handler(
    State(app): State<AppState>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> impl IntoResponse {
    let stored = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    // Single-use: the nonce is invalidated whatever the outcome.
    let jar = jar.remove(Cookie::build((STATE_COOKIE, "")).path("/").build());

    let valid = matches!((&params.state, &stored), (Some(s), Some(n)) if s == n);
    if !valid {
        warn!("State mismatch on callback, aborting handshake");
        return (jar, found("/#error=state_mismatch"));
    }

    let Some(code) = params.code.as_deref() else {
        warn!("Callback carried no authorization code");
        return (jar, found("/#error=invalid_token"));
    };

    info!("Requesting access and refresh tokens");
    match exchange_code_for_tokens(&app.oauth, code).await {
        Ok(response) => {
            {
                let mut session = app.session.write().await;
                session.install(&response, now_millis());
            }
            app.refresher.arm();
            info!("Access and refresh tokens obtained, refresh task armed");

            if app.config.expose_tokens {
                let fragment = format!(
                    "/#access_token={}&refresh_token={}",
                    urlencoding::encode(&response.access_token),
                    urlencoding::encode(response.refresh_token.as_deref().unwrap_or_default()),
                );
                (jar, found(&fragment))
            } else {
                (jar, found("/#authorized"))
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to obtain access and refresh tokens");
            (jar, found("/#error=invalid_token"))
        }
    }
}
