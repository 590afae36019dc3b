//! Light/dark presentation preference.
//!
//! # Responsibilities
//! - Resolve the theme from the `theme` cookie
//! - Toggle it and redirect back to the referring page
//!
//! # Design Decisions
//! - No server-side state: the cookie is the only storage
//! - Anything but `light` or `dark` resolves to `light`

use axum::{
    extract::rejection::FormRejection,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::{Deserialize, Serialize};

pub const THEME_COOKIE: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Theme from the first `theme` cookie in the request, `light` otherwise.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == THEME_COOKIE)
            .and_then(|c| Theme::parse(c.value()))
            .unwrap_or_default()
    }

    /// Persistent, site-wide `Set-Cookie` value.
    fn cookie(self) -> Cookie<'static> {
        Cookie::build((THEME_COOKIE, self.as_str()))
            .path("/")
            .permanent()
            .build()
    }
}

/// Optional explicit current value, from the query string or a form body.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeParams {
    theme: Option<String>,
}

/// `GET|POST /set-theme`: flip the theme, store it, go back.
pub async fn toggle_theme(headers: HeaderMap, params: Result<Form<ThemeParams>, FormRejection>) -> Response {
    let current = params
        .ok()
        .and_then(|Form(p)| p.theme)
        .and_then(|t| Theme::parse(&t))
        .unwrap_or_else(|| Theme::from_headers(&headers));
    let next = current.toggled();

    let target = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/");

    tracing::debug!(from = current.as_str(), to = next.as_str(), redirect = %target, "Theme toggled");

    let mut response = Redirect::to(target).into_response();
    if let Ok(value) = HeaderValue::from_str(&next.cookie().to_string()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_resolve_from_cookie() {
        assert_eq!(Theme::from_headers(&headers_with_cookie("theme=dark")), Theme::Dark);
        assert_eq!(Theme::from_headers(&headers_with_cookie("a=1; theme=dark; b=2")), Theme::Dark);
        assert_eq!(Theme::from_headers(&headers_with_cookie("theme=light")), Theme::Light);
    }

    #[test]
    fn test_missing_or_invalid_defaults_to_light() {
        assert_eq!(Theme::from_headers(&HeaderMap::new()), Theme::Light);
        assert_eq!(Theme::from_headers(&headers_with_cookie("theme=blue")), Theme::Light);
        assert_eq!(Theme::from_headers(&headers_with_cookie("theme=DARK")), Theme::Light);
        assert_eq!(Theme::from_headers(&headers_with_cookie("other=dark")), Theme::Light);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_cookie_is_site_wide_and_persistent() {
        let cookie = Theme::Dark.cookie();
        assert_eq!(cookie.name(), "theme");
        assert_eq!(cookie.value(), "dark");
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_some());
    }

    fn app() -> Router {
        Router::new().route("/set-theme", get(toggle_theme).post(toggle_theme))
    }

    fn set_cookie(response: &Response) -> String {
        response.headers()[header::SET_COOKIE].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_toggle_from_light_redirects_to_referer() {
        let response = app()
            .oneshot(
                Request::get("/set-theme")
                    .header(header::REFERER, "http://localhost:8888/about")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "http://localhost:8888/about");
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("theme=dark"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_toggle_from_dark_without_referer() {
        let response = app()
            .oneshot(
                Request::post("/set-theme")
                    .header(header::COOKIE, "theme=dark")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(set_cookie(&response).starts_with("theme=light"));
    }

    #[tokio::test]
    async fn test_explicit_value_wins_over_cookie() {
        let response = app()
            .oneshot(
                Request::post("/set-theme")
                    .header(header::COOKIE, "theme=light")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("theme=dark"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(set_cookie(&response).starts_with("theme=light"));
    }

    #[tokio::test]
    async fn test_invalid_explicit_value_falls_back_to_cookie() {
        let response = app()
            .oneshot(
                Request::get("/set-theme?theme=blue")
                    .header(header::COOKIE, "theme=dark")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(set_cookie(&response).starts_with("theme=light"));
    }
}
