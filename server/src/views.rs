//! HTML views rendered with Tera. Templates are compiled into the binary.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::NaiveDateTime;
use tera::{Context, Tera, Value};

use crate::auth::Session;
use crate::pages::flash::Flash;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("recipe.html", include_str!("../templates/recipe.html")),
    ("recipe_list.html", include_str!("../templates/recipe_list.html")),
    ("recipe_form.html", include_str!("../templates/recipe_form.html")),
    ("profile.html", include_str!("../templates/profile.html")),
    ("shopping_list.html", include_str!("../templates/shopping_list.html")),
];

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.register_filter("short_date", short_date_filter);
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }

    /// Render a full page, consuming any pending flash message.
    pub fn page(
        &self,
        jar: SignedCookieJar,
        session: Option<&Session>,
        name: &str,
        mut context: Context,
    ) -> Response {
        let (jar, flash) = Flash::take(jar);
        context.insert("flash", &flash);
        context.insert("user_name", &session.map(|s| s.user_name.as_str()));

        match self.render(name, &context) {
            Ok(html) => (jar, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render {}: {:?}", name, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Format a serialized `NaiveDateTime` as e.g. "05 Jan 2026".
fn short_date_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("short_date: expected a string"))?;

    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| tera::Error::msg(format!("short_date: {e}")))?;

    Ok(Value::String(parsed.format("%d %b %Y").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("flash", &None::<Flash>);
        context.insert("user_name", &Some("Meena"));
        context
    }

    #[test]
    fn test_all_templates_parse() {
        assert!(Views::new().is_ok());
    }

    #[test]
    fn test_short_date_filter() {
        let out = short_date_filter(&Value::from("2026-01-05T10:30:00"), &HashMap::new()).unwrap();
        assert_eq!(out, Value::from("05 Jan 2026"));
        assert!(short_date_filter(&Value::from(3), &HashMap::new()).is_err());
    }

    #[test]
    fn test_dashboard_greets_user_and_escapes() {
        let views = Views::new().unwrap();
        let mut context = base_context();
        context.insert("user_name", &Some("<b>Meena</b>"));

        let html = views.render("dashboard.html", &context).unwrap();
        assert!(html.contains("&lt;b&gt;Meena&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>Meena</b>"));
    }

    #[test]
    fn test_flash_is_rendered() {
        let views = Views::new().unwrap();
        let mut context = base_context();
        context.insert("flash", &Some(Flash::danger("Invalid credentials.")));

        let html = views.render("login.html", &context).unwrap();
        assert!(html.contains("Invalid credentials."));
        assert!(html.contains("flash-danger"));
    }
}
