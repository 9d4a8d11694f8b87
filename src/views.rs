use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;

/// Every page template, compiled into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("property.html", include_str!("../templates/property.html")),
    ("developers.html", include_str!("../templates/developers.html")),
    ("location.html", include_str!("../templates/location.html")),
    ("admin-dashboard.html", include_str!("../templates/admin-dashboard.html")),
    ("add.html", include_str!("../templates/add.html")),
    ("edit-property.html", include_str!("../templates/edit-property.html")),
    ("add-developer.html", include_str!("../templates/add-developer.html")),
    ("edit-developer.html", include_str!("../templates/edit-developer.html")),
    ("test.html", include_str!("../templates/test.html")),
    ("edit-test.html", include_str!("../templates/edit-test.html")),
    ("career.html", include_str!("../templates/career.html")),
    ("career-form.html", include_str!("../templates/career-form.html")),
    ("trending.html", include_str!("../templates/trending.html")),
    ("new.html", include_str!("../templates/new.html")),
    ("edit.html", include_str!("../templates/edit.html")),
    ("blogdetails.html", include_str!("../templates/blogdetails.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("term.html", include_str!("../templates/term.html")),
    ("policy.html", include_str!("../templates/policy.html")),
    ("verify-code.html", include_str!("../templates/verify-code.html")),
];

/// Views
///
/// Shared, read-only template environment. Cloning is cheap.
#[derive(Clone)]
pub struct Views {
    env: Arc<Environment<'static>>,
}

impl Views {
    /// Compiles all embedded templates. Fails on a template syntax error.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    /// Renders `name` with `ctx`. HTML autoescaping applies to every `.html`
    /// template.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}
