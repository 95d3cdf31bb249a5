//! HTML rendering.
//!
//! Templates are embedded at compile time and rendered with tera; `.html`
//! templates are autoescaped, so user fields from Twitter are safe to
//! interpolate.

use tera::{Context, Tera};
use twitter_client::User;

use crate::error::{AppError, Result};

const HOME_TEMPLATE: &str = "home.html";
const PAGE_TITLE: &str = "Tweet from the web";

/// Page renderer shared by all workers
#[derive(Debug, Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> std::result::Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(HOME_TEMPLATE, include_str!("../templates/home.html"))?;
        Ok(Self { tera })
    }

    /// Home page: login link when `user` is `None`, otherwise the profile,
    /// the post form and a logout link.
    pub fn render_home(&self, user: Option<&User>) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", PAGE_TITLE);
        context.insert("user", &user);

        self.tera
            .render(HOME_TEMPLATE, &context)
            .map_err(|e| AppError::Internal(format!("template error: {e}")))
    }
}
