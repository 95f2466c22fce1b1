//! Page Templates
//!
//! Handlebars rendering for the HTML form UI.

use bom_selector_utils::{SelectorError, SelectorResult};
use handlebars::Handlebars;
use serde::Serialize;

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../templates/header.hbs")),
    ("footer", include_str!("../templates/footer.hbs")),
];

const PAGES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("catalog", include_str!("../templates/catalog.hbs")),
    ("bom", include_str!("../templates/bom.hbs")),
    ("drawings", include_str!("../templates/drawings.hbs")),
];

pub struct Templates {
    handlebars: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> SelectorResult<Self> {
        let mut handlebars = Handlebars::new();

        for (name, source) in PARTIALS {
            handlebars
                .register_partial(name, *source)
                .map_err(|e| SelectorError::configuration(format!("Template '{}': {}", name, e)))?;
        }
        for (name, source) in PAGES {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| SelectorError::configuration(format!("Template '{}': {}", name, e)))?;
        }

        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, page: &str, context: &T) -> SelectorResult<String> {
        self.handlebars
            .render(page, context)
            .map_err(|e| SelectorError::internal(format!("Failed to render '{}': {}", page, e)))
    }
}
