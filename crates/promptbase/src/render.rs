//! HTML rendering of a [`PageView`] with minijinja.
//!
//! Templates with an `.html` name are auto-escaped, so prompt text is shown
//! verbatim and never interpreted as markup.

use minijinja::{context, Environment};
use promptbase_core::PageView;

const PAGE_TEMPLATE: &str = "page.html";

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/page.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, page: &PageView) -> Result<String, minijinja::Error> {
        let query = view_query(&page.search, page.sort);
        self.env
            .get_template(PAGE_TEMPLATE)?
            .render(context! { page => page, query => query })
    }
}

/// Query string that carries the search/sort selection across interactions.
pub fn view_query(search: &str, sort: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("search", search)
        .append_pair("sort", sort)
        .finish()
}
