//! Collaborators the binder drives: the map and the list of links.

use crate::domain::{Centre, Location};
use minijinja::{AutoEscape, Environment, context};
use std::io::Write;

const LINK_TEMPLATE: &str = r##"<li><a href="#{{ name }}">{{ label }}</a></li>"##;

const LIST_TEMPLATE: &str = r#"<ul id="{{ container_id }}">
{%- for item in items %}
{{ item|safe }}
{%- endfor %}
</ul>"#;

/// A map that can be re-centred.
pub trait MapView {
    fn pan_to(&mut self, centre: Centre, zoom: u8);
}

/// The list container that rendered location links are appended to.
pub trait LinkList {
    fn append_link(&mut self, html: String);

    /// Called once every link of a document has been appended.
    fn populated(&mut self) {}
}

/// HTML templates for the link list, rendered with HTML auto-escaping.
pub struct LinkTemplates {
    env: Environment<'static>,
}

impl LinkTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    /// Render the list item linking to a location: `<li><a href="#name">label</a></li>`.
    pub fn render_link(&self, location: &Location) -> Result<String, minijinja::Error> {
        self.env.render_str(
            LINK_TEMPLATE,
            context! {
                name => location.name.as_str(),
                label => location.human_readable_name.as_str(),
            },
        )
    }

    /// Render a `<ul>` container holding already rendered items.
    pub fn render_list(
        &self,
        container_id: &str,
        items: &[String],
    ) -> Result<String, minijinja::Error> {
        self.env.render_str(
            LIST_TEMPLATE,
            context! {
                container_id => container_id,
                items => items,
            },
        )
    }
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LinkTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkTemplates").finish_non_exhaustive()
    }
}

/// An in-memory `<ul>` container.
#[derive(Debug)]
pub struct HtmlLinkList {
    container_id: String,
    items: Vec<String>,
    templates: LinkTemplates,
}

impl HtmlLinkList {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            items: Vec::new(),
            templates: LinkTemplates::new(),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Rendered `<li>` items, in the order they were appended.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> Result<String, minijinja::Error> {
        self.templates.render_list(&self.container_id, &self.items)
    }
}

impl LinkList for HtmlLinkList {
    fn append_link(&mut self, html: String) {
        self.items.push(html);
    }
}

/// One line of output from [`JsonLinesView`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    AppendLink {
        container: String,
        html: String,
    },
    ListPopulated {
        container: String,
        html: String,
    },
    PanTo {
        latitude: f64,
        longitude: f64,
        zoom: u8,
    },
}

/// Writes every view change as a JSON object on its own line.
///
/// Stands in for the page when the binder runs outside a browser: whatever
/// renders the map and the list consumes these lines.
#[derive(Debug)]
pub struct JsonLinesView<W> {
    list: HtmlLinkList,
    writer: W,
}

impl<W: Write> JsonLinesView<W> {
    pub fn new(container_id: impl Into<String>, writer: W) -> Self {
        Self {
            list: HtmlLinkList::new(container_id),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &ViewEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());

        if let Err(e) = written {
            tracing::error!(error.cause_chain = ?e, ?event, "Failed to write view event");
        }
    }
}

impl<W: Write> MapView for JsonLinesView<W> {
    fn pan_to(&mut self, centre: Centre, zoom: u8) {
        let (latitude, longitude) = centre.components();
        self.emit(&ViewEvent::PanTo {
            latitude,
            longitude,
            zoom,
        });
    }
}

impl<W: Write> LinkList for JsonLinesView<W> {
    fn append_link(&mut self, html: String) {
        let event = ViewEvent::AppendLink {
            container: self.list.container_id().to_string(),
            html: html.clone(),
        };
        self.list.append_link(html);
        self.emit(&event);
    }

    fn populated(&mut self) {
        match self.list.render() {
            Ok(html) => {
                let event = ViewEvent::ListPopulated {
                    container: self.list.container_id().to_string(),
                    html,
                };
                self.emit(&event);
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to render location list");
            }
        }
    }
}
