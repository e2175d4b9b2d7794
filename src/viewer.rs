//! Static HTML page rendering an AsyncAPI document with the AsyncAPI React
//! component, loaded from a CDN.

use std::fmt;

pub const DEFAULT_ASYNCAPI_JS_URL: &str =
    "https://unpkg.com/@asyncapi/react-component@latest/browser/standalone/index.js";
pub const DEFAULT_ASYNCAPI_CSS_URL: &str =
    "https://unpkg.com/@asyncapi/react-component@latest/styles/default.min.css";

/// Viewer page pointing at wherever the JSON document is served.
///
/// # Example
///
/// ```
/// use asyncapi_from_routes::viewer::AsyncApiViewer;
///
/// let html = AsyncApiViewer::new("/asyncapi.json").title("My API").render();
/// assert!(html.contains("url: '/asyncapi.json'"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncApiViewer {
    asyncapi_url: String,
    title: String,
    js_url: String,
    css_url: String,
}

impl AsyncApiViewer {
    pub fn new(asyncapi_url: impl Into<String>) -> Self {
        Self {
            asyncapi_url: asyncapi_url.into(),
            title: "AsyncAPI Documentation".to_string(),
            js_url: DEFAULT_ASYNCAPI_JS_URL.to_string(),
            css_url: DEFAULT_ASYNCAPI_CSS_URL.to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Overrides the standalone renderer bundle
    pub fn js_url(mut self, url: impl Into<String>) -> Self {
        self.js_url = url.into();
        self
    }

    /// Overrides the renderer stylesheet
    pub fn css_url(mut self, url: impl Into<String>) -> Self {
        self.css_url = url.into();
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AsyncApiViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="stylesheet" href="{css_url}">
</head>
<body>
    <div id="asyncapi"></div>

    <script src="{js_url}"></script>
    <script>
      AsyncApiStandalone.render({{
        schema: {{
          url: '{asyncapi_url}',
          options: {{ method: "GET", mode: "cors" }},
        }},
        config: {{
          show: {{
            sidebar: true,
          }}
        }},
      }}, document.getElementById('asyncapi'));
    </script>
</body>
</html>
"#,
            title = self.title,
            css_url = self.css_url,
            js_url = self.js_url,
            asyncapi_url = self.asyncapi_url,
        )
    }
}
