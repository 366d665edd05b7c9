use axum::{extract::State, response::Html};

use crate::state::SharedState;

/// Renders the landing page linking to `metrics_path`.
pub fn render(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Iota-IRI Exporter</title></head>\n\
         <body>\n\
         <h1>Iota-IRI Node Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        escape_attr(metrics_path)
    )
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `GET /`
pub async fn landing(State(state): State<SharedState>) -> Html<String> {
    Html(state.landing_page.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{router, test_support};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    #[test]
    fn render_links_metrics_path() {
        let page = render("/metrics");
        assert!(page.contains("<h1>Iota-IRI Node Exporter</h1>"));
        assert!(page.contains("<a href='/metrics'>Metrics</a>"));
    }

    #[test]
    fn render_escapes_path() {
        let page = render("/m'><script>");
        assert!(page.contains("href='/m&#39;&gt;&lt;script&gt;'"));
        assert!(!page.contains("<script>"));
    }

    #[tokio::test]
    async fn root_serves_html() {
        let app = router(test_support::state("/metrics"), "/metrics");

        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("href='/metrics'"));
    }
}
