use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::error::{
    api_generation_failed, api_invalid_path, api_method_not_allowed, ApiError,
};
use crate::app::AppState;
use crate::coordinator::Lookup;

pub const IMAGE_PAGE: &str = "image.html";
const MERMAID_MODULE: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";

#[derive(Debug, Serialize)]
pub struct PendingBody {
    pub status: &'static str,
    pub message: &'static str,
}

/// `GET /{owner}/{repo}`
pub async fn get_diagram(
    State(state): State<AppState>,
    method: Method,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    respond(&state, &method, &owner, &repo, None).await
}

/// `GET /{owner}/{repo}/{page}`. Only `image.html` changes the rendering;
/// any other trailing segment is served like the bare repository path.
pub async fn get_diagram_page(
    State(state): State<AppState>,
    method: Method,
    Path((owner, repo, rest)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let page = rest.split('/').next().filter(|p| !p.is_empty());
    respond(&state, &method, &owner, &repo, page).await
}

/// Anything that does not name both an owner and a repository.
pub async fn invalid_path(method: Method) -> ApiError {
    if method != Method::GET {
        return api_method_not_allowed();
    }
    api_invalid_path()
}

async fn respond(
    state: &AppState,
    method: &Method,
    owner: &str,
    repo: &str,
    page: Option<&str>,
) -> Result<Response, ApiError> {
    if *method != Method::GET {
        return Err(api_method_not_allowed());
    }
    // Routes match empty segments, e.g. `//repo`.
    if owner.is_empty() || repo.is_empty() {
        return Err(api_invalid_path());
    }

    let response = match state.coordinator.handle(owner, repo).await? {
        Lookup::Complete(diagram) if page == Some(IMAGE_PAGE) => {
            Html(render_image_page(&diagram)).into_response()
        }
        Lookup::Complete(diagram) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            diagram,
        )
            .into_response(),
        Lookup::Failed(message) => return Err(api_generation_failed(&message)),
        Lookup::InProgress => pending("Diagram generation in progress"),
        Lookup::Admitted => pending("Diagram generation started"),
    };
    Ok(response)
}

fn pending(message: &'static str) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(PendingBody {
            status: "pending",
            message,
        }),
    )
        .into_response()
}

/// Standalone page that lets mermaid render the diagram client-side.
pub fn render_image_page(diagram: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <body>
    <pre class="mermaid">
{diagram}
    </pre>
    <script type="module">
      import mermaid from '{MERMAID_MODULE}';
    </script>
  </body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_page_embeds_diagram_and_mermaid_module() {
        let page = render_image_page("flowchart TD\n  A --> B");
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<pre class=\"mermaid\">\nflowchart TD\n  A --> B\n    </pre>"));
        assert!(page.contains(&format!("import mermaid from '{MERMAID_MODULE}';")));
    }
}
