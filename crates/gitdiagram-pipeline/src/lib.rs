pub mod engine;
pub mod github;
mod parse;
mod prompt;
pub mod snapshot;
pub mod stage;

use std::sync::Arc;

use gitdiagram_core::rewrite::{rewrite_click_events, RepoLinks};
use gitdiagram_core::{
    CompletionError, CompletionService, RepoDataError, RepoDataSource, RepositorySnapshot,
    StageInput,
};
use thiserror::Error;

pub use engine::LlmCompletion;
pub use github::GithubSource;
pub use stage::Stage;

pub const DEFAULT_LINK_HOST: &str = "github.com";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    RepoData(#[from] RepoDataError),
    #[error("{stage} stage failed: {source}")]
    Completion {
        stage: Stage,
        #[source]
        source: CompletionError,
    },
}

/// Everything one generation run produced. Lives only for the duration of a job.
#[derive(Debug, Clone)]
pub struct PipelineArtifact {
    pub snapshot: RepositorySnapshot,
    pub explanation: String,
    pub component_mapping: String,
    pub raw_diagram: String,
    /// `raw_diagram` with click-event paths expanded to repository URLs.
    pub diagram: String,
}

/// Repository fetch followed by the three completion stages and the
/// click-event rewrite. Stages run strictly in sequence.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn RepoDataSource>,
    completion: Arc<dyn CompletionService>,
    link_host: String,
}

impl Pipeline {
    pub fn new(source: Arc<dyn RepoDataSource>, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            source,
            completion,
            link_host: DEFAULT_LINK_HOST.to_string(),
        }
    }

    pub fn with_link_host(mut self, host: impl Into<String>) -> Self {
        self.link_host = host.into();
        self
    }

    pub async fn generate(&self, owner: &str, repo: &str) -> Result<PipelineArtifact, PipelineError> {
        let snapshot = snapshot::fetch_snapshot(self.source.as_ref(), owner, repo).await?;

        let explanation = self
            .run_stage(
                Stage::Explanation,
                StageInput::new()
                    .field("file_tree", snapshot.file_tree.as_str())
                    .field("readme", snapshot.readme.as_str()),
            )
            .await?;

        let component_mapping = self
            .run_stage(
                Stage::ComponentMapping,
                StageInput::new()
                    .field("explanation", explanation.as_str())
                    .field("file_tree", snapshot.file_tree.as_str()),
            )
            .await?;

        let raw_diagram = self
            .run_stage(
                Stage::Diagram,
                StageInput::new()
                    .field("explanation", explanation.as_str())
                    .field("component_mapping", component_mapping.as_str()),
            )
            .await?;

        let links = RepoLinks {
            host: &self.link_host,
            owner,
            repo,
            branch: &snapshot.default_branch,
        };
        let diagram = rewrite_click_events(&raw_diagram, &links);

        Ok(PipelineArtifact {
            snapshot,
            explanation,
            component_mapping,
            raw_diagram,
            diagram,
        })
    }

    async fn run_stage(&self, stage: Stage, input: StageInput) -> Result<String, PipelineError> {
        tracing::debug!(%stage, "running generation stage");
        let raw = self
            .completion
            .complete(stage.system_prompt(), &input)
            .await
            .map_err(|source| PipelineError::Completion { stage, source })?;
        Ok(stage.extract(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gitdiagram_core::{FetchStep, RepoMetadata};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeSource {
        branch: Option<String>,
        paths: Vec<String>,
        readme: String,
        fail_tree_with: Option<u16>,
    }

    impl FakeSource {
        fn new(branch: Option<&str>) -> Self {
            Self {
                branch: branch.map(str::to_string),
                paths: vec![
                    "README.md".into(),
                    "node_modules/left-pad/index.js".into(),
                    "src".into(),
                    "src/index.ts".into(),
                    "public/logo.png".into(),
                ],
                readme: "# Demo\nA demo app.".into(),
                fail_tree_with: None,
            }
        }
    }

    #[async_trait]
    impl RepoDataSource for FakeSource {
        async fn repository(&self, _: &str, _: &str) -> Result<RepoMetadata, RepoDataError> {
            Ok(RepoMetadata {
                default_branch: self.branch.clone(),
            })
        }

        async fn tree(&self, _: &str, _: &str, _: &str) -> Result<Vec<String>, RepoDataError> {
            match self.fail_tree_with {
                Some(status) => Err(RepoDataError::Status {
                    step: FetchStep::Tree,
                    status,
                }),
                None => Ok(self.paths.clone()),
            }
        }

        async fn readme(&self, _: &str, _: &str) -> Result<String, RepoDataError> {
            Ok(self.readme.clone())
        }
    }

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct ScriptedCompletion {
        responses: Mutex<VecDeque<Result<String, CompletionError>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedCompletion {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, system: &str, input: &StageInput) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), input.render()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CompletionError::Request("no scripted response".into())))
        }
    }

    fn pipeline(source: FakeSource, completion: Arc<ScriptedCompletion>) -> Pipeline {
        Pipeline::new(Arc::new(source), completion)
    }

    #[tokio::test]
    async fn stages_feed_each_other_and_links_use_default_branch() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("Thinking...\n<explanation>\nSPA talking to an API.\n</explanation>".into()),
            Ok("<component_mapping>\n1. Entry: src/index.ts\n2. Source: src\n</component_mapping>".into()),
            Ok("```mermaid\nflowchart TD\n  Entry --> Source\n  click Entry \"src/index.ts\"\n  click Source \"src\"\n```".into()),
        ]));
        let artifact = pipeline(FakeSource::new(Some("develop")), completion.clone())
            .generate("octocat", "hello-world")
            .await
            .unwrap();

        assert_eq!(artifact.snapshot.default_branch, "develop");
        assert_eq!(artifact.snapshot.file_tree, "README.md\nsrc\nsrc/index.ts");
        assert_eq!(artifact.explanation, "SPA talking to an API.");
        assert_eq!(artifact.component_mapping, "1. Entry: src/index.ts\n2. Source: src");
        assert!(!artifact.raw_diagram.contains("```"));
        assert_eq!(
            artifact.diagram,
            "flowchart TD\n  Entry --> Source\n  click Entry \"https://github.com/octocat/hello-world/blob/develop/src/index.ts\"\n  click Source \"https://github.com/octocat/hello-world/tree/develop/src\""
        );

        let calls = completion.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, Stage::Explanation.system_prompt());
        assert_eq!(
            calls[0].1,
            "<file_tree>\nREADME.md\nsrc\nsrc/index.ts\n</file_tree>\n\n<readme>\n# Demo\nA demo app.\n</readme>"
        );
        assert!(calls[1].1.starts_with("<explanation>\nSPA talking to an API.\n</explanation>"));
        assert!(calls[1].1.contains("<file_tree>\nREADME.md"));
        assert!(calls[2].1.contains("<component_mapping>\n1. Entry: src/index.ts"));
        assert!(!calls[2].1.contains("<file_tree>"));
    }

    #[tokio::test]
    async fn untagged_responses_pass_through() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("plain explanation".into()),
            Ok("plain mapping".into()),
            Ok("graph TD\n  A --> B".into()),
        ]));
        let artifact = pipeline(FakeSource::new(None), completion.clone())
            .generate("o", "r")
            .await
            .unwrap();

        assert_eq!(artifact.explanation, "plain explanation");
        assert_eq!(artifact.component_mapping, "plain mapping");
        assert_eq!(artifact.diagram, "graph TD\n  A --> B");
        assert!(completion.calls()[2].1.contains("<component_mapping>\nplain mapping\n</component_mapping>"));
    }

    #[tokio::test]
    async fn missing_default_branch_falls_back_to_main() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("e".into()),
            Ok("m".into()),
            Ok("click A \"lib\"".into()),
        ]));
        let artifact = pipeline(FakeSource::new(Some("")), completion)
            .generate("o", "r")
            .await
            .unwrap();
        assert_eq!(artifact.snapshot.default_branch, "main");
        assert_eq!(artifact.diagram, "click A \"https://github.com/o/r/tree/main/lib\"");
    }

    #[tokio::test]
    async fn repo_failure_aborts_before_any_completion() {
        let mut source = FakeSource::new(Some("main"));
        source.fail_tree_with = Some(404);
        let completion = Arc::new(ScriptedCompletion::new(vec![]));
        let err = pipeline(source, completion.clone())
            .generate("o", "missing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::RepoData(RepoDataError::Status { step: FetchStep::Tree, status: 404 })
        ));
        assert_eq!(err.to_string(), "Failed to fetch file tree: 404");
        assert!(completion.calls().is_empty());
    }

    #[tokio::test]
    async fn completion_failure_aborts_remaining_stages() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("<explanation>fine</explanation>".into()),
            Err(CompletionError::Request("HTTP error: 429 Too Many Requests".into())),
            Ok("never used".into()),
        ]));
        let err = pipeline(FakeSource::new(Some("main")), completion.clone())
            .generate("o", "r")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "component_mapping stage failed: chat: HTTP error: 429 Too Many Requests"
        );
        assert_eq!(completion.calls().len(), 2);
    }

    #[tokio::test]
    async fn empty_replies_flow_through_every_stage() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok(String::new()),
            Ok(String::new()),
            Ok(String::new()),
        ]));
        let artifact = pipeline(FakeSource::new(Some("main")), completion.clone())
            .generate("o", "r")
            .await
            .unwrap();

        assert_eq!(artifact.explanation, "");
        assert_eq!(artifact.component_mapping, "");
        assert_eq!(artifact.diagram, "");
        assert_eq!(completion.calls().len(), 3);
        assert!(completion.calls()[1].1.starts_with("<explanation>\n\n</explanation>"));
    }

    #[tokio::test]
    async fn link_host_is_configurable() {
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("e".into()),
            Ok("m".into()),
            Ok("click A \"a.rs\"".into()),
        ]));
        let artifact = pipeline(FakeSource::new(Some("main")), completion)
            .with_link_host("git.example.com")
            .generate("o", "r")
            .await
            .unwrap();
        assert_eq!(artifact.diagram, "click A \"https://git.example.com/o/r/blob/main/a.rs\"");
    }
}
