use std::fmt;

use crate::{parse, prompt};

/// The three completion calls of a generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Explanation,
    ComponentMapping,
    Diagram,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Explanation, Stage::ComponentMapping, Stage::Diagram];

    /// Also the delimiter tag the stage's response is expected to use.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Explanation => "explanation",
            Stage::ComponentMapping => "component_mapping",
            Stage::Diagram => "diagram",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Stage::Explanation => prompt::EXPLANATION_PROMPT,
            Stage::ComponentMapping => prompt::COMPONENT_MAPPING_PROMPT,
            Stage::Diagram => prompt::DIAGRAM_PROMPT,
        }
    }

    /// Pull this stage's payload out of a raw completion. Never fails: text
    /// stages fall back to the whole response, the diagram stage only loses
    /// its code fences.
    pub fn extract(self, raw: &str) -> String {
        match self {
            Stage::Explanation | Stage::ComponentMapping => parse::extract_tagged(raw, self.name()),
            Stage::Diagram => parse::strip_fences(raw),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
