//! Learning Resource Data Model
//!
//! These types are the JSON contract shared with the presentation layer. Field
//! names on the wire are fixed (camelCase, plus the short legacy subtopic keys)
//! because consumers key into them directly.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A complete, generated learning resource for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    /// Short title for the topic.
    #[schemars(length(max = 100))]
    pub topic: String,
    /// Beginner-friendly overview of the topic and why it matters.
    #[serde(alias = "describe")]
    #[schemars(length(min = 50))]
    pub description: String,
    #[serde(default)]
    #[schemars(length(max = 12))]
    pub subtopics: Vec<Subtopic>,
    #[schemars(length(min = 3, max = 8))]
    pub points: Vec<String>,
    #[schemars(length(min = 3, max = 5))]
    pub importance: Vec<String>,
    #[schemars(length(min = 1, max = 6))]
    pub prerequisites: Vec<String>,
    #[schemars(length(min = 2, max = 6))]
    pub learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeExample>,
    /// One entry per line of `code`, in line order.
    #[serde(default)]
    pub define: Vec<LineExplanation>,
    #[schemars(length(min = 1, max = 6))]
    pub visualization_html: Vec<VisualizationStep>,
    #[schemars(length(min = 1, max = 4))]
    pub common_misconceptions: Vec<Misconception>,
    #[schemars(length(min = 2, max = 4))]
    pub practice_exercises: Vec<Exercise>,
    #[serde(default)]
    pub leetcode_problem: ProblemSet,
    /// Query used for the web search enrichment.
    pub web_search_tagline: String,
    /// Query used for the video search enrichment.
    pub youtube_search_tagline: String,
    #[serde(default)]
    #[schemars(skip)]
    pub web_results: Vec<WebResult>,
    #[serde(default)]
    #[schemars(skip)]
    pub youtube_results: Vec<VideoResult>,
}

/// The relaxed shape requested once the full schema has been exhausted.
///
/// Only the title, the description and at least one key point are mandatory;
/// everything else may be omitted and is defaulted when converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReducedResource {
    #[schemars(length(max = 100))]
    pub topic: String,
    #[serde(alias = "describe")]
    pub description: String,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
    #[schemars(length(min = 1))]
    pub points: Vec<String>,
    #[serde(default)]
    pub importance: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub code: Option<CodeExample>,
    #[serde(default)]
    pub define: Vec<LineExplanation>,
    #[serde(default)]
    pub visualization_html: Vec<VisualizationStep>,
    #[serde(default)]
    pub common_misconceptions: Vec<Misconception>,
    #[serde(default)]
    pub practice_exercises: Vec<Exercise>,
    #[serde(default)]
    pub leetcode_problem: Option<ProblemSet>,
    #[serde(default)]
    pub web_search_tagline: Option<String>,
    #[serde(default)]
    pub youtube_search_tagline: Option<String>,
}

impl From<ReducedResource> for LearningResource {
    fn from(reduced: ReducedResource) -> Self {
        let tagline = |t: Option<String>| {
            t.filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| reduced.topic.clone())
        };
        let web_search_tagline = tagline(reduced.web_search_tagline.clone());
        let youtube_search_tagline = tagline(reduced.youtube_search_tagline.clone());

        Self {
            topic: reduced.topic,
            description: reduced.description,
            subtopics: reduced.subtopics,
            points: reduced.points,
            importance: reduced.importance,
            prerequisites: reduced.prerequisites,
            learning_objectives: reduced.learning_objectives,
            code: reduced.code,
            define: reduced.define,
            visualization_html: reduced.visualization_html,
            common_misconceptions: reduced.common_misconceptions,
            practice_exercises: reduced.practice_exercises,
            leetcode_problem: reduced.leetcode_problem.unwrap_or_default(),
            web_search_tagline,
            youtube_search_tagline,
            web_results: Vec::new(),
            youtube_results: Vec::new(),
        }
    }
}

/// A subtopic, nested one level below the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Subtopic {
    #[serde(rename = "subtop")]
    pub name: String,
    #[serde(rename = "subexplain")]
    pub explanation: String,
    /// Worked example; complete source code when the subtopic is about code.
    #[serde(rename = "subexample", default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(rename = "exmexplain", default)]
    pub example_lines: Vec<LineExplanation>,
    #[serde(rename = "subtopicVisualizationHtml", default)]
    pub visualization_html: Vec<VisualizationStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CodeExample {
    #[serde(rename = "topicofcode")]
    pub title: String,
    #[serde(rename = "tcode")]
    pub source: String,
}

/// One rendered step of an interactive visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationStep {
    pub step: String,
    /// A full, self-contained HTML document.
    #[serde(default, deserialize_with = "string_or_empty")]
    #[schemars(with = "String")]
    pub complete_html: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineExplanation {
    #[schemars(range(min = 1))]
    pub line_number: u32,
    /// The source line, verbatim.
    pub code: String,
    #[serde(alias = "explain")]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Misconception {
    pub misconception: String,
    pub explanation: String,
    pub correction: String,
}

impl Misconception {
    pub fn is_complete(&self) -> bool {
        ![&self.misconception, &self.explanation, &self.correction]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Exercise {
    pub question: String,
    pub difficulty: ExerciseDifficulty,
    pub solution: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ProblemDifficulty {
    Easy,
    Medium,
    Hard,
}

/// Reference to a curated practice problem on an external judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProblemRef {
    pub title: String,
    pub difficulty: ProblemDifficulty,
    pub id: u32,
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectedProblem {
    #[serde(flatten)]
    pub problem: ProblemRef,
    /// Why this problem fits the topic.
    pub rationale: String,
}

/// Practice problems attached to a resource.
///
/// When `is_programming_topic` is true the resource always carries a selected
/// problem and at least one alternative after postprocessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSet {
    pub is_programming_topic: bool,
    #[serde(default)]
    pub selected_problem: Option<SelectedProblem>,
    #[serde(default)]
    #[schemars(length(max = 4))]
    pub alternative_problems: Vec<ProblemRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub url: String,
    pub title: String,
    pub channel_title: String,
}

/// Accepts any JSON value and keeps it only when it is a string.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subtopic_uses_presentation_keys() {
        let subtopic = Subtopic {
            name: "Ownership".into(),
            explanation: "Every value has a single owner.".into(),
            example: None,
            example_lines: vec![],
            visualization_html: vec![],
        };
        let value = serde_json::to_value(&subtopic).unwrap();
        assert_eq!(value["subtop"], "Ownership");
        assert!(value.get("subexplain").is_some());
        assert!(value.get("subexample").is_none());
        assert!(value["subtopicVisualizationHtml"].is_array());
    }

    #[test]
    fn test_visualization_html_non_string_becomes_empty() {
        let step: VisualizationStep = serde_json::from_value(json!({
            "step": "1",
            "completeHtml": 42,
            "explanation": "x",
            "purpose": "y"
        }))
        .unwrap();
        assert_eq!(step.complete_html, "");

        let step: VisualizationStep = serde_json::from_value(json!({ "step": "2" })).unwrap();
        assert_eq!(step.complete_html, "");
    }

    #[test]
    fn test_line_explanation_accepts_explain_alias() {
        let line: LineExplanation = serde_json::from_value(json!({
            "lineNumber": 1,
            "code": "let x = 1;",
            "explain": "Binds x."
        }))
        .unwrap();
        assert_eq!(line.explanation, "Binds x.");
    }

    #[test]
    fn test_selected_problem_is_flattened() {
        let selected = SelectedProblem {
            problem: ProblemRef {
                title: "Two Sum".into(),
                difficulty: ProblemDifficulty::Easy,
                id: 1,
                url: "https://leetcode.com/problems/two-sum/".into(),
                description: "Find two numbers adding up to a target.".into(),
                tags: vec!["Array".into()],
            },
            rationale: "Warm-up".into(),
        };
        let value = serde_json::to_value(&selected).unwrap();
        assert_eq!(value["title"], "Two Sum");
        assert_eq!(value["difficulty"], "Easy");
        assert_eq!(value["rationale"], "Warm-up");
    }

    #[test]
    fn test_default_problem_set_serializes_null_selection() {
        let value = serde_json::to_value(ProblemSet::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "isProgrammingTopic": false,
                "selectedProblem": null,
                "alternativeProblems": []
            })
        );
    }

    #[test]
    fn test_reduced_resource_converts_with_defaults() {
        let reduced: ReducedResource = serde_json::from_value(json!({
            "topic": "Graphs",
            "describe": "Graphs model pairwise relations.",
            "points": ["Vertices and edges"]
        }))
        .unwrap();

        let full = LearningResource::from(reduced);
        assert_eq!(full.description, "Graphs model pairwise relations.");
        assert_eq!(full.web_search_tagline, "Graphs");
        assert_eq!(full.youtube_search_tagline, "Graphs");
        assert!(full.subtopics.is_empty());
        assert!(!full.leetcode_problem.is_programming_topic);
    }

    #[test]
    fn test_misconception_completeness() {
        let partial = Misconception {
            misconception: "Arrays are linked lists".into(),
            explanation: " ".into(),
            correction: "Arrays are contiguous".into(),
        };
        assert!(!partial.is_complete());
    }
}
