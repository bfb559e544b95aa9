//! Schema Contracts for Structured Generation
//!
//! A schema is a passive contract: a JSON Schema document sent to the model
//! alongside the prompt, plus a local conformance check for the bounds that the
//! model is not trusted to honor. Any failure to deserialize or to satisfy the
//! bounds surfaces as [`GenerationError::SchemaMismatch`], which the retry
//! executor treats like any other failed attempt.

use crate::error::GenerationError;
use crate::llm_client::{SchemaRequest, StructuredGenerator};
use crate::resource::{LearningResource, LineExplanation, ProblemSet, ReducedResource};

/// Upper bound on subtopics; hard material asks for up to twelve.
pub const MAX_SUBTOPICS: usize = 12;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A type that can be requested from the model and checked on arrival.
pub trait Conforms: DeserializeOwned + JsonSchema {
    /// Name sent to the model together with the schema.
    const SCHEMA_NAME: &'static str;

    /// Returns every bound the value breaks. Empty means the value conforms.
    fn violations(&self) -> Vec<String>;
}

/// Produces the JSON Schema document for `T`.
pub fn json_schema_for<T: JsonSchema>() -> Value {
    let mut value = schemars::schema_for!(T).to_value();
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
    }
    value
}

/// Requests a `T` from the generator and validates it against its schema.
pub async fn generate_conforming<T: Conforms>(
    generator: &dyn StructuredGenerator,
    prompt: &str,
) -> Result<T, GenerationError> {
    let request = SchemaRequest {
        name: T::SCHEMA_NAME.to_string(),
        prompt: prompt.to_string(),
        schema: json_schema_for::<T>(),
    };

    let raw = generator.generate_object(&request).await?;
    let parsed: T = serde_json::from_value(raw)?;

    let violations = parsed.violations();
    if violations.is_empty() {
        Ok(parsed)
    } else {
        Err(GenerationError::SchemaMismatch(violations.join("; ")))
    }
}

fn check_count(out: &mut Vec<String>, field: &str, len: usize, min: usize, max: usize) {
    if len < min || len > max {
        out.push(format!("{field}: expected {min}..={max} items, got {len}"));
    }
}

fn check_chars(out: &mut Vec<String>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len < min || len > max {
        out.push(format!("{field}: expected {min}..={max} characters, got {len}"));
    }
}

/// Line explanations must number `1..=n` once each and, when the source is
/// known, cover every one of its lines.
fn check_lines(out: &mut Vec<String>, field: &str, lines: &[LineExplanation], source: Option<&str>) {
    if let Some(source) = source {
        let expected = source.trim_end().lines().count();
        if lines.len() != expected {
            out.push(format!(
                "{field}: expected one entry per source line ({expected}), got {}",
                lines.len()
            ));
        }
    }

    let mut numbers: Vec<u32> = lines.iter().map(|line| line.line_number).collect();
    numbers.sort_unstable();
    if numbers.iter().zip(1u32..).any(|(&n, expected)| n != expected) {
        out.push(format!("{field}: line numbers must run from 1 to {}", lines.len()));
    }
}

impl Conforms for LearningResource {
    const SCHEMA_NAME: &'static str = "learning_resource";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        check_chars(&mut out, "topic", &self.topic, 1, 100);
        check_chars(&mut out, "description", &self.description, 50, usize::MAX);
        check_count(&mut out, "subtopics", self.subtopics.len(), 0, MAX_SUBTOPICS);
        check_count(&mut out, "points", self.points.len(), 3, 8);
        check_count(&mut out, "importance", self.importance.len(), 3, 5);
        check_count(&mut out, "prerequisites", self.prerequisites.len(), 1, 6);
        check_count(&mut out, "learningObjectives", self.learning_objectives.len(), 2, 6);
        check_count(&mut out, "visualizationHtml", self.visualization_html.len(), 1, 6);
        check_count(&mut out, "commonMisconceptions", self.common_misconceptions.len(), 1, 4);
        check_count(&mut out, "practiceExercises", self.practice_exercises.len(), 2, 4);
        check_chars(&mut out, "webSearchTagline", &self.web_search_tagline, 1, 200);
        check_chars(&mut out, "youtubeSearchTagline", &self.youtube_search_tagline, 1, 200);
        check_lines(
            &mut out,
            "define",
            &self.define,
            self.code.as_ref().map(|code| code.source.as_str()),
        );

        for (i, subtopic) in self.subtopics.iter().enumerate() {
            check_chars(&mut out, &format!("subtopics[{i}].subtop"), &subtopic.name, 1, 200);
            check_chars(
                &mut out,
                &format!("subtopics[{i}].subexplain"),
                &subtopic.explanation,
                50,
                usize::MAX,
            );
            check_count(
                &mut out,
                &format!("subtopics[{i}].subtopicVisualizationHtml"),
                subtopic.visualization_html.len(),
                1,
                4,
            );
            check_lines(
                &mut out,
                &format!("subtopics[{i}].exmexplain"),
                &subtopic.example_lines,
                subtopic.example.as_deref(),
            );
        }

        if self
            .common_misconceptions
            .iter()
            .any(|m| !m.is_complete())
        {
            out.push("commonMisconceptions: every entry needs all three fields".to_string());
        }

        out
    }
}

impl Conforms for ReducedResource {
    const SCHEMA_NAME: &'static str = "learning_resource_reduced";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        check_chars(&mut out, "topic", &self.topic, 1, 100);
        check_chars(&mut out, "description", &self.description, 1, usize::MAX);
        check_count(&mut out, "points", self.points.len(), 1, usize::MAX);
        if self
            .common_misconceptions
            .iter()
            .any(|m| !m.is_complete())
        {
            out.push("commonMisconceptions: every entry needs all three fields".to_string());
        }
        out
    }
}

impl Conforms for ProblemSet {
    const SCHEMA_NAME: &'static str = "practice_problems";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(selected) = &self.selected_problem {
            check_chars(&mut out, "selectedProblem.title", &selected.problem.title, 1, 200);
        }
        for (i, problem) in self.alternative_problems.iter().enumerate() {
            check_chars(&mut out, &format!("alternativeProblems[{i}].title"), &problem.title, 1, 200);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockStructuredGenerator;
    use crate::test_support::full_resource_json;
    use serde_json::json;

    #[test]
    fn test_full_resource_conforms() {
        let resource: LearningResource = serde_json::from_value(full_resource_json()).unwrap();
        assert!(resource.violations().is_empty(), "{:?}", resource.violations());
    }

    #[test]
    fn test_full_resource_bounds_are_enforced() {
        let mut json = full_resource_json();
        json["importance"] = json!(["only one"]);
        json["practiceExercises"] = json!([]);
        let resource: LearningResource = serde_json::from_value(json).unwrap();

        let violations = resource.violations();
        assert!(violations.iter().any(|v| v.starts_with("importance")));
        assert!(violations.iter().any(|v| v.starts_with("practiceExercises")));
    }

    #[test]
    fn test_hard_sized_resource_conforms() {
        let mut json = full_resource_json();
        let subtopic = json["subtopics"][0].clone();
        json["subtopics"] = Value::Array(vec![subtopic; 10]);
        let resource: LearningResource = serde_json::from_value(json).unwrap();
        assert!(resource.violations().is_empty(), "{:?}", resource.violations());

        let schema = json_schema_for::<LearningResource>();
        assert_eq!(schema["properties"]["subtopics"]["maxItems"], 12);
    }

    #[test]
    fn test_too_many_subtopics() {
        let mut json = full_resource_json();
        let subtopic = json["subtopics"][0].clone();
        json["subtopics"] = Value::Array(vec![subtopic; 13]);
        let resource: LearningResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.violations(), vec!["subtopics: expected 0..=12 items, got 13"]);
    }

    #[test]
    fn test_define_must_cover_every_code_line() {
        let mut json = full_resource_json();
        json["define"] = json!([{"lineNumber": 7, "code": "unrelated", "explanation": "?"}]);
        let resource: LearningResource = serde_json::from_value(json).unwrap();

        let violations = resource.violations();
        assert_eq!(violations.len(), 2, "{violations:?}");
        assert!(violations[0].contains("one entry per source line (2), got 1"));
        assert!(violations[1].starts_with("define: line numbers"));
    }

    #[test]
    fn test_example_lines_must_match_subexample() {
        let mut json = full_resource_json();
        json["subtopics"][0]["subexample"] = json!("stack.push(1);\nstack.push(2);\nstack.pop();");
        let resource: LearningResource = serde_json::from_value(json).unwrap();
        assert_eq!(
            resource.violations(),
            vec!["subtopics[0].exmexplain: expected one entry per source line (3), got 2"]
        );
    }

    #[test]
    fn test_line_numbers_may_arrive_unordered_but_not_repeated() {
        let mut json = full_resource_json();
        json["define"] = json!([
            {"lineNumber": 2, "code": "s.push(1);", "explanation": "Pushes 1."},
            {"lineNumber": 1, "code": "let mut s = Vec::new();", "explanation": "Creates the stack."}
        ]);
        let resource: LearningResource = serde_json::from_value(json.clone()).unwrap();
        assert!(resource.violations().is_empty());

        json["define"][0]["lineNumber"] = json!(1);
        let resource: LearningResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.violations(), vec!["define: line numbers must run from 1 to 2"]);
    }

    #[test]
    fn test_reduced_resource_is_lenient() {
        let reduced: ReducedResource = serde_json::from_value(json!({
            "topic": "Stacks",
            "description": "Short.",
            "points": ["LIFO"]
        }))
        .unwrap();
        assert!(reduced.violations().is_empty());
    }

    #[test]
    fn test_json_schema_carries_bounds() {
        let schema = json_schema_for::<LearningResource>();
        assert!(schema.get("$schema").is_none());
        let importance = &schema["properties"]["importance"];
        assert_eq!(importance["minItems"], 3);
        assert_eq!(importance["maxItems"], 5);
        assert!(schema["properties"].get("webResults").is_none());
    }

    #[tokio::test]
    async fn test_generate_conforming_sends_schema_and_parses() {
        let mut generator = MockStructuredGenerator::new();
        generator
            .expect_generate_object()
            .withf(|req| req.name == "learning_resource" && req.prompt == "teach stacks")
            .times(1)
            .returning(|_| Ok(full_resource_json()));

        let resource: LearningResource = generate_conforming(&generator, "teach stacks")
            .await
            .unwrap();
        assert_eq!(resource.topic, "Stacks");
    }

    #[tokio::test]
    async fn test_generate_conforming_rejects_out_of_bounds() {
        let mut generator = MockStructuredGenerator::new();
        generator.expect_generate_object().returning(|_| {
            let mut json = full_resource_json();
            json["commonMisconceptions"] = json!([]);
            Ok(json)
        });

        let err = generate_conforming::<LearningResource>(&generator, "p")
            .await
            .unwrap_err();
        match err {
            GenerationError::SchemaMismatch(msg) => assert!(msg.contains("commonMisconceptions")),
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_conforming_rejects_wrong_shape() {
        let mut generator = MockStructuredGenerator::new();
        generator
            .expect_generate_object()
            .returning(|_| Ok(json!({"topics": []})));

        let err = generate_conforming::<LearningResource>(&generator, "p")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::SchemaMismatch(_)));
    }
}
