//! Canned content used to backfill or replace generated resources.

use crate::html::FALLBACK_INTERACTIVE_HTML;
use crate::resource::{
    Exercise, ExerciseDifficulty, LearningResource, LineExplanation, Misconception,
    ProblemDifficulty, ProblemRef, ProblemSet, SelectedProblem, Subtopic, VisualizationStep,
};
use std::collections::HashSet;

/// Number of misconceptions every finished resource carries at least.
pub const MIN_MISCONCEPTIONS: usize = 2;
/// Maximum number of alternative practice problems.
pub const MAX_ALTERNATIVE_PROBLEMS: usize = 4;

fn leetcode_url(slug: &str) -> String {
    format!("https://leetcode.com/problems/{slug}/")
}

fn problem(title: &str, slug: &str, id: u32, difficulty: ProblemDifficulty, description: &str, tags: &[&str]) -> ProblemRef {
    ProblemRef {
        title: title.to_string(),
        difficulty,
        id,
        url: leetcode_url(slug),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The starter problem used when curation picked none.
pub fn default_selected_problem(topic: &str) -> SelectedProblem {
    SelectedProblem {
        problem: problem(
            "Two Sum",
            "two-sum",
            1,
            ProblemDifficulty::Easy,
            "Return the indices of the two numbers that add up to a target.",
            &["Array", "Hash Table"],
        ),
        rationale: format!(
            "Two Sum is a gentle warm-up that builds the problem-solving habits needed to practice {topic}."
        ),
    }
}

/// Four alternatives spread across difficulties, skewed towards easier problems.
pub fn default_alternative_problems() -> Vec<ProblemRef> {
    vec![
        problem(
            "Valid Parentheses",
            "valid-parentheses",
            20,
            ProblemDifficulty::Easy,
            "Determine whether a string of brackets is properly nested.",
            &["String", "Stack"],
        ),
        problem(
            "Longest Substring Without Repeating Characters",
            "longest-substring-without-repeating-characters",
            3,
            ProblemDifficulty::Medium,
            "Find the length of the longest substring without repeated characters.",
            &["Hash Table", "String", "Sliding Window"],
        ),
        problem(
            "Group Anagrams",
            "group-anagrams",
            49,
            ProblemDifficulty::Medium,
            "Group strings that are anagrams of each other.",
            &["Array", "Hash Table", "Sorting"],
        ),
        problem(
            "Trapping Rain Water",
            "trapping-rain-water",
            42,
            ProblemDifficulty::Hard,
            "Compute how much water an elevation map can trap after raining.",
            &["Array", "Two Pointers", "Dynamic Programming"],
        ),
    ]
}

/// Brings a problem set into its published shape.
///
/// A set that is not about programming is cleared. A programming set always
/// ends up with a selected problem and 1 to 4 alternatives that do not repeat it.
pub fn normalize_problem_set(set: ProblemSet, topic: &str) -> ProblemSet {
    if !set.is_programming_topic {
        return ProblemSet::default();
    }

    let selected = set
        .selected_problem
        .filter(|s| !s.problem.title.trim().is_empty())
        .unwrap_or_else(|| default_selected_problem(topic));

    let mut seen = HashSet::from([selected.problem.id]);
    let mut alternatives: Vec<ProblemRef> = set
        .alternative_problems
        .into_iter()
        .filter(|p| !p.title.trim().is_empty() && seen.insert(p.id))
        .take(MAX_ALTERNATIVE_PROBLEMS)
        .collect();

    if alternatives.is_empty() {
        alternatives = default_alternative_problems()
            .into_iter()
            .filter(|p| seen.insert(p.id))
            .collect();
    }

    ProblemSet {
        is_programming_topic: true,
        selected_problem: Some(selected),
        alternative_problems: alternatives,
    }
}

/// Generic misconceptions phrased around the topic.
fn generic_misconceptions(topic: &str) -> [Misconception; 2] {
    [
        Misconception {
            misconception: format!("{topic} can be mastered by memorizing definitions."),
            explanation: format!(
                "Definitions describe {topic}, but they do not show how its ideas behave in real situations."
            ),
            correction: format!(
                "Work through examples and exercises so the concepts of {topic} become tools you can apply."
            ),
        },
        Misconception {
            misconception: format!("The basics of {topic} are not worth revisiting."),
            explanation: format!(
                "Advanced material in {topic} builds directly on the fundamentals, so gaps compound."
            ),
            correction: format!(
                "Review the foundations of {topic} whenever an advanced idea feels unclear."
            ),
        },
    ]
}

/// Adds generic misconceptions until there are at least [`MIN_MISCONCEPTIONS`].
pub fn pad_misconceptions(misconceptions: &mut Vec<Misconception>, topic: &str) {
    let mut generic = generic_misconceptions(topic).into_iter();
    while misconceptions.len() < MIN_MISCONCEPTIONS {
        match generic.next() {
            Some(m) => misconceptions.push(m),
            None => break,
        }
    }
}

fn canned_visualization(step: &str, explanation: String) -> VisualizationStep {
    VisualizationStep {
        step: step.to_string(),
        complete_html: FALLBACK_INTERACTIVE_HTML.to_string(),
        explanation,
        purpose: "Step through the idea one stage at a time.".to_string(),
    }
}

fn explain_lines(example: &str, explanations: &[&str]) -> Vec<LineExplanation> {
    example
        .lines()
        .zip(explanations)
        .enumerate()
        .map(|(i, (code, explanation))| LineExplanation {
            line_number: i as u32 + 1,
            code: code.to_string(),
            explanation: explanation.to_string(),
        })
        .collect()
}

fn canned_subtopic(name: String, explanation: String, example: String, line_notes: &[&str]) -> Subtopic {
    let example_lines = explain_lines(&example, line_notes);
    Subtopic {
        visualization_html: vec![canned_visualization(
            "Step 1",
            format!("An interactive walk-through of {name}."),
        )],
        name,
        explanation,
        example: Some(example),
        example_lines,
    }
}

/// Two subtopics used when generation produced none.
pub fn default_subtopics(topic: &str) -> Vec<Subtopic> {
    vec![
        canned_subtopic(
            format!("Fundamentals of {topic}"),
            format!(
                "The fundamentals of {topic} introduce its core vocabulary, the problems it solves and the basic rules every later idea relies on."
            ),
            format!("1. Define what {topic} is.\n2. Name the problem it solves.\n3. Try the simplest possible example."),
            &[
                "Start from a precise definition.",
                "Connect the idea to a concrete problem.",
                "Confirm understanding with a tiny example.",
            ],
        ),
        canned_subtopic(
            format!("Applying {topic}"),
            format!(
                "Applying {topic} means recognizing when it fits a problem, carrying out its steps deliberately and checking the result against expectations."
            ),
            "1. Recognize a matching problem.\n2. Apply the steps in order.\n3. Check the result.".to_string(),
            &[
                "Look for the signals that this technique applies.",
                "Work through each step without skipping ahead.",
                "Verify the outcome and reflect on what changed.",
            ],
        ),
    ]
}

fn minimal_subtopic(name: String, topic: &str, focus: &str) -> Subtopic {
    Subtopic {
        explanation: format!(
            "This part of the {topic} learning path covers {focus}, building on what came before it."
        ),
        example: None,
        example_lines: Vec::new(),
        visualization_html: vec![canned_visualization(
            "Overview",
            format!("An overview of {name}."),
        )],
        name,
    }
}

/// The static resource returned when every generation tier failed.
///
/// It needs no further postprocessing and carries no enrichment.
pub fn minimal_resource(topic: &str) -> LearningResource {
    LearningResource {
        topic: topic.to_string(),
        description: format!(
            "{topic} is presented here as a structured learning path that moves from the basics to advanced ideas."
        ),
        subtopics: vec![
            minimal_subtopic(
                format!("Introduction to {topic}"),
                topic,
                "basic concepts, fundamentals and getting started",
            ),
            minimal_subtopic(
                format!("Core {topic} Concepts"),
                topic,
                "main principles, key components and essential features",
            ),
            minimal_subtopic(
                format!("Advanced {topic}"),
                topic,
                "advanced techniques, best practices and real-world applications",
            ),
        ],
        points: vec![
            format!("Understand the basic concepts of {topic}"),
            format!("Learn the core principles of {topic}"),
            format!("Explore advanced applications of {topic}"),
        ],
        importance: vec![
            format!("{topic} is a foundation for related subjects"),
            format!("{topic} appears in real-world problems"),
            format!("Understanding {topic} sharpens problem-solving skills"),
        ],
        prerequisites: vec!["Curiosity and willingness to practice".to_string()],
        learning_objectives: vec![
            format!("Explain the key ideas of {topic}"),
            format!("Apply {topic} to a simple problem"),
        ],
        code: None,
        define: Vec::new(),
        visualization_html: vec![canned_visualization(
            "Overview",
            format!("An interactive overview of {topic}."),
        )],
        common_misconceptions: generic_misconceptions(topic).into(),
        practice_exercises: vec![
            Exercise {
                question: format!("Explain {topic} in your own words."),
                difficulty: ExerciseDifficulty::Beginner,
                solution: format!("A short summary that defines {topic} and names one use."),
                explanation: "Teaching an idea is the fastest way to find gaps in it.".to_string(),
            },
            Exercise {
                question: format!("Describe a situation where {topic} is useful."),
                difficulty: ExerciseDifficulty::Intermediate,
                solution: format!("A concrete scenario showing the benefit of {topic}."),
                explanation: "Linking concepts to situations makes them easier to recall.".to_string(),
            },
        ],
        leetcode_problem: ProblemSet::default(),
        web_search_tagline: topic.to_string(),
        youtube_search_tagline: topic.to_string(),
        web_results: Vec::new(),
        youtube_results: Vec::new(),
    }
}
