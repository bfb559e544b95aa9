//! Fixtures shared by the unit tests of several modules.

use serde_json::{Value, json};

/// A generation response that satisfies the full schema.
pub fn full_resource_json() -> Value {
    let viz = json!({
        "step": "Step 1",
        "completeHtml": "<html><body><div><h1>Stack</h1></div></body></html>",
        "explanation": "Push an element",
        "purpose": "Show LIFO order"
    });
    json!({
        "topic": "Stacks",
        "description": "A stack is a last-in, first-out collection where elements are pushed and popped from the top.",
        "subtopics": [{
            "subtop": "Push and Pop",
            "subexplain": "Push adds an element to the top of the stack while pop removes the most recently added element.",
            "subexample": "stack.push(1);\nstack.pop();",
            "exmexplain": [
                {"lineNumber": 1, "code": "stack.push(1);", "explanation": "Adds 1."},
                {"lineNumber": 2, "code": "stack.pop();", "explanation": "Removes 1."}
            ],
            "subtopicVisualizationHtml": [viz.clone()]
        }],
        "points": ["Push is O(1)", "Pop is O(1)", "Peek is O(1)"],
        "importance": ["Call stacks", "Undo features", "Expression parsing"],
        "prerequisites": ["Arrays"],
        "learningObjectives": ["Implement a stack", "Recognize LIFO problems"],
        "code": {"topicofcode": "Stack in Rust", "tcode": "let mut s = Vec::new();\ns.push(1);"},
        "define": [
            {"lineNumber": 1, "code": "let mut s = Vec::new();", "explanation": "Creates the stack."},
            {"lineNumber": 2, "code": "s.push(1);", "explanation": "Pushes 1."}
        ],
        "visualizationHtml": [viz],
        "commonMisconceptions": [{
            "misconception": "Stacks are slow",
            "explanation": "People assume all containers copy on insert.",
            "correction": "Push and pop are amortized constant time."
        }],
        "practiceExercises": [
            {"question": "Reverse a string", "difficulty": "beginner", "solution": "...", "explanation": "..."},
            {"question": "Balanced brackets", "difficulty": "intermediate", "solution": "...", "explanation": "..."}
        ],
        "leetcodeProblem": {"isProgrammingTopic": true},
        "webSearchTagline": "stack data structure tutorial",
        "youtubeSearchTagline": "stack data structure explained"
    })
}

