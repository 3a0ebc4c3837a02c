use serde::{Deserialize, Serialize};

/// Metadata of the problem the assistant is helping with.
///
/// Mirrors the JSON returned by the current-problem endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemContext {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub total_steps: u32,
}

impl ProblemContext {
    /// Greeting shown as the first assistant message of a session.
    pub fn greeting(&self) -> String {
        let mut text = format!("Today's problem: {}\n\n{}", self.title, self.description);

        let mut details = Vec::new();
        if !self.difficulty_level.is_empty() {
            details.push(format!("Difficulty: {}", self.difficulty_level));
        }
        if !self.category.is_empty() {
            details.push(format!("Category: {}", self.category));
        }
        if self.total_steps > 0 {
            details.push(format!("Steps: {}", self.total_steps));
        }
        if !details.is_empty() {
            text.push_str("\n\n");
            text.push_str(&details.join(" | "));
        }

        text.push_str("\n\nWalk me through your approach and I'll review each step.");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sum() -> ProblemContext {
        ProblemContext {
            id: "two_sum".to_string(),
            title: "Two Sum".to_string(),
            description: "Find two numbers that add to target".to_string(),
            difficulty_level: "beginner".to_string(),
            category: "arrays".to_string(),
            total_steps: 4,
        }
    }

    #[test]
    fn test_greeting_contains_title_and_description() {
        let greeting = two_sum().greeting();
        assert!(greeting.contains("Two Sum"));
        assert!(greeting.contains("Find two numbers that add to target"));
        assert!(greeting.contains("Difficulty: beginner | Category: arrays | Steps: 4"));
    }

    #[test]
    fn test_greeting_skips_missing_details() {
        let problem = ProblemContext {
            difficulty_level: String::new(),
            category: String::new(),
            total_steps: 0,
            ..two_sum()
        };
        assert!(!problem.greeting().contains("Difficulty"));
    }

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "id": "math_sequence",
            "title": "Mathematical Sequence Problem",
            "description": "Find the next number in the sequence: 2, 4, 8, 16, ?",
            "difficulty_level": "intermediate",
            "category": "mathematics",
            "total_steps": 5
        }"#;
        let problem: ProblemContext = serde_json::from_str(json).unwrap();
        assert_eq!(problem.id, "math_sequence");
        assert_eq!(problem.total_steps, 5);
    }
}
