//! Fixed instruction text and prompt composition.

use serde::Serialize;

/// Instruction text sent ahead of every question.
///
/// Describes the single `STUDENT` table and gives two worked examples.
pub const SQL_INSTRUCTIONS: &str = r#"
    You are an expert in converting English questions to SQL query!
    The SQL database has the name STUDENT and has the following columns - NAME, CLASS,
    SECTION.

    For example:
    Example 1 - How many entries of records are present?,
    the SQL command will be something like this: SELECT COUNT(*) FROM STUDENT;

    Example 2 - Tell me all the students studying in Data Science class?,
    the SQL command will be something like this: SELECT * FROM STUDENT WHERE CLASS="Data Science";

    Do not include any backticks or the word 'sql' in the output.
    "#;

/// Two-part model request: instructions first, then the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub instructions: &'static str,
    pub question: String,
}

impl Prompt {
    /// The ordered two-element sequence sent to the model.
    pub fn parts(&self) -> [&str; 2] {
        [self.instructions, &self.question]
    }
}

/// Pair the fixed instructions with a question.
///
/// The question is passed through untouched, including when empty.
pub fn compose(question: impl Into<String>) -> Prompt {
    Prompt {
        instructions: SQL_INSTRUCTIONS,
        question: question.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_instructions_describe_student_table() {
        assert!(SQL_INSTRUCTIONS.contains("STUDENT"));
        assert!(SQL_INSTRUCTIONS.contains("NAME, CLASS"));
        assert!(SQL_INSTRUCTIONS.contains("SELECT COUNT(*) FROM STUDENT;"));
        assert!(SQL_INSTRUCTIONS.contains(r#"WHERE CLASS="Data Science";"#));
        assert!(SQL_INSTRUCTIONS.contains("Do not include any backticks"));
    }

    #[test]
    fn test_empty_question() {
        let prompt = compose("");
        assert_eq!(prompt.parts(), [SQL_INSTRUCTIONS, ""]);
    }

    proptest! {
        #[test]
        fn prop_parts_keep_instructions_then_question(question in any::<String>()) {
            let prompt = compose(question.clone());
            let parts = prompt.parts();
            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], SQL_INSTRUCTIONS);
            prop_assert_eq!(parts[1], question.as_str());
        }
    }
}
