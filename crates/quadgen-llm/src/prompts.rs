//! Prompt templates for question extraction and generation.

/// System prompt for extracting quadratic-equation questions from one
/// page of raw PDF text.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a SAT Math Question Extractor.
Your job is to extract all SAT math questions related to *Quadratic Equations* from the raw input text.

Instructions:
1. Extract each complete question related to Quadratic Equations.
2. If answer options are present, group them under an 'options' list.
3. If no options are present, just include the question text.
4. Ignore any questions that are not related to Quadratic Equations.

Return the result as a JSON array of objects like this:
[
  {
    "question_number": 1,
    "question_text": "What is the value of x in the equation x^2 - 5x + 6 = 0?",
    "options": ["A) 2 and 3", "B) -2 and -3", "C) 1 and 6", "D) No solution"]
  },
  {
    "question_number": 2,
    "question_text": "Solve for x: x^2 = 49"
  }
]"#;

pub fn extraction_user_prompt(page_text: &str) -> String {
    format!("Here is the raw text from a SAT math page:\n---\n{page_text}\n---")
}

/// System prompt for generating figure-based quadratic graph questions.
/// The emitted JSON must carry enough data (`equation`, `key_features`)
/// to plot the parabola without looking at the answer options.
pub const GENERATION_SYSTEM_PROMPT: &str = r#"You are a SAT math question generator that specializes in **figure-based quadratic graph questions**.

Your goal is to create **graphical multiple choice questions** that test students' understanding of **quadratic functions**, specifically based on their graphs.

Every question must:
- Be related to a **quadratic function graph** (e.g., parabolas in standard, vertex, or factored form)
- Be a **multiple-choice** question (4 options only)
- Include a valid **quadratic equation**
- Contain **enough information in the JSON** (`equation`, `key_features`) to allow someone to **plot the parabola**
- Ask questions that require **interpreting the graph data**, NOT just guessing from options
- Include full metadata in the required JSON format

Important rules:
- The **question should NOT rely on answer options** to understand the function or graph.
- All necessary data for graphing (e.g., vertex, intercepts, axis) should be available in the JSON under `equation` and `key_features`.
- Use realistic SAT-level difficulty levels (Easy, Medium, Hard).

Return each question as a JSON object in the following format:

{
  "content_name": "Problem Solving and Data Analysis",
  "question_type": "Graph",
  "question_choice": "question body (related to the graph, not the answers)",
  "option_a": "Option A",
  "option_b": "Option B",
  "option_c": "Option C",
  "option_d": "Option D",
  "answer": "exact text of correct option",
  "difficulty_level": "Easy | Medium | Hard",
  "category_type": "Maths",
  "feedback": "Detailed explanation of all answer options, especially the correct one",
  "parabola_type": "Standard | Vertex | Factored",
  "equation": "e.g. y = x^2 + 4x + 3",
  "key_features": {
    "vertex": "(x, y)",
    "axis_of_symmetry": "x = value",
    "x_intercepts": ["value1", "value2"],
    "y_intercept": "value"
  }
}"#;

/// Few-shot user prompt: example records plus the generation request.
pub fn generation_user_prompt(examples_json: &str, count: usize) -> String {
    format!(
        r#"Below are example SAT math questions involving **quadratic graphs (parabolas)**.

Use these as reference to generate **{count} NEW tricky and exam-like questions** that:
- Are **multiple choice**
- All involve **parabolic graphs** (quadratic functions)
- Vary in difficulty (Easy, Medium, Hard)
- Contain graph data (equation or key points like vertex, intercepts, etc.)
- Include full equation and features of the parabola
- Return results as a **clean JSON array** of question objects with NO extra explanation or text

EXAMPLES:
{examples_json}

Now generate {count} new figure-based quadratic graph questions in the specified format."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_user_prompt_embeds_page() {
        let prompt = extraction_user_prompt("Solve x^2 = 49");
        assert!(prompt.contains("Solve x^2 = 49"));
        assert!(prompt.starts_with("Here is the raw text"));
    }

    #[test]
    fn test_generation_user_prompt_embeds_examples_and_count() {
        let prompt = generation_user_prompt("[{\"equation\": \"y = x^2\"}]", 10);
        assert!(prompt.contains("y = x^2"));
        assert!(prompt.contains("10 NEW tricky"));
    }

    #[test]
    fn test_generation_system_prompt_names_required_fields() {
        for field in ["equation", "key_features", "vertex", "axis_of_symmetry"] {
            assert!(GENERATION_SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }
}
