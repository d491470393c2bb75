//! GraphQL request bodies and response decoding for the problem API.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use leetlog_shared::{
    Difficulty, DifficultyCounts, DifficultyTotals, LeetlogError, ProblemMetadata, Result,
};

const QUESTION_QUERY: &str = "query questionData($titleSlug: String!) { question(titleSlug: $titleSlug) { questionFrontendId title difficulty } }";

const COUNTS_QUERY: &str = "query allQuestionsCount { allQuestionsCount { difficulty count } }";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for the per-problem query.
pub(crate) fn question_request(slug: &str) -> Value {
    json!({
        "operationName": "questionData",
        "variables": { "titleSlug": slug },
        "query": QUESTION_QUERY,
    })
}

/// Body for the global counts query.
pub(crate) fn counts_request() -> Value {
    json!({
        "operationName": "allQuestionsCount",
        "variables": {},
        "query": COUNTS_QUERY,
    })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<QuestionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionNode {
    question_frontend_id: String,
    title: String,
    difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountsData {
    all_questions_count: Vec<CountNode>,
}

#[derive(Debug, Deserialize)]
struct CountNode {
    difficulty: String,
    count: u32,
}

/// Unwrap the `data` member, turning GraphQL errors into parse errors.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| LeetlogError::parse(format!("malformed response: {e}")))?;

    match envelope.data {
        Some(data) => Ok(data),
        None => {
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            Err(LeetlogError::parse(format!(
                "response has no data: {}",
                if messages.is_empty() {
                    "no error given".to_string()
                } else {
                    messages.join("; ")
                }
            )))
        }
    }
}

/// Decode a per-problem response.
pub(crate) fn parse_question(slug: &str, body: &str) -> Result<ProblemMetadata> {
    let data: QuestionData = unwrap_envelope(body)?;
    let node = data
        .question
        .ok_or_else(|| LeetlogError::UnknownSlug(slug.to_string()))?;

    let frontend_id: u32 = node.question_frontend_id.trim().parse().map_err(|e| {
        LeetlogError::parse(format!(
            "questionFrontendId '{}' is not a number: {e}",
            node.question_frontend_id
        ))
    })?;

    Ok(ProblemMetadata {
        frontend_id,
        title: node.title,
        difficulty: node.difficulty,
    })
}

/// Decode a global counts response.
///
/// Easy, Medium and Hard are required. A missing `All` record is derived
/// from their sum.
pub(crate) fn parse_counts(body: &str) -> Result<DifficultyTotals> {
    let data: CountsData = unwrap_envelope(body)?;

    let lookup = |label: &str| {
        data.all_questions_count
            .iter()
            .find(|n| n.difficulty == label)
            .map(|n| n.count)
    };

    let mut by_difficulty = DifficultyCounts::default();
    for d in Difficulty::ALL {
        let count = lookup(d.as_str())
            .ok_or_else(|| LeetlogError::parse(format!("no count for difficulty '{d}'")))?;
        match d {
            Difficulty::Easy => by_difficulty.easy = count,
            Difficulty::Medium => by_difficulty.medium = count,
            Difficulty::Hard => by_difficulty.hard = count,
        }
    }

    let all = lookup("All").unwrap_or_else(|| by_difficulty.total());

    Ok(DifficultyTotals { by_difficulty, all })
}
