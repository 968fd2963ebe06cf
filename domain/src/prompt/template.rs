//! Prompt templates for debates, battles and judging

use crate::debate::{DebateKind, Turn};
use crate::judge::{Rubric, ScoreFormatError};
use crate::persona::Persona;
use crate::tool::ToolResult;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Opening prompt shared by both participants
    pub fn opening(kind: DebateKind, topic: &str, first: &Persona, second: &Persona) -> String {
        match kind {
            DebateKind::PoliticalDebate => format!(
                r#"We're having a structured political debate on the topic: "{topic}"

This is a respectful debate between {first} and {second}.

Each response should:
1. Address the previous point made
2. Present your perspective clearly
3. Use examples, evidence and policy proposals
4. Be passionate but respectful and constructive
5. Stay true to your political alignment

Let's begin the debate!"#,
                first = first.name,
                second = second.name,
            ),
            DebateKind::PoliticalDiscussion => format!(
                "Let's have a political discussion about: {topic}. \
                 Please share your perspectives from your political viewpoints and engage constructively."
            ),
            DebateKind::PolicyAnalysis => format!(
                r#"Let's analyze the policy implications of: "{topic}"

Compare approaches from your perspective. Cover:
1. Likely effectiveness and unintended consequences
2. Costs and who bears them
3. Evidence from places where similar policies were tried
4. Your recommended approach and how to measure success"#
            ),
            DebateKind::RapBattle => format!(
                r#"🎤 RAP BATTLE TOPIC: "{topic}"

This is an intense rap battle between two legendary rappers trading verses in alternating rounds, each trying to outdo the other with superior bars, wordplay and crowd appeal.

ROUND FORMAT:
- Round 1: opening verses
- Round 2: response and escalation
- Round 3 and beyond: closers

{first} vs {second}

LET THE BATTLE BEGIN!"#,
                first = first.label(),
                second = second.label(),
            ),
        }
    }

    /// Instruction appended after the transcript on every turn but the first
    pub fn continuation(kind: DebateKind, speaker: &Persona, opponent: &Persona) -> String {
        if kind.is_rap_battle() {
            format!(
                "You are {}. {} just finished their verse. Respond with your next verse: \
                 answer their bars directly and stay in character.",
                speaker.name, opponent.name
            )
        } else {
            format!(
                "You are the {}. Please respond to the ongoing debate, addressing the points \
                 just made by the {} while staying true to your perspective.",
                speaker.name, opponent.name
            )
        }
    }

    /// Extend a persona prompt with the tools it may call
    pub fn persona_with_tools(persona_prompt: &str, tool_descriptions: &str) -> String {
        format!(
            r#"{persona_prompt}

You have access to the following tools to support your arguments with factual information:
{tool_descriptions}

Use these tools when you need current information, statistics or evidence. Always cite your sources when using tool results."#
        )
    }

    /// Ephemeral research context for the second half of a tool-using turn
    pub fn research_context(results: &[ToolResult]) -> String {
        let mut prompt = String::from("Research results for your response:\n");
        for result in results {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", result.tool_name, result.content()));
        }
        prompt.push_str(
            "\nNow continue your response, incorporating this research where it strengthens your argument.",
        );
        prompt
    }

    /// System prompt for the judge
    pub fn judge_system(rubric: Rubric) -> &'static str {
        match rubric {
            Rubric::Political => {
                r#"You are an impartial debate judge with expertise in logic, rhetoric and policy analysis.
You evaluate arguments on their merits, not on whether you agree with the political position.
You always answer with a single JSON object and nothing else."#
            }
            Rubric::RapBattle => {
                r#"You are a veteran battle rap judge who has scored hundreds of battles.
You judge craft, delivery and impact, not reputation.
You always answer with a single JSON object and nothing else."#
            }
        }
    }

    /// Evaluation prompt for one turn
    pub fn judge_turn(rubric: Rubric, topic: &str, turn: &Turn, context: &[Turn]) -> String {
        let mut prompt = format!("Topic: \"{}\"\n", topic);

        if !context.is_empty() {
            prompt.push_str("\nRecent context:\n");
            for prior in context {
                prompt.push_str(&format!(
                    "\n--- {} (turn {}) ---\n{}\n",
                    prior.speaker(),
                    prior.number(),
                    prior.text()
                ));
            }
        }

        prompt.push_str(&format!(
            "\nEvaluate this turn by {} (turn {}):\n\n{}\n\nScore it on each criterion:\n",
            turn.speaker(),
            turn.number(),
            turn.text()
        ));
        for criterion in rubric.criteria() {
            prompt.push_str(&format!(
                "- {} ({}): {}\n",
                criterion.key, criterion.label, criterion.guidance
            ));
        }
        prompt.push_str(&Self::judge_format(rubric));
        prompt
    }

    /// Stricter follow-up after a reply failed validation
    pub fn judge_retry(rubric: Rubric, error: &ScoreFormatError) -> String {
        format!(
            r#"Your previous reply could not be used: {error}.

Reply again with ONLY the JSON object. Rules:
- Include every one of the 8 criteria in "scores"
- Every score is a whole number from 0 to 10 (no decimals, no quotes)
- No text before or after the JSON
{}"#,
            Self::judge_format(rubric)
        )
    }

    fn judge_format(rubric: Rubric) -> String {
        let scores: Vec<String> = rubric.keys().map(|k| format!("\"{}\": <0-10>", k)).collect();
        let rationale: Vec<String> = rubric
            .keys()
            .map(|k| format!("\"{}\": \"<one sentence>\"", k))
            .collect();
        format!(
            r#"
Respond with JSON in exactly this shape:
{{
  "scores": {{{}}},
  "rationale": {{{}}},
  "{}": ["<up to 3 items>"],
  "weaknesses": ["<up to 3 items>"],
  "feedback": "<2-3 sentences>"
}}
"#,
            scores.join(", "),
            rationale.join(", "),
            rubric.highlights_key()
        )
    }
}
