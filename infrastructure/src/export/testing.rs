//! Debate fixtures for export tests.

use arena_domain::{
    Debate, DebateConfig, DebateKind, JudgeScore, ModelSpec, Participant, Persona, Provider,
    Rubric, TurnJudgement, Verdict,
};

fn config(max_turns: usize, judge: Option<ModelSpec>) -> DebateConfig {
    DebateConfig::builder(DebateKind::PoliticalDebate, "Universal basic income")
        .participants(
            Participant::new(
                Persona::progressive(),
                ModelSpec::new("gpt-4o", "GPT-4o", "gpt-4o", Provider::OpenAi),
            ),
            Participant::new(
                Persona::conservative(),
                ModelSpec::new("gemini", "Gemini 2.0 Flash", "gemini-2.0-flash", Provider::Google),
            ),
        )
        .max_turns(max_turns)
        .judge(judge)
        .build()
        .unwrap()
}

/// Completed, unjudged political debate with the given turn texts (max 4 turns)
pub fn finished_debate(texts: &[&str]) -> Debate {
    let mut debate = Debate::new(config(4, None));
    debate.start().unwrap();
    for text in texts {
        let turn = debate.transcript().draft_next(*text);
        debate.record_turn(turn).unwrap();
    }
    debate.complete(None).unwrap();
    debate
}

/// Two judged turns: the first scored 9 everywhere, the second unavailable
pub fn judged_debate() -> Debate {
    let judge = ModelSpec::new("claude", "Claude Sonnet", "claude-sonnet-4", Provider::Anthropic);
    let mut debate = Debate::new(config(2, Some(judge)));
    debate.start().unwrap();

    let score = JudgeScore::try_new(Rubric::Political, Rubric::Political.keys().map(|k| (k, 9)))
        .unwrap()
        .with_highlights(vec!["Concrete pilot data".to_string()])
        .with_feedback("Strong opening.");
    let first = debate
        .transcript()
        .draft_next("Finland's pilot improved wellbeing.")
        .with_judgement(TurnJudgement::Scored(score));
    debate.record_turn(first).unwrap();

    let second = debate
        .transcript()
        .draft_next("Pilots are too small to generalize.")
        .with_judgement(TurnJudgement::unavailable("judge timed out"));
    debate.record_turn(second).unwrap();

    let verdict = Verdict::from_transcript(Rubric::Political, debate.transcript());
    debate.complete(Some(verdict)).unwrap();
    debate
}
