//! Judge turn
//!
//! Scores one turn against the debate's rubric. A malformed reply gets one
//! stricter retry; if that fails too, the turn is marked unscored instead
//! of holding up the debate.

use crate::ports::llm_gateway::{GatewayError, LlmSession};
use arena_domain::{Message, PromptTemplate, Rubric, Turn, TurnJudgement, parse_judge_response};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The judge only fails when the debate is being interrupted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Judging interrupted")]
pub struct JudgeCancelled;

/// Agent scoring turns with a dedicated model
pub struct JudgeAgent {
    rubric: Rubric,
    session: Box<dyn LlmSession>,
}

impl JudgeAgent {
    pub fn new(rubric: Rubric, session: Box<dyn LlmSession>) -> Self {
        Self { rubric, session }
    }

    pub fn rubric(&self) -> Rubric {
        self.rubric
    }

    /// Score `turn`, given the turns that preceded it.
    ///
    /// Only the last [`Rubric::context_window`] turns of `prior` are shown
    /// to the judge.
    pub async fn evaluate(
        &self,
        topic: &str,
        turn: &Turn,
        prior: &[Turn],
        cancel: &CancellationToken,
    ) -> Result<TurnJudgement, JudgeCancelled> {
        let window = self.rubric.context_window();
        let context = &prior[prior.len().saturating_sub(window)..];
        let mut messages = vec![
            Message::system(PromptTemplate::judge_system(self.rubric)),
            Message::user(PromptTemplate::judge_turn(self.rubric, topic, turn, context)),
        ];

        let first_failure = match self.ask(&messages, cancel).await? {
            Ok(reply) => match parse_judge_response(self.rubric, &reply) {
                Ok(score) => {
                    debug!("Turn {} scored {}", turn.number(), score.total());
                    return Ok(TurnJudgement::Scored(score));
                }
                Err(e) => {
                    warn!("Judge reply for turn {} unusable: {}", turn.number(), e);
                    messages.push(Message::assistant(reply));
                    messages.push(Message::user(PromptTemplate::judge_retry(self.rubric, &e)));
                    e.to_string()
                }
            },
            Err(e) => {
                warn!("Judge request for turn {} failed: {}", turn.number(), e);
                e.to_string()
            }
        };

        let judgement = match self.ask(&messages, cancel).await? {
            Ok(reply) => match parse_judge_response(self.rubric, &reply) {
                Ok(score) => TurnJudgement::Scored(score),
                Err(e) => TurnJudgement::unavailable(format!(
                    "judge reply unusable after retry ({}; then {})",
                    first_failure, e
                )),
            },
            Err(e) => TurnJudgement::unavailable(format!(
                "judge unavailable after retry ({}; then {})",
                first_failure, e
            )),
        };
        if !judgement.is_scored() {
            warn!("No score available for turn {}", turn.number());
        }
        Ok(judgement)
    }

    async fn ask(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
    ) -> Result<Result<String, GatewayError>, JudgeCancelled> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(JudgeCancelled),
            reply = self.session.send(messages) => Ok(reply),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{ScriptedSession, Step, judge_reply, model};
    use arena_domain::Seat;

    fn judge(rubric: Rubric, steps: Vec<Step>) -> (JudgeAgent, ScriptedSession) {
        let session = ScriptedSession::new(model("judge"), steps);
        (JudgeAgent::new(rubric, Box::new(session.clone())), session)
    }

    fn turns(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                let seat = Seat::for_index(i);
                Turn::new(i, seat, seat.as_str(), format!("argument {}", i))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_scores_all_criteria() {
        let (judge, session) = judge(Rubric::Political, vec![Step::Reply(judge_reply(Rubric::Political, 7))]);
        let history = turns(5);
        let judgement = judge
            .evaluate("Tax reform", &history[4], &history[..4], &CancellationToken::new())
            .await
            .unwrap();
        let score = judgement.score().unwrap();
        assert_eq!(score.scores().count(), 8);
        assert_eq!(score.total(), 56);

        // political judges see the last three turns only
        let prompt = &session.requests()[0][1].content;
        assert!(!prompt.contains("argument 0"));
        assert!(prompt.contains("argument 1"));
        assert!(prompt.contains("argument 3"));
    }

    #[tokio::test]
    async fn test_retry_after_out_of_range_score() {
        let bad = judge_reply(Rubric::RapBattle, 11);
        let good = judge_reply(Rubric::RapBattle, 9);
        let (judge, session) = judge(Rubric::RapBattle, vec![Step::Reply(bad), Step::Reply(good)]);
        let history = turns(1);
        let judgement = judge
            .evaluate("Battle", &history[0], &[], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(judgement.score().unwrap().total(), 72);

        let retry = session.requests()[1].clone();
        assert_eq!(retry.len(), 4);
        assert!(retry[3].content.contains("out of range"));
    }

    #[tokio::test]
    async fn test_second_failure_yields_placeholder() {
        let (judge, _) = judge(
            Rubric::Political,
            vec![
                Step::reply("I think the first speaker did well."),
                Step::reply("{\"scores\": {\"logic_reasoning\": 7.5}}"),
            ],
        );
        let history = turns(1);
        let judgement = judge
            .evaluate("Tax reform", &history[0], &[], &CancellationToken::new())
            .await
            .unwrap();
        assert!(!judgement.is_scored());
        assert!(matches!(judgement, TurnJudgement::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_provider_error_is_retried_then_degrades() {
        let (judge, session) = judge(
            Rubric::Political,
            vec![
                Step::Fail(GatewayError::Timeout),
                Step::Fail(GatewayError::Timeout),
            ],
        );
        let history = turns(1);
        let judgement = judge
            .evaluate("Tax reform", &history[0], &[], &CancellationToken::new())
            .await
            .unwrap();
        assert!(!judgement.is_scored());
        // the retry repeats the original request
        assert_eq!(session.requests()[0], session.requests()[1]);
    }

    #[tokio::test]
    async fn test_cancelled() {
        let (judge, _) = judge(Rubric::Political, vec![Step::Hang]);
        let history = turns(1);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(
            judge.evaluate("Tax", &history[0], &[], &cancel).await,
            Err(JudgeCancelled)
        );
    }
}
