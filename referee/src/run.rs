use budget_shogi::{Action, Session};
use tracing::{debug, info};

use crate::recording::Recorder;

/// How a script went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Feeds every action into the session. Rejected actions are counted and
/// skipped; accepted ones are handed to the recorder, if any.
pub fn run_script(
    session: &mut Session,
    actions: Vec<Action>,
    recorder: &mut Option<Recorder>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for (step, action) in actions.into_iter().enumerate() {
        match session.apply(action.clone()) {
            Ok(event) => {
                debug!(step, "Accepted");
                summary.accepted += 1;
                if let Some(recorder) = recorder {
                    recorder.store(action, event);
                }
            }
            Err(reason) => {
                info!(step, %reason, ?action, "Rejected");
                summary.rejected += 1;
            }
        }
    }
    if let Some(winner) = session.winner() {
        info!(%winner, "Game over");
    }
    summary
}
