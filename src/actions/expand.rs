use crate::app::AppState;
use crate::errors::SuggestError;
use crate::suggest::{complete_expansion, ExpansionOutcome, ExpansionRequest, ExpansionTask};
use tracing::debug;

/// Asks the suggester for sub-topics of the selected node in the background.
pub fn start_expansion(app: &mut AppState) {
    let Some(suggester) = app.suggester.clone() else {
        app.set_message(SuggestError::NotConfigured.to_string());
        return;
    };
    if app.expansion.is_some() {
        app.set_message(SuggestError::Busy.to_string());
        return;
    }
    let Some(request) = app
        .selection()
        .and_then(|key| ExpansionRequest::for_node(&app.store, key))
    else {
        app.set_message("Select a node to expand");
        return;
    };
    app.set_message(format!("Expanding \"{}\"...", request.path.join(" > ")));
    app.expansion = Some(ExpansionTask::spawn(suggester, request));
}

/// Applies the running expansion once it has finished.
pub fn poll_expansion(app: &mut AppState) {
    let Some(result) = app.expansion.as_ref().and_then(|task| task.poll()) else {
        return;
    };
    let Some(task) = app.expansion.take() else {
        return;
    };
    let outcome = complete_expansion(&mut app.store, task.request(), result);
    debug!(?outcome, "expansion finished");
    report(app, outcome);
}

pub fn report(app: &mut AppState, outcome: ExpansionOutcome) {
    match outcome {
        ExpansionOutcome::Added(keys) => {
            app.refresh_layout();
            app.set_message(format!("Added {} topics", keys.len()));
        }
        ExpansionOutcome::NodeGone => {
            app.set_message("The expanded node no longer exists");
        }
        ExpansionOutcome::Failed(e) => app.set_message(e.to_string()),
    }
}
