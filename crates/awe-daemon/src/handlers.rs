//! Action handlers, run on the launcher owner.
//!
//! Every handler is synchronous and answers with exactly one `Response`.
//! Activation failures are not protocol errors: they answer `ok` with the
//! outcome so fire-and-forget clients never see them.

use awe_core::resolver::SetRequest;
use awe_core::{ActivateFlags, Launcher, Outcome};
use awe_ipc::{
    Action, ActivatePayload, MoveToMonitorPayload, QueryPayload, Request, Response, ShowPayload,
    WindowActionPayload,
};
use awe_types::QueryResults;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

pub(crate) fn handle(launcher: &mut Launcher, request: &Request) -> Response {
    let action = match request.parsed_action() {
        Ok(action) => action,
        Err(e) => {
            warn!("{e}");
            return Response::error(e.to_string());
        }
    };
    debug!("Handling {action}");

    match action {
        Action::Show => with_payload(request, action, |payload| handle_show(launcher, payload)),
        Action::Hide => {
            launcher.hide();
            Response::ok()
        }
        Action::Toggle => {
            launcher.toggle();
            Response::ok()
        }
        Action::Reload => {
            launcher.reload();
            Response::ok()
        }
        Action::Query => with_payload(request, action, |payload| handle_query(launcher, &payload)),
        Action::Status => to_response(&launcher.status()),
        Action::Activate => {
            with_payload(request, action, |payload| handle_activate(launcher, payload))
        }
        Action::MoveToMonitor => with_payload(request, action, |payload: MoveToMonitorPayload| {
            outcome_response(&launcher.begin_move_to_monitor(payload.index))
        }),
        Action::WindowAction => with_payload(request, action, |payload: WindowActionPayload| {
            outcome_response(&launcher.window_action(payload.index, payload.action))
        }),
    }
}

fn with_payload<T: DeserializeOwned>(
    request: &Request,
    action: Action,
    handler: impl FnOnce(T) -> Response,
) -> Response {
    match request.payload_as::<T>() {
        Ok(payload) => handler(payload),
        Err(e) => {
            warn!("Invalid payload for {action}: {e}");
            Response::error(format!("Invalid payload for {action}: {e}"))
        }
    }
}

fn to_response(data: &impl serde::Serialize) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => Response::ok_with(value),
        Err(e) => Response::error(format!("Failed to encode reply: {e}")),
    }
}

fn handle_show(launcher: &mut Launcher, payload: ShowPayload) -> Response {
    let request = SetRequest {
        set: payload.set.filter(|s| !s.is_empty()),
        mode: payload.mode.filter(|m| !m.is_empty()),
    };
    launcher.show(request, payload.query);
    Response::ok()
}

fn handle_query(launcher: &Launcher, payload: &QueryPayload) -> Response {
    let results = launcher.peek(&payload.text, payload.limit);
    to_response(&QueryResults::from_candidates(&results))
}

fn outcome_name(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Ignored => json!("ignored"),
        Outcome::Continue => json!("continue"),
        Outcome::Hidden => json!("hidden"),
        Outcome::Exit => json!("exit"),
        Outcome::Selected(text) => json!({ "selected": text }),
    }
}

fn outcome_response(outcome: &Outcome) -> Response {
    Response::ok_with(json!({ "outcome": outcome_name(outcome) }))
}

fn handle_activate(launcher: &mut Launcher, payload: ActivatePayload) -> Response {
    let flags = ActivateFlags {
        force_terminal: payload.terminal,
        hold_open: payload.hold_open,
    };
    let outcome = launcher.activate(payload.index, flags);
    if outcome == Outcome::Ignored {
        debug!("Activate {} ignored", payload.index);
    }
    outcome_response(&outcome)
}
