use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::Result;
use crm_api::{
    load_customers, AdminAction, AdminClient, ClientOptions, CustomerSource, FallbackPolicy,
};
use crm_core::rules::local_today;
use crm_core::time::{local_offset, now_utc};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadCustomers,
    RunAdmin(AdminAction),
}

pub struct Backend {
    source: Box<dyn CustomerSource>,
    policy: FallbackPolicy,
}

impl Backend {
    pub fn new(source: Box<dyn CustomerSource>, policy: FallbackPolicy) -> Self {
        Self { source, policy }
    }
}

/// Result of an admin call, as sent back from the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOutcome {
    pub action: AdminAction,
    pub result: std::result::Result<String, String>,
}

pub struct AdminWorker {
    options: ClientOptions,
    tx: Sender<AdminOutcome>,
    rx: Receiver<AdminOutcome>,
}

impl AdminWorker {
    pub fn new(options: ClientOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { options, tx, rx }
    }

    fn spawn(&self, action: AdminAction) {
        let options = self.options.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = AdminClient::new(&options)
                .and_then(|client| client.perform(action))
                .map_err(|err| action.failure_message(&err));
            let _ = tx.send(AdminOutcome { action, result });
        });
    }

    /// Hands finished admin calls to the app without blocking.
    pub fn drain(&self, app: &mut App) {
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => app.finish_admin(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}

pub fn execute_action(
    app: &mut App,
    backend: &Backend,
    worker: &AdminWorker,
    action: Action,
) -> Result<()> {
    match action {
        Action::LoadCustomers => {
            let now = now_utc();
            app.set_clock(local_today(now, local_offset())?, now);
            match load_customers(backend.source.as_ref(), backend.policy) {
                Ok(outcome) => {
                    app.apply_customers(outcome.collection, outcome.origin);
                    app.clear_error();
                }
                Err(err) => app.apply_load_failure(format!("Error loading customers: {err}")),
            }
        }
        Action::RunAdmin(admin) => {
            if app.begin_admin(admin) {
                worker.spawn(admin);
            }
        }
    }
    Ok(())
}
