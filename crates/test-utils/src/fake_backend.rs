use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stalecheck::errors::Result;
use stalecheck::exec::{ActionBackend, ActionReport, BuildAction};

/// A fake action backend that:
/// - records which actions were "run"
/// - immediately reports success, unless the target is in the failing set.
pub struct FakeActionBackend {
    ran: Arc<Mutex<Vec<BuildAction>>>,
    failing: HashSet<String>,
}

impl FakeActionBackend {
    pub fn new(ran: Arc<Mutex<Vec<BuildAction>>>) -> Self {
        Self {
            ran,
            failing: HashSet::new(),
        }
    }

    /// Script the named target's action to fail with exit code 1.
    pub fn fail_target(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl ActionBackend for FakeActionBackend {
    fn run_action(
        &mut self,
        action: BuildAction,
    ) -> Pin<Box<dyn Future<Output = Result<ActionReport>> + Send + '_>> {
        let ran = Arc::clone(&self.ran);
        let fail = self.failing.contains(&action.target);

        Box::pin(async move {
            {
                let mut guard = ran.lock().unwrap();
                guard.push(action.clone());
            }

            let report = if fail {
                ActionReport {
                    success: false,
                    exit_code: 1,
                    output: Vec::new(),
                }
            } else {
                ActionReport {
                    success: true,
                    exit_code: 0,
                    output: format!("built {}\n", action.target).into_bytes(),
                }
            };
            Ok(report)
        })
    }
}
