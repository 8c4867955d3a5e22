//! The conformance script
//!
//! Runs every scenario in a fixed order against one endpoint. Ids returned
//! by the creates are threaded into the scenarios that address single tasks.

use serde_json::to_value;
use taskcheck_domain::{HttpMethod, Outcome, TaskId};
use tracing::info;

use crate::assertions::{COLLECTION_METHODS, ITEM_METHODS, ScenarioRunner, TASKS_PATH};
use crate::fixtures;
use crate::ports::{Reporter, Transport};
use crate::tally::Tally;

/// Item path that no compliant server has a task for.
const MISSING_TASK_PATH: &str = "/tasks/88.json";

/// Pairs every outcome with the reporter and the running tally.
struct Session<'r, R: Reporter + ?Sized> {
    reporter: &'r mut R,
    tally: Tally,
}

impl<'r, R: Reporter + ?Sized> Session<'r, R> {
    fn new(reporter: &'r mut R) -> Self {
        Self {
            reporter,
            tally: Tally::new(),
        }
    }

    fn start(&mut self, title: &str) {
        self.reporter.scenario_started(title);
    }

    fn finish(&mut self, outcome: &Outcome) -> Option<TaskId> {
        self.tally.record(outcome);
        self.reporter.scenario_finished(outcome);
        outcome.extracted()
    }

    fn close(self) -> Tally {
        self.reporter.finished(&self.tally);
        self.tally
    }
}

macro_rules! scenario {
    ($session:expr, $title:expr, $call:expr) => {{
        $session.start($title);
        let outcome = $call.await;
        $session.finish(&outcome)
    }};
}

/// Runs the whole scenario script and returns the final tally.
///
/// A failed scenario never stops the run. If a create fails, the scenarios
/// that depend on its id still run and address `/tasks/null.json`.
pub async fn run_script<T, R>(runner: &ScenarioRunner<T>, reporter: &mut R) -> Tally
where
    T: Transport,
    R: Reporter + ?Sized,
{
    info!(endpoint = runner.base(), "starting conformance run");
    let mut session = Session::new(reporter);

    let mut task1 = fixtures::task1();
    let mut task2 = fixtures::task2();
    let mut task3 = fixtures::task3();
    let replacement = fixtures::task3_replacement();
    let patch = fixtures::task2_patch();
    let patch_body = to_value(&patch).ok();

    scenario!(session, "Empty database HEAD request", runner.head_count(TASKS_PATH, 0));
    scenario!(
        session,
        "OPTIONS request for /tasks.json",
        runner.options_allow(TASKS_PATH, &COLLECTION_METHODS)
    );
    scenario!(
        session,
        "Empty GET request for /tasks.json",
        runner.list(TASKS_PATH, 0, 0, None)
    );
    scenario!(
        session,
        "Empty GET request for /tasks.json?q=test",
        runner.list("/tasks.json?q=test", 0, 0, None)
    );
    scenario!(
        session,
        "Empty GET request for /tasks.json?pageSize=13",
        runner.list("/tasks.json?pageSize=13", 0, 0, None)
    );

    let id = scenario!(session, "Valid POST request", runner.create(&task1));
    task1.assign_id(id);

    for (n, body) in fixtures::invalid_creates().iter().enumerate() {
        scenario!(
            session,
            &format!("Invalid POST request {}", n + 1),
            runner.expect_error(HttpMethod::Post.as_str(), TASKS_PATH, Some(body), 400, 1)
        );
    }

    let id = scenario!(session, "Valid POST request 2", runner.create(&task2));
    task2.assign_id(id);
    let id = scenario!(
        session,
        "POST request with empty description",
        runner.create(&task3)
    );
    task3.assign_id(id);

    scenario!(session, "HEAD request with 3 tasks", runner.head_count(TASKS_PATH, 3));
    scenario!(
        session,
        "Test GET request order",
        runner.list(TASKS_PATH, 3, 3, None)
    );
    let second_newest = ids(&[task2.id]);
    scenario!(
        session,
        "Test GET pagination",
        runner.list("/tasks.json?page=2&pageSize=1", 3, 1, Some(&second_newest))
    );
    let searched = ids(&[task1.id]);
    scenario!(
        session,
        "Test GET search",
        runner.list("/tasks.json?q=task1", 1, 1, Some(&searched))
    );
    scenario!(session, "Task GET request", runner.fetch(task3.id));
    scenario!(
        session,
        "Task GET with bad id",
        runner.expect_error(HttpMethod::Get.as_str(), "/tasks/982.json", None, 404, 1)
    );
    scenario!(
        session,
        "Task OPTIONS request",
        runner.options_allow(&task1.item_path(), &ITEM_METHODS)
    );
    scenario!(
        session,
        "Task OPTIONS with bad id",
        runner.expect_error(HttpMethod::Options.as_str(), MISSING_TASK_PATH, None, 404, 1)
    );

    scenario!(
        session,
        "Valid PUT request",
        runner.replace(&replacement, task3.id)
    );
    scenario!(
        session,
        "Task PUT with missing property",
        runner.expect_error(
            HttpMethod::Put.as_str(),
            &task3.item_path(),
            Some(&fixtures::replacement_missing_field()),
            400,
            1
        )
    );
    scenario!(
        session,
        "Task PUT with invalid property",
        runner.expect_error(
            HttpMethod::Put.as_str(),
            &task3.item_path(),
            Some(&fixtures::replacement_invalid_field()),
            400,
            1
        )
    );
    let replacement_body = to_value(&replacement).ok();
    scenario!(
        session,
        "Task PUT with bad id",
        runner.expect_error(
            HttpMethod::Put.as_str(),
            MISSING_TASK_PATH,
            replacement_body.as_ref(),
            404,
            1
        )
    );

    scenario!(session, "Valid PATCH request", runner.patch(&patch, task2.id));
    scenario!(
        session,
        "Task PATCH with invalid property",
        runner.expect_error(
            HttpMethod::Patch.as_str(),
            &task2.item_path(),
            Some(&fixtures::patch_invalid_field()),
            400,
            1
        )
    );
    scenario!(
        session,
        "Task PATCH with bad id",
        runner.expect_error(
            HttpMethod::Patch.as_str(),
            MISSING_TASK_PATH,
            patch_body.as_ref(),
            404,
            1
        )
    );

    scenario!(
        session,
        "Valid DELETE request",
        runner.delete_and_confirm(task2.id)
    );
    scenario!(
        session,
        "Task DELETE with bad id",
        runner.expect_error(HttpMethod::Delete.as_str(), MISSING_TASK_PATH, None, 404, 1)
    );

    session.close()
}

/// Known ids only; a missing one can never match, so the id check fails.
fn ids(ids: &[Option<TaskId>]) -> Vec<TaskId> {
    ids.iter().flatten().copied().collect()
}
