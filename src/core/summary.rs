//! Batch outcome reporting

use crate::core::context::RunContext;
use crate::core::stage::StageName;
use crate::core::task::BuildTask;

/// Everything one invocation built, in order
#[derive(Debug, Default)]
pub struct BatchReport {
    tasks: Vec<BuildTask>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, task: BuildTask) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[BuildTask] {
        &self.tasks
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn succeeded(&self) -> usize {
        self.tasks.iter().filter(|task| task.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Label and failing stage of every failed task
    pub fn failures(&self) -> Vec<(String, StageName)> {
        self.tasks
            .iter()
            .filter_map(|task| task.failed_stage().map(|stage| (task.label(), stage)))
            .collect()
    }

    /// Render the markdown summary delivered to the notification sink
    pub fn render_markdown(&self, ctx: &RunContext, finished_at: &str) -> String {
        let mut text = String::from("# mbuild report\n");
        text.push_str(&format!("command: {}\n", ctx.invocation()));
        text.push_str(&format!(
            "total: {}, succeeded: {}, failed: {}\n",
            self.total(),
            self.succeeded(),
            self.failed()
        ));
        for (label, stage) in self.failures() {
            text.push_str(&format!("- {label} failed at {stage}\n"));
        }
        text.push_str(&format!("started: {}\n", ctx.stamp()));
        text.push_str(&format!("finished: {finished_at}\n"));
        text
    }
}
