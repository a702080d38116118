//! Test tree and run request plumbing owned by the host editor.

use std::collections::HashSet;

use lsp_types::{Range, Url};

use crate::{TestItem, TestItemData, run::RunTracker, run::TestRun};

/// Items selected for one invocation.
///
/// Both sets are keyed by item id; the first occurrence of an id wins and
/// insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct TestRunRequest {
    include: Vec<TestItem>,
    exclude: Vec<TestItem>,
}

fn unique_by_id(items: Vec<TestItem>) -> Vec<TestItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

impl TestRunRequest {
    #[must_use]
    pub fn new(include: Vec<TestItem>, exclude: Vec<TestItem>) -> Self {
        Self {
            include: unique_by_id(include),
            exclude: unique_by_id(exclude),
        }
    }

    #[must_use]
    pub fn include(&self) -> &[TestItem] {
        &self.include
    }

    #[must_use]
    pub fn exclude(&self) -> &[TestItem] {
        &self.exclude
    }

    /// Included items that are not excluded.
    #[must_use]
    pub fn selected(&self) -> Vec<TestItem> {
        self.include
            .iter()
            .filter(|item| !self.exclude.iter().any(|excluded| excluded.id == item.id))
            .cloned()
            .collect()
    }
}

/// Creates test items and hands out one [`TestRun`] per request.
#[derive(Debug)]
pub struct TestController {
    id: String,
    label: String,
    runs: Vec<TestRun>,
    disposed: bool,
}

impl TestController {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            runs: Vec::new(),
            disposed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn create_test_item(&self, id: &str, label: &str, uri: Option<Url>) -> TestItem {
        TestItem {
            id: id.to_string(),
            label: label.to_string(),
            uri,
            range: Range::default(),
            data: TestItemData::default(),
            parent_id: None,
            children: Vec::new(),
        }
    }

    /// Create an item carrying framework data.
    ///
    /// With a parent the new item is appended to the parent's children and a
    /// copy is returned. `jdt_handler` is stored verbatim.
    pub fn create_test_item_with(
        &self,
        id: &str,
        label: &str,
        data: TestItemData,
        parent: Option<&mut TestItem>,
        jdt_handler: Option<&str>,
    ) -> TestItem {
        let mut item = self.create_test_item(id, label, None);
        item.data = TestItemData {
            jdt_handler: jdt_handler.map(str::to_string).or(data.jdt_handler),
            ..data
        };
        if let Some(parent) = parent {
            item.uri.clone_from(&parent.uri);
            item.parent_id = Some(parent.id.clone());
            parent.children.push(item.clone());
        }
        item
    }

    /// Start tracking a run for `request`. The caller must dispose it.
    pub fn create_test_run(&mut self, request: &TestRunRequest) -> TestRun {
        let name = format!("{} ({} items)", self.label, request.include().len());
        let run = TestRun::new(name);
        if self.disposed {
            tracing::warn!("controller {} is disposed, run ends immediately", self.id);
            run.end();
            return run;
        }
        for item in request.selected() {
            run.enqueued(&item);
        }
        self.runs.retain(|live| !live.is_ended());
        self.runs.push(run.clone());
        run
    }

    /// Runs handed out and not yet ended.
    #[must_use]
    pub fn live_runs(&self) -> usize {
        self.runs.iter().filter(|run| !run.is_ended()).count()
    }

    /// End all runs still alive. Safe to call more than once.
    pub fn dispose(&mut self) {
        for run in self.runs.drain(..) {
            run.dispose();
        }
        self.disposed = true;
    }
}
