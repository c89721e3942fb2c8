//! Job, task group and namespace definitions.

use serde::{Deserialize, Serialize};

use super::Resources;

/// A tenant namespace. A non-empty `quota` names the quota attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Name of the attached quota, empty when none.
    #[serde(default)]
    pub quota: String,
}

impl Namespace {
    /// Create a namespace without a quota.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a quota by name.
    #[must_use]
    pub fn with_quota(mut self, quota: impl Into<String>) -> Self {
        self.quota = quota.into();
        self
    }
}

/// A single task and its resource request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task name.
    pub name: String,
    /// Driver used to run the task.
    #[serde(default)]
    pub driver: String,
    /// Requested resources.
    #[serde(default)]
    pub resources: Resources,
}

impl Task {
    /// Create a task with the given resource request.
    pub fn new(name: impl Into<String>, resources: Resources) -> Self {
        Self {
            name: name.into(),
            driver: String::new(),
            resources,
        }
    }
}

/// Ephemeral disk shared by the tasks of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralDisk {
    /// Prefer placing on the node holding the previous disk.
    #[serde(default)]
    pub sticky: bool,
    /// Migrate the disk when the group moves.
    #[serde(default)]
    pub migrate: bool,
    /// Size in MB.
    #[serde(default)]
    pub size_mb: i64,
}

/// Tasks placed together on a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    /// Group name.
    pub name: String,
    /// Desired instance count.
    #[serde(default)]
    pub count: u32,
    /// Member tasks.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Shared ephemeral disk.
    #[serde(default)]
    pub ephemeral_disk: EphemeralDisk,
}

impl TaskGroup {
    /// Create an empty group with a count of one.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 1,
            ..Self::default()
        }
    }

    /// Add a task.
    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Set the ephemeral disk size in MB.
    #[must_use]
    pub fn with_ephemeral_disk_mb(mut self, size_mb: i64) -> Self {
        self.ephemeral_disk.size_mb = size_mb;
        self
    }

    /// Footprint of one instance of the group: every task's request plus the
    /// ephemeral disk.
    pub fn combined_resources(&self) -> Resources {
        let mut combined = Resources::new().with_disk_mb(self.ephemeral_disk.size_mb);
        for task in &self.tasks {
            combined.add(&task.resources);
        }
        combined
    }
}

/// A job submitted for scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Namespace the job runs in.
    pub namespace: String,
    /// Region the job is scheduled in. Empty means the scheduler's region.
    #[serde(default)]
    pub region: String,
    /// Task groups to place.
    #[serde(default)]
    pub task_groups: Vec<TaskGroup>,
}

impl Job {
    /// Create a job in `namespace` and `region`.
    pub fn new(
        id: impl Into<String>,
        namespace: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            namespace: namespace.into(),
            region: region.into(),
            task_groups: Vec::new(),
        }
    }

    /// Add a task group.
    #[must_use]
    pub fn with_task_group(mut self, group: TaskGroup) -> Self {
        self.task_groups.push(group);
        self
    }
}
