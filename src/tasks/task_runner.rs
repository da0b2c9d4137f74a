use tokio::task::JoinHandle;

type TaskFactory = Box<dyn FnOnce() -> JoinHandle<()> + Send>;

pub struct TaskRunner {
    tasks: Vec<(&'static str, TaskFactory)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce() -> JoinHandle<()> + Send + 'static,
    {
        self.tasks.push((name, Box::new(task)));
    }

    pub fn start_all(self) -> RunningTasks {
        let handles = self
            .tasks
            .into_iter()
            .map(|(name, task)| {
                tracing::debug!(task = name, "starting background task");
                (name, task())
            })
            .collect();
        RunningTasks { handles }
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation handle for everything `TaskRunner::start_all` spawned.
pub struct RunningTasks {
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl RunningTasks {
    pub async fn shutdown(self) {
        for (name, handle) in self.handles {
            handle.abort();
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    tracing::warn!(task = name, error = %err, "background task ended abnormally");
                }
            }
        }
    }
}
