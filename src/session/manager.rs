use super::store::SessionStore;
use super::types::{SessionState, StartWipeRequest, StartWipeResponse, WipeMode, WipeStatus};
use crate::algorithms::DoDWipe;
use crate::config::ShredConfig;
use crate::wipe_orchestrator::SecureDeleter;
use crate::{WipeError, WipeResult};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

const SESSION_PASSES: u8 = DoDWipe::PASS_COUNT as u8;

/// Creates wipe sessions and runs each one on its own Tokio task.
///
/// Sessions are only reachable through [`start`](Self::start) and
/// [`status`](Self::status). At most `max_concurrent_sessions` run at
/// once; the others stay `Created` until a slot frees up.
pub struct WipeSessionManager {
    store: Arc<SessionStore>,
    deleter: Arc<SecureDeleter>,
    admission: Arc<Semaphore>,
    config: ShredConfig,
}

impl WipeSessionManager {
    pub fn new(config: ShredConfig) -> Self {
        Self::with_deleter(config, Arc::new(SecureDeleter::new()))
    }

    pub fn with_deleter(config: ShredConfig, deleter: Arc<SecureDeleter>) -> Self {
        let permits = config.max_concurrent_sessions.max(1);

        Self {
            store: Arc::new(SessionStore::new()),
            deleter,
            admission: Arc::new(Semaphore::new(permits)),
            config,
        }
    }

    /// Register a session and launch its background task.
    ///
    /// Returns as soon as the task is spawned. Outside a Tokio runtime the
    /// request is refused and nothing is registered.
    pub fn start(&self, request: StartWipeRequest) -> WipeResult<StartWipeResponse> {
        let session_id = request.session_id;
        if session_id.trim().is_empty() {
            return Err(WipeError::InvalidRequest(
                "No session ID provided".to_string(),
            ));
        }

        let mode = if request.wipe_all {
            WipeMode::All
        } else {
            WipeMode::Files(request.files)
        };

        let runtime = Handle::try_current().map_err(|_| {
            WipeError::InvalidRequest("No async runtime to run the session on".to_string())
        })?;

        self.store.insert(WipeStatus::new(&session_id))?;

        let task = SessionTask {
            session_id: session_id.clone(),
            mode,
            store: Arc::clone(&self.store),
            deleter: Arc::clone(&self.deleter),
            admission: Arc::clone(&self.admission),
            pass_delay: self.config.pass_delay(),
            wipe_all_pass_delay: self.config.wipe_all_pass_delay(),
        };
        runtime.spawn(task.run());

        tracing::info!(session = %session_id, "Wipe operation started");
        Ok(StartWipeResponse {
            session_id,
            started: true,
        })
    }

    /// Snapshot of a session
    pub fn status(&self, session_id: &str) -> WipeResult<WipeStatus> {
        self.store
            .get(session_id)
            .ok_or_else(|| WipeError::SessionNotFound(session_id.to_string()))
    }

    /// Poll `status` until the session completes
    pub async fn wait(&self, session_id: &str, poll_interval: Duration) -> WipeResult<WipeStatus> {
        loop {
            let status = self.status(session_id)?;
            if status.complete {
                return Ok(status);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    pub fn config(&self) -> &ShredConfig {
        &self.config
    }
}

/// Background work of one session. Owns the only writes to its snapshot.
struct SessionTask {
    session_id: String,
    mode: WipeMode,
    store: Arc<SessionStore>,
    deleter: Arc<SecureDeleter>,
    admission: Arc<Semaphore>,
    pass_delay: Duration,
    wipe_all_pass_delay: Duration,
}

impl SessionTask {
    async fn run(self) {
        // The semaphore is never closed, so a permit always arrives
        let _permit = Arc::clone(&self.admission).acquire_owned().await.ok();

        self.store.update(&self.session_id, |s| s.state = SessionState::Running);

        let success = match &self.mode {
            WipeMode::All => self.run_wipe_all().await,
            WipeMode::Files(files) => self.run_files(files).await,
        };

        self.store.update(&self.session_id, |s| {
            s.success = success;
            if success {
                s.pass_number = SESSION_PASSES;
            }
            s.complete = true;
            s.state = SessionState::Complete;
            s.finished_at = Some(Utc::now());
        });

        tracing::info!(session = %self.session_id, success, "Wipe session finished");
    }

    async fn run_wipe_all(&self) -> bool {
        tracing::warn!(
            session = %self.session_id,
            "Wipe-all is a placeholder: passes are simulated and no data is destroyed"
        );

        for pass in 1..=SESSION_PASSES {
            self.store.update(&self.session_id, |s| s.pass_number = pass);
            tokio::time::sleep(self.wipe_all_pass_delay).await;
        }

        true
    }

    /// Process files in order. The first failure ends the session; later
    /// files are left untouched.
    async fn run_files(&self, files: &[String]) -> bool {
        for file in files {
            self.store.update(&self.session_id, |s| {
                s.current_file = file.clone();
                s.file_pass = 0;
            });

            let path = PathBuf::from(file);
            // Same view as the deleter: a link is an entry, not its target
            if fs::symlink_metadata(&path).is_err() {
                tracing::info!(session = %self.session_id, file = %file, "File not found, skipping");
                continue;
            }

            for pass in 1..=SESSION_PASSES {
                self.store.update(&self.session_id, |s| {
                    s.file_pass = pass;
                    s.pass_number = s.pass_number.max(pass);
                });
                tokio::time::sleep(self.pass_delay).await;
            }

            let deleter = Arc::clone(&self.deleter);
            let outcome =
                tokio::task::spawn_blocking(move || deleter.secure_delete_file(&path)).await;

            match outcome {
                Ok(Ok(())) => {
                    self.store.update(&self.session_id, |s| s.files_wiped += 1);
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        session = %self.session_id,
                        file = %file,
                        error = %e,
                        "Aborting wipe session"
                    );
                    return false;
                }
                Err(e) => {
                    tracing::error!(
                        session = %self.session_id,
                        file = %file,
                        error = %e,
                        "Deletion task did not finish"
                    );
                    return false;
                }
            }
        }

        true
    }
}
