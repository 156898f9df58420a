use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use ctfgh_core::{BusyPermit, Challenge, CtfghError, RemoteRepo, SavedRepo, SyncClient};
use tracing::warn;

/// Result of a background request, delivered to the UI thread
#[derive(Debug)]
pub enum WorkerEvent {
    RemoteRepos(Result<Vec<RemoteRepo>, CtfghError>),
    SavedRepos(Result<Vec<SavedRepo>, CtfghError>),
    Challenges(Result<Vec<Challenge>, CtfghError>),
    /// One-shot action finished
    Notice {
        title: &'static str,
        result: Result<String, CtfghError>,
    },
}

/// Spawns short-lived request threads that report over one channel
#[derive(Clone)]
pub struct Worker {
    client: Arc<SyncClient>,
    sender: Sender<WorkerEvent>,
}

impl Worker {
    pub fn new(client: Arc<SyncClient>) -> (Self, Receiver<WorkerEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { client, sender }, receiver)
    }

    pub fn client(&self) -> &Arc<SyncClient> {
        &self.client
    }

    fn send(&self, event: WorkerEvent) {
        // The UI is gone when the receiver is dropped; nothing left to tell
        let _ = self.sender.send(event);
    }

    fn spawn(&self, job: impl FnOnce(&Worker) + Send + 'static) {
        let worker = self.clone();
        thread::spawn(move || job(&worker));
    }

    // Blocking fetches, used directly by batch refresh closures

    pub fn fetch_remote_repos_now(&self) {
        self.send(WorkerEvent::RemoteRepos(self.client.list_remote_repos()));
    }

    pub fn fetch_saved_repos_now(&self) {
        self.send(WorkerEvent::SavedRepos(self.client.list_saved_repos()));
    }

    pub fn fetch_challenges_now(&self) {
        self.send(WorkerEvent::Challenges(self.client.list_challenges()));
    }

    pub fn fetch_remote_repos(&self) {
        self.spawn(Worker::fetch_remote_repos_now);
    }

    pub fn fetch_saved_repos(&self) {
        self.spawn(Worker::fetch_saved_repos_now);
    }

    pub fn fetch_challenges(&self) {
        self.spawn(Worker::fetch_challenges_now);
    }

    /// Persist the selection, then re-fetch the saved list
    pub fn save_selection(&self, repos: Vec<RemoteRepo>) {
        self.spawn(move |w| {
            let result = w.client.save_selection(&repos);
            let saved = result.is_ok();
            w.send(WorkerEvent::Notice {
                title: "Save selection",
                result,
            });
            if saved {
                w.fetch_saved_repos_now();
            }
        });
    }

    /// Finish the GitHub app link, then re-fetch remote repositories
    pub fn link_installation(&self) {
        self.spawn(|w| {
            let result = w.client.link_installation();
            let linked = result.is_ok();
            w.send(WorkerEvent::Notice {
                title: "Link installation",
                result,
            });
            if linked {
                w.fetch_remote_repos_now();
            }
        });
    }

    pub fn download_example(&self, dir: PathBuf) {
        self.spawn(move |w| {
            let result = w
                .client
                .download_example()
                .and_then(|download| download.save_into(&dir))
                .map(|path| format!("Template saved to {}", path.display()));
            w.send(WorkerEvent::Notice {
                title: "Download template",
                result,
            });
        });
    }

    /// ZIP export; holds `permit` until the archive is on disk
    pub fn export_archive(&self, permit: BusyPermit, ids: Vec<u64>, dir: PathBuf) {
        self.spawn(move |w| {
            let result = w
                .client
                .download_archive(&ids)
                .and_then(|download| download.save_into(&dir))
                .map(|path| format!("{} challenge(s) exported to {}", ids.len(), path.display()));
            if let Err(e) = &result {
                warn!(error = %e, "archive export failed");
            }
            drop(permit);
            w.send(WorkerEvent::Notice {
                title: "Export archive",
                result,
            });
            w.fetch_challenges_now();
        });
    }
}

