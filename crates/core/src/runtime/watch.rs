use crate::error::Result;
use indexmap::IndexMap;
use layoutgen_api::{ApiError, ApiResult, FileWatcher, WatchEvent, WatchEventKind, WatchListener};
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcherApi};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(500);

/// `FileWatcher` backed by the OS notification API.
///
/// Raw events are batched until the file system has been quiet for
/// `DEBOUNCE_INTERVAL`, collapsed to one event per path, then delivered to
/// every subscribed listener. Only events under a path passed to `add` are
/// delivered.
pub struct NotifyWatcher {
    state: Arc<Mutex<WatchState>>,
    listeners: Arc<RwLock<Vec<WatchListener>>>,
}

impl NotifyWatcher {
    /// Must be called from within a tokio runtime. The dispatch task exits
    /// when `cancel_token` is cancelled or the watcher is dropped.
    pub fn start(cancel_token: CancellationToken) -> Result<Arc<Self>> {
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        let state = Arc::new(Mutex::new(WatchState::new(watcher)));
        let listeners: Arc<RwLock<Vec<WatchListener>>> = Arc::new(RwLock::new(Vec::new()));
        let state_ref = Arc::downgrade(&state);
        let dispatch_to = Arc::downgrade(&listeners);

        tokio::spawn(async move {
            let mut pending: Vec<Event> = Vec::new();

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        break;
                    }
                    event = rx.recv() => {
                        match event {
                            Some(Ok(e)) => pending.push(e),
                            Some(Err(e)) => tracing::warn!("Watch error: {}", e),
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(DEBOUNCE_INTERVAL), if !pending.is_empty() => {
                        let (Some(state), Some(listeners)) =
                            (state_ref.upgrade(), dispatch_to.upgrade())
                        else {
                            break;
                        };
                        let events = match state.lock() {
                            Ok(mut guard) => guard.settle(collapse(pending.drain(..))),
                            Err(_) => break,
                        };
                        if !events.is_empty() {
                            tracing::debug!("Dispatching {} file events", events.len());
                            dispatch(&listeners, &events);
                        }
                    }
                }
            }
            tracing::info!("File watcher task ended");
        });

        Ok(Arc::new(Self { state, listeners }))
    }
}

impl FileWatcher for NotifyWatcher {
    /// A path that does not exist yet is tracked through its nearest existing
    /// ancestor, so creating it later still produces events.
    fn add(&self, path: &Path) -> ApiResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Internal("watcher lock poisoned".to_string()))?;

        match state.place(path).map_err(|e| ApiError::Watch(e.to_string()))? {
            Placement::Direct => tracing::info!("Started watching {}", path.display()),
            Placement::Through(ancestor) => {
                tracing::info!(
                    "Watching {} through {} until it exists",
                    path.display(),
                    ancestor.display()
                );
                state.pending.push((path.to_path_buf(), ancestor));
            }
            Placement::Unreachable => {
                tracing::warn!("No existing ancestor to watch for {}", path.display());
                return Ok(());
            }
        }
        state.targets.push(path.to_path_buf());
        Ok(())
    }

    fn subscribe(&self, listener: WatchListener) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(listener),
            Err(_) => tracing::error!("Listener registry poisoned, subscription dropped"),
        }
    }
}

enum Placement {
    Direct,
    Through(PathBuf),
    Unreachable,
}

struct WatchState {
    watcher: RecommendedWatcher,
    /// Paths watched with their whole subtree.
    recursive: HashSet<PathBuf>,
    /// Ancestors watched for their direct children only.
    shallow: HashSet<PathBuf>,
    /// Every path passed to `add`.
    targets: Vec<PathBuf>,
    /// Targets that do not exist yet, with the ancestor standing in for them.
    pending: Vec<(PathBuf, PathBuf)>,
}

impl WatchState {
    fn new(watcher: RecommendedWatcher) -> Self {
        Self {
            watcher,
            recursive: HashSet::new(),
            shallow: HashSet::new(),
            targets: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn is_covered(&self, path: &Path) -> bool {
        self.recursive.iter().any(|root| path.starts_with(root))
    }

    /// Watch `target` recursively when it exists, otherwise watch its nearest
    /// existing ancestor for direct children only.
    fn place(&mut self, target: &Path) -> notify::Result<Placement> {
        let Some(found) = nearest_existing(target) else {
            return Ok(Placement::Unreachable);
        };

        if found == target {
            if !self.is_covered(target) {
                self.watcher.watch(target, RecursiveMode::Recursive)?;
                self.recursive.insert(target.to_path_buf());
            }
            return Ok(Placement::Direct);
        }

        if !self.is_covered(&found) && !self.shallow.contains(&found) {
            self.watcher.watch(&found, RecursiveMode::NonRecursive)?;
            self.shallow.insert(found.clone());
        }
        Ok(Placement::Through(found))
    }

    /// Re-place targets after a batch of changes and keep only events under
    /// a target. A pending target that now exists yields a synthetic `Add`,
    /// since its own creation may have happened before it was watched.
    fn settle(&mut self, mut events: Vec<WatchEvent>) -> Vec<WatchEvent> {
        for event in &events {
            if event.kind == WatchEventKind::Unlink && self.recursive.remove(&event.path) {
                let _ = self.watcher.unwatch(&event.path);
                self.pending.push((event.path.clone(), event.path.clone()));
            }
        }

        for (target, ancestor) in std::mem::take(&mut self.pending) {
            match self.place(&target) {
                Ok(Placement::Direct) => {
                    tracing::info!("{} appeared, watching it directly", target.display());
                    if !events.iter().any(|e| e.path == target) {
                        events.push(WatchEvent::new(WatchEventKind::Add, target));
                    }
                }
                Ok(Placement::Through(found)) => self.pending.push((target, found)),
                Ok(Placement::Unreachable) => self.pending.push((target, ancestor)),
                Err(e) => {
                    tracing::warn!("Failed to watch {}: {}", target.display(), e);
                    self.pending.push((target, ancestor));
                }
            }
        }

        within_targets(events, &self.targets)
    }
}

fn nearest_existing(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .map(Path::to_path_buf)
}

fn within_targets(events: Vec<WatchEvent>, targets: &[PathBuf]) -> Vec<WatchEvent> {
    events
        .into_iter()
        .filter(|e| targets.iter().any(|t| e.path.starts_with(t)))
        .collect()
}

fn dispatch(listeners: &RwLock<Vec<WatchListener>>, events: &[WatchEvent]) {
    // Clone out so listeners can subscribe further without deadlocking
    let snapshot: Vec<WatchListener> = match listeners.read() {
        Ok(guard) => guard.clone(),
        Err(_) => return,
    };
    for event in events {
        for listener in &snapshot {
            listener(event);
        }
    }
}

/// Keep the last kind seen per path, in order of first appearance.
fn collapse(events: impl Iterator<Item = Event>) -> Vec<WatchEvent> {
    let mut latest: IndexMap<PathBuf, WatchEventKind> = IndexMap::new();
    for event in events {
        for translated in translate_event(&event) {
            latest.insert(translated.path, translated.kind);
        }
    }
    latest
        .into_iter()
        .map(|(path, kind)| WatchEvent::new(kind, path))
        .collect()
}

/// Map a raw notify event onto host watch events.
pub fn translate_event(event: &Event) -> Vec<WatchEvent> {
    let all = |kind: WatchEventKind| -> Vec<WatchEvent> {
        event
            .paths
            .iter()
            .map(|p| WatchEvent::new(kind, p.clone()))
            .collect()
    };

    match &event.kind {
        EventKind::Create(_) => all(WatchEventKind::Add),
        EventKind::Remove(_) => all(WatchEventKind::Unlink),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => all(WatchEventKind::Unlink),
            RenameMode::To => all(WatchEventKind::Add),
            RenameMode::Both => event
                .paths
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let kind = if i == 0 {
                        WatchEventKind::Unlink
                    } else {
                        WatchEventKind::Add
                    };
                    WatchEvent::new(kind, p.clone())
                })
                .collect(),
            _ => event
                .paths
                .iter()
                .map(|p| {
                    let kind = if p.exists() {
                        WatchEventKind::Add
                    } else {
                        WatchEventKind::Unlink
                    };
                    WatchEvent::new(kind, p.clone())
                })
                .collect(),
        },
        EventKind::Modify(_) => all(WatchEventKind::Change),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use std::fs;
    use tempfile::tempdir;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut e = Event::new(kind);
        for p in paths {
            e = e.add_path(PathBuf::from(p));
        }
        e
    }

    #[test]
    fn test_translate_basic_kinds() {
        let created = translate_event(&event(EventKind::Create(CreateKind::File), &["/a.vue"]));
        assert_eq!(created, vec![WatchEvent::new(WatchEventKind::Add, "/a.vue")]);

        let removed = translate_event(&event(EventKind::Remove(RemoveKind::File), &["/a.vue"]));
        assert_eq!(removed, vec![WatchEvent::new(WatchEventKind::Unlink, "/a.vue")]);

        let changed = translate_event(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/a.vue"],
        ));
        assert_eq!(changed, vec![WatchEvent::new(WatchEventKind::Change, "/a.vue")]);

        let accessed = translate_event(&event(EventKind::Access(notify::event::AccessKind::Any), &["/a.vue"]));
        assert!(accessed.is_empty());
    }

    #[test]
    fn test_translate_rename_both() {
        let renamed = translate_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/old.vue", "/new.vue"],
        ));
        assert_eq!(
            renamed,
            vec![
                WatchEvent::new(WatchEventKind::Unlink, "/old.vue"),
                WatchEvent::new(WatchEventKind::Add, "/new.vue"),
            ]
        );
    }

    #[test]
    fn test_collapse_keeps_last_kind_per_path() {
        let events = vec![
            event(EventKind::Create(CreateKind::File), &["/a.vue"]),
            event(EventKind::Modify(ModifyKind::Data(DataChange::Any)), &["/b.vue"]),
            event(EventKind::Modify(ModifyKind::Data(DataChange::Any)), &["/a.vue"]),
        ];
        let collapsed = collapse(events.into_iter());
        assert_eq!(
            collapsed,
            vec![
                WatchEvent::new(WatchEventKind::Change, "/a.vue"),
                WatchEvent::new(WatchEventKind::Change, "/b.vue"),
            ]
        );
    }

    #[test]
    fn test_nearest_existing_ancestor() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("src/layouts");
        assert_eq!(nearest_existing(&missing), Some(dir.path().to_path_buf()));

        fs::create_dir_all(&missing).unwrap();
        assert_eq!(nearest_existing(&missing), Some(missing.clone()));
    }

    #[test]
    fn test_events_outside_targets_are_dropped() {
        let targets = vec![PathBuf::from("/app/src/layouts")];
        let events = vec![
            WatchEvent::new(WatchEventKind::Add, "/app/src/layouts"),
            WatchEvent::new(WatchEventKind::Add, "/app/src/layouts/default.vue"),
            WatchEvent::new(WatchEventKind::Change, "/app/src/main.ts"),
            WatchEvent::new(WatchEventKind::Change, "/app/src/layouts-old/a.vue"),
        ];
        assert_eq!(
            within_targets(events, &targets),
            vec![
                WatchEvent::new(WatchEventKind::Add, "/app/src/layouts"),
                WatchEvent::new(WatchEventKind::Add, "/app/src/layouts/default.vue"),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_missing_path_is_ok() {
        let token = CancellationToken::new();
        let watcher = NotifyWatcher::start(token.clone()).unwrap();
        assert!(watcher.add(Path::new("/definitely/not/here")).is_ok());
        token.cancel();
    }

    #[tokio::test]
    async fn test_missing_target_is_watched_through_ancestor() {
        let dir = tempdir().unwrap();
        let layouts = dir.path().join("src/layouts");

        let token = CancellationToken::new();
        let watcher = NotifyWatcher::start(token.clone()).unwrap();
        watcher.add(&layouts).unwrap();
        {
            let state = watcher.state.lock().unwrap();
            assert!(state.shallow.contains(dir.path()));
            assert!(state.recursive.is_empty());
            assert_eq!(state.pending, vec![(layouts.clone(), dir.path().to_path_buf())]);
        }

        fs::create_dir_all(&layouts).unwrap();
        let settled = watcher.state.lock().unwrap().settle(Vec::new());
        assert_eq!(settled, vec![WatchEvent::new(WatchEventKind::Add, &layouts)]);

        let state = watcher.state.lock().unwrap();
        assert!(state.recursive.contains(&layouts));
        assert!(state.pending.is_empty());
        drop(state);
        token.cancel();
    }

    #[tokio::test]
    async fn test_dir_created_after_add_produces_events() {
        let dir = tempdir().unwrap();
        let layouts = dir.path().join("src/layouts");

        let token = CancellationToken::new();
        let watcher = NotifyWatcher::start(token.clone()).unwrap();
        watcher.add(&layouts).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        watcher.subscribe(Arc::new(move |event: &WatchEvent| {
            let _ = tx.send(event.clone());
        }));

        // Unrelated activity under the watched ancestor is filtered out
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::create_dir_all(&layouts).unwrap();
        fs::write(layouts.join("default.vue"), "<template />").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event after creating the layouts dir")
            .unwrap();
        assert!(event.path.starts_with(&layouts), "unexpected {:?}", event);

        token.cancel();
    }
}
