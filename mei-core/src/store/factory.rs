use std::collections::HashMap;

use async_trait::async_trait;

use super::json_file::JsonFileRepositoryFactory;
use super::memory::MemoryRepositoryFactory;
use super::repository::{RepositoryError, StateRepository};

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory. `location` is handed to that factory unchanged.
///
/// | backend     | location examples                 |
/// |-------------|-----------------------------------|
/// | `memory`    | ignored                           |
/// | `json-file` | `mei_organizer_state.json`        |
/// | `sqlite`    | `mei_organizer.db`, `:memory:`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"json-file"`).
    pub backend: String,
    pub location: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "json-file".to_string(),
            location: "mei_organizer_state.json".to_string(),
        }
    }
}

/// One implementation per backend, registered with a [`RepositoryRegistry`]
/// at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Opens (or creates) the store. Backends may run migrations here.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn StateRepository>, RepositoryError>;
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the `memory` and `json-file` backends already present.
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryRepositoryFactory));
        registry.register(Box::new(JsonFileRepositoryFactory));
        registry
    }

    /// Registers a backend, replacing any factory with the same name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatches to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] when no factory is registered
    ///   under the requested name.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn StateRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::{RepositoryError, RepositoryFactory, RepositoryRegistry, StateRepository, StoreConfig};
    use crate::models::OrganizerState;

    // ── stub repository ──────────────────────────────────────────────────
    // The tests only check routing, so nothing here is ever called.
    struct StubRepository;

    #[async_trait]
    impl StateRepository for StubRepository {
        async fn load(&self) -> Result<Option<OrganizerState>, RepositoryError> {
            unimplemented!()
        }
        async fn save(&self, _state: &OrganizerState) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn clear(&self) -> Result<(), RepositoryError> {
            unimplemented!()
        }
    }

    // ── stub factory ─────────────────────────────────────────────────────
    /// Flips `called` when `create` runs.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RepositoryFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Box<dyn StateRepository>, RepositoryError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubRepository))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl RepositoryFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Box<dyn StateRepository>, RepositoryError> {
            Err(RepositoryError::Connection("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(backend: &str) -> StoreConfig {
        StoreConfig {
            backend: backend.to_string(),
            location: "x".to_string(),
        }
    }

    // ── StoreConfig ──────────────────────────────────────────────────────
    #[test]
    fn store_config_default_is_json_file() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.backend, "json-file");
        assert_eq!(cfg.location, "mei_organizer_state.json");
    }

    // ── registry construction ────────────────────────────────────────────
    #[test]
    fn new_registry_has_no_backends() {
        assert!(RepositoryRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn builtin_registry_lists_memory_and_json_file() {
        assert_eq!(
            RepositoryRegistry::with_builtin_backends().available_backends(),
            vec!["json-file", "memory"]
        );
    }

    // ── registration ─────────────────────────────────────────────────────
    #[test]
    fn available_backends_is_sorted() {
        let mut reg = RepositoryRegistry::new();
        let (f1, _) = stub_factory("sqlite");
        let (f2, _) = stub_factory("memory");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["memory", "sqlite"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = RepositoryRegistry::new();
        let (old, _) = stub_factory("sqlite");
        let (new, _) = stub_factory("sqlite");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["sqlite"]);
    }

    // ── dispatch ─────────────────────────────────────────────────────────
    #[tokio::test]
    async fn create_calls_matching_factory_only() {
        let mut reg = RepositoryRegistry::new();
        let (sqlite_factory, sqlite_called) = stub_factory("sqlite");
        let (memory_factory, memory_called) = stub_factory("memory");
        reg.register(sqlite_factory);
        reg.register(memory_factory);

        let result = reg.create(&config("sqlite")).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(sqlite_called.load(Ordering::SeqCst));
        assert!(!memory_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn configuration_error_names_requested_and_available_backends() {
        let mut reg = RepositoryRegistry::new();
        let (f, _) = stub_factory("sqlite");
        reg.register(f);

        match reg.create(&config("postgres")).await {
            Err(RepositoryError::Configuration(msg)) => {
                assert!(msg.contains("postgres"), "error should name the requested backend");
                assert!(msg.contains("sqlite"), "error should list available backends");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a repository"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = RepositoryRegistry::new();
        reg.register(Box::new(FailingFactory));

        assert!(matches!(
            reg.create(&config("failing")).await,
            Err(RepositoryError::Connection(msg)) if msg == "intentional failure"
        ));
    }

    #[tokio::test]
    async fn builtin_memory_backend_round_trips_state() {
        let reg = RepositoryRegistry::with_builtin_backends();
        let repo = reg.create(&config("memory")).await.unwrap();
        let state = OrganizerState {
            current_section: "relatorio".to_string(),
            ..Default::default()
        };

        repo.save(&state).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(state));
    }
}
