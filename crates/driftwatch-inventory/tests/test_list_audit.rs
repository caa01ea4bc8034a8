use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use driftwatch_core::{
    AuditConfig, CoreError, ExecutorFactory, FleetAuditor, HostDriftChecker, ResultArchiver,
    UpstreamMode,
};
use driftwatch_exec::{CommandResult, Credentials, ExecError, RemoteExecutor};
use driftwatch_inventory::{TargetSource, resolve_targets};

struct CleanExecutor(String);

#[async_trait]
impl RemoteExecutor for CleanExecutor {
    async fn run(&self, _cmd: &str) -> Result<CommandResult, ExecError> {
        Ok(CommandResult {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::from_millis(1),
        })
    }

    fn host(&self) -> &str {
        &self.0
    }

    fn executor_type(&self) -> &'static str {
        "clean"
    }
}

#[derive(Default)]
struct RecordingFactory {
    audited: Mutex<Vec<String>>,
}

#[async_trait]
impl ExecutorFactory for RecordingFactory {
    async fn create_executor(&self, hostname: &str) -> Result<Arc<dyn RemoteExecutor>, CoreError> {
        self.audited.lock().unwrap().push(hostname.to_string());
        Ok(Arc::new(CleanExecutor(hostname.to_string())))
    }
}

struct NullArchiver;

#[async_trait]
impl ResultArchiver for NullArchiver {
    async fn archive(&self, hostname: &str, _text: &str) -> Result<PathBuf, CoreError> {
        Ok(PathBuf::from(hostname))
    }
}

#[tokio::test]
async fn test_test_list_bypasses_discovery_and_keeps_order() {
    // USE_TEST_INSTRUMENT_LIST=true, TEST_INSTRUMENT_LIST="NDXA, NDXB"
    let source = TargetSource::select(true, "NDXA, NDXB", || {
        panic!("discovery must not be built when the test list is in use")
    })
    .unwrap();
    assert!(matches!(source, TargetSource::TestList(_)));

    let hosts = resolve_targets(&source).await.unwrap();
    assert_eq!(hosts, vec!["NDXA", "NDXB"]);

    let factory = Arc::new(RecordingFactory::default());
    let config = AuditConfig::new(
        "C:\\Instrument\\Settings\\config",
        Credentials::new("u", "p"),
        UpstreamMode::Main,
    );
    let checker = HostDriftChecker::new(Arc::new(config), factory.clone(), Arc::new(NullArchiver));

    let summary = FleetAuditor::new(Arc::new(checker)).audit(&hosts).await;

    assert_eq!(*factory.audited.lock().unwrap(), vec!["NDXA", "NDXB"]);
    assert!(summary.is_clean());
}
