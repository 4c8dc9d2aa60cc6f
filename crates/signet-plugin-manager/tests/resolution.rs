//! Name resolution across in-process plugins and the plugin root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use signet_config::SysFs;
use signet_plugin::proto::{
    Command, DescribeKeyRequest, DescribeKeyResponse, GenerateEnvelopeRequest,
    GenerateEnvelopeResponse, GenerateSignatureRequest, GenerateSignatureResponse,
    GetMetadataRequest, VerifySignatureRequest, VerifySignatureResponse,
};
use signet_plugin::{Capability, Context, Plugin, PluginError, PluginMetadata, PluginResult};
use signet_plugin_manager::{
    Executor, FsPluginSource, PluginHandle, PluginManager, PluginManagerError, UnifiedManager,
    binary_name,
};
use tempfile::TempDir;

const IN_PROCESS: &str = "in-process";
const EXECUTABLE: &str = "executable";

/// In-process plugin whose description marks where it came from.
struct InProcess {
    name: &'static str,
}

#[async_trait]
impl Plugin for InProcess {
    async fn get_metadata(
        &self,
        _ctx: &Context,
        _req: &GetMetadataRequest,
    ) -> PluginResult<PluginMetadata> {
        Ok(PluginMetadata {
            name: self.name.to_string(),
            description: IN_PROCESS.to_string(),
            version: "1.0.0".to_string(),
            url: "https://example.com".to_string(),
            supported_contract_versions: vec!["1.0".to_string()],
            capabilities: vec![Capability::EnvelopeGenerator],
        })
    }

    async fn describe_key(
        &self,
        _ctx: &Context,
        _req: &DescribeKeyRequest,
    ) -> PluginResult<DescribeKeyResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn generate_signature(
        &self,
        _ctx: &Context,
        _req: &GenerateSignatureRequest,
    ) -> PluginResult<GenerateSignatureResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn generate_envelope(
        &self,
        _ctx: &Context,
        _req: &GenerateEnvelopeRequest,
    ) -> PluginResult<GenerateEnvelopeResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn verify_signature(
        &self,
        _ctx: &Context,
        _req: &VerifySignatureRequest,
    ) -> PluginResult<VerifySignatureResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }
}

/// In-process plugin that cannot describe itself.
struct Broken;

#[async_trait]
impl Plugin for Broken {
    async fn get_metadata(
        &self,
        _ctx: &Context,
        _req: &GetMetadataRequest,
    ) -> PluginResult<PluginMetadata> {
        Err(PluginError::Invocation("backend offline".to_string()))
    }

    async fn describe_key(
        &self,
        _ctx: &Context,
        _req: &DescribeKeyRequest,
    ) -> PluginResult<DescribeKeyResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn generate_signature(
        &self,
        _ctx: &Context,
        _req: &GenerateSignatureRequest,
    ) -> PluginResult<GenerateSignatureResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn generate_envelope(
        &self,
        _ctx: &Context,
        _req: &GenerateEnvelopeRequest,
    ) -> PluginResult<GenerateEnvelopeResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }

    async fn verify_signature(
        &self,
        _ctx: &Context,
        _req: &VerifySignatureRequest,
    ) -> PluginResult<VerifySignatureResponse> {
        Err(PluginError::Invocation("unused".to_string()))
    }
}

/// Stands in for process execution: every executable describes itself
/// by its file name, except `impostor` which claims to be someone else.
struct SelfNaming;

#[async_trait]
impl Executor for SelfNaming {
    async fn execute(
        &self,
        _ctx: &Context,
        path: &Path,
        command: Command,
        _request: Value,
    ) -> PluginResult<Value> {
        assert_eq!(command, Command::GetMetadata);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let name = if stem == "impostor" { "someone-else" } else { stem };
        Ok(json!({
            "name": name,
            "description": EXECUTABLE,
            "version": "0.3.1",
            "url": "https://example.com",
            "supportedContractVersions": ["1.0"],
            "capabilities": ["SIGNATURE_GENERATOR.RAW"],
        }))
    }
}

struct PluginRoot {
    dir: TempDir,
}

impl PluginRoot {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn install(&self, name: &str) -> PathBuf {
        let dir = self.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(binary_name(name));
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn source(&self) -> FsPluginSource {
        FsPluginSource::new(SysFs::new(self.path()), Arc::new(SelfNaming))
    }
}

fn in_process(name: &'static str) -> PluginHandle {
    Arc::new(InProcess { name })
}

async fn description(plugin: &PluginHandle) -> String {
    plugin
        .get_metadata(&Context::new(), &GetMetadataRequest::default())
        .await
        .unwrap()
        .description
}

#[tokio::test]
async fn test_in_process_plugin_shadows_executable() {
    let root = PluginRoot::new();
    root.install("a");
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, vec![in_process("a")], Some(root.source()))
        .await
        .unwrap();

    let plugin = manager.get(&ctx, "a").await.unwrap();
    assert_eq!(description(&plugin).await, IN_PROCESS);
}

#[tokio::test]
async fn test_executable_resolved_when_no_in_process_match() {
    let root = PluginRoot::new();
    root.install("b");
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, vec![in_process("a")], Some(root.source()))
        .await
        .unwrap();

    let plugin = manager.get(&ctx, "b").await.unwrap();
    assert_eq!(description(&plugin).await, EXECUTABLE);
}

#[tokio::test]
async fn test_unknown_name_is_not_found() {
    let root = PluginRoot::new();
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, vec![in_process("a")], Some(root.source()))
        .await
        .unwrap();

    let err = manager.get(&ctx, "missing").await.err().unwrap();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn test_list_keeps_duplicates_in_source_order() {
    let root = PluginRoot::new();
    root.install("a");
    root.install("c");
    let ctx = Context::new();

    let manager = UnifiedManager::new(
        &ctx,
        vec![in_process("z"), in_process("a")],
        Some(root.source()),
    )
    .await
    .unwrap();

    let names = manager.list(&ctx).await.unwrap();
    assert_eq!(names[..2], ["z", "a"]);
    let mut installed = names[2..].to_vec();
    installed.sort();
    assert_eq!(installed, ["a", "c"]);
}

#[tokio::test]
async fn test_without_fs_source_only_in_process_plugins_resolve() {
    let root = PluginRoot::new();
    root.install("b");
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, vec![in_process("a")], None)
        .await
        .unwrap();

    assert!(manager.get(&ctx, "a").await.is_ok());
    assert!(manager.get(&ctx, "b").await.err().unwrap().is_not_found());
    assert_eq!(manager.list(&ctx).await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn test_failing_in_process_plugin_aborts_construction() {
    let root = PluginRoot::new();
    let ctx = Context::new();

    let err = UnifiedManager::new(
        &ctx,
        vec![in_process("a"), Arc::new(Broken)],
        Some(root.source()),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PluginManagerError::InitFailed {
            index: 1,
            source: PluginError::Invocation(_)
        }
    ));
}

#[tokio::test]
async fn test_directory_without_executable() {
    let root = PluginRoot::new();
    std::fs::create_dir(root.path().join("empty")).unwrap();
    let ctx = Context::new();
    let manager = UnifiedManager::new(&ctx, Vec::new(), Some(root.source()))
        .await
        .unwrap();

    // Listed, since listing does not look inside directories.
    assert_eq!(manager.list(&ctx).await.unwrap(), vec!["empty"]);
    assert!(manager.get(&ctx, "empty").await.err().unwrap().is_not_found());
}

#[tokio::test]
async fn test_name_mismatch_is_not_compliant() {
    let root = PluginRoot::new();
    root.install("impostor");
    let ctx = Context::new();
    let manager = UnifiedManager::new(&ctx, Vec::new(), Some(root.source()))
        .await
        .unwrap();

    let err = manager.get(&ctx, "impostor").await.err().unwrap();
    assert!(err.is_not_compliant(), "{err}");
    assert!(!err.is_not_found());
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_executable_file_is_rejected() {
    use std::os::unix::fs::PermissionsExt;

    let root = PluginRoot::new();
    let path = root.install("b");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();
    let ctx = Context::new();
    let manager = UnifiedManager::new(&ctx, Vec::new(), Some(root.source()))
        .await
        .unwrap();

    let err = manager.get(&ctx, "b").await.err().unwrap();
    assert!(matches!(err, PluginManagerError::NotRegularFile { path: p } if p == path));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_plugin_directory_is_ignored() {
    let root = PluginRoot::new();
    let elsewhere = TempDir::new().unwrap();
    let target = elsewhere.path().join("linked");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("linked"), "#!/bin/sh\n").unwrap();
    std::os::unix::fs::symlink(&target, root.path().join("linked")).unwrap();
    root.install("real");
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, Vec::new(), Some(root.source()))
        .await
        .unwrap();

    assert_eq!(manager.list(&ctx).await.unwrap(), vec!["real"]);
    assert!(manager.get(&ctx, "linked").await.err().unwrap().is_not_found());
}

#[tokio::test]
async fn test_missing_plugin_root_lists_nothing() {
    let root = PluginRoot::new();
    let source = FsPluginSource::new(SysFs::new(root.path().join("absent")), Arc::new(SelfNaming));
    let ctx = Context::new();

    let manager = UnifiedManager::new(&ctx, vec![in_process("a")], Some(source))
        .await
        .unwrap();

    assert_eq!(manager.list(&ctx).await.unwrap(), vec!["a"]);
    assert!(manager.get(&ctx, "b").await.err().unwrap().is_not_found());
}

#[tokio::test]
async fn test_handles_are_shared_across_tasks() {
    let ctx = Context::new();
    let manager = Arc::new(
        UnifiedManager::new(&ctx, vec![in_process("a")], None)
            .await
            .unwrap(),
    );

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        tasks.push(tokio::spawn(async move {
            let ctx = Context::new();
            let plugin = manager.get(&ctx, "a").await.unwrap();
            description(&plugin).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), IN_PROCESS);
    }
}
