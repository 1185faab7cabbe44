//! Dataset directory assembler.
//!
//! Takes the computed dashboard document plus run metadata and writes the
//! final dataset directory to disk: artifacts first, then `manifest.json`
//! describing them and the inputs they came from.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use dashprep_shared::{
    ArtifactMeta, CURRENT_SCHEMA_VERSION, DashboardData, DashPrepError, DatasetManifest,
    InputProvenance, Result, RunId,
};

use crate::pipeline::EmitSelection;

/// One input table to record provenance for.
#[derive(Debug, Clone)]
pub struct InputSpec {
    /// "personnel" or "projects".
    pub role: String,
    /// Source path.
    pub path: PathBuf,
    /// Data rows read from it.
    pub rows: usize,
}

/// Configuration for dataset assembly.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Run identifier.
    pub run_id: RunId,
    /// Dataset name (directory name under the output root).
    pub name: String,
    /// Root directory for dataset output.
    pub output_root: PathBuf,
    /// Tool version string.
    pub tool_version: String,
    /// Input tables to hash into the manifest.
    pub inputs: Vec<InputSpec>,
    /// Artifacts to emit.
    pub emit: EmitSelection,
}

/// Output from a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Absolute path to the dataset directory.
    pub dataset_path: PathBuf,
    /// The manifest that was written.
    pub manifest: DatasetManifest,
}

/// Assemble a dataset directory:
///
/// ```text
/// <output_root>/<name>/
/// ├── manifest.json
/// ├── dashboard.json   (when JSON emission is selected)
/// └── dataset.ts       (when TypeScript emission is selected)
/// ```
///
/// Rebuilding into an existing directory preserves `created_at` and
/// refreshes `updated_at`.
#[instrument(skip_all, fields(name = %config.name, run_id = %config.run_id))]
pub fn assemble(config: &AssembleConfig, data: &DashboardData) -> Result<AssembleResult> {
    let dataset_dir = config.output_root.join(&config.name);

    info!(path = %dataset_dir.display(), "assembling dataset directory");

    std::fs::create_dir_all(&dataset_dir).map_err(|e| DashPrepError::io(&dataset_dir, e))?;

    // Generate and write selected artifacts.
    let mut artifacts: Vec<ArtifactMeta> = Vec::new();

    if config.emit.json() {
        let json = dashprep_artifacts::render_dashboard_json(data)?;
        artifacts.push(write_artifact(&dataset_dir, "dashboard.json", &json)?);
    }
    if config.emit.ts() {
        let ts = dashprep_artifacts::render_dataset_ts(data);
        artifacts.push(write_artifact(&dataset_dir, "dataset.ts", &ts)?);
    }

    // Build and write the manifest.
    let manifest = build_manifest(config, data, artifacts)?;
    let manifest_path = dataset_dir.join("manifest.json");
    let manifest_json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| DashPrepError::validation(format!("manifest serialization failed: {e}")))?;
    write_atomic(&manifest_path, &manifest_json)?;

    info!(
        artifacts = manifest.artifacts.len(),
        path = %dataset_dir.display(),
        "dataset assembly complete"
    );

    Ok(AssembleResult {
        dataset_path: dataset_dir,
        manifest,
    })
}

/// Verify that a dataset directory is well-formed.
pub fn validate_dataset(dataset_path: &Path) -> Result<()> {
    let manifest_path = dataset_path.join("manifest.json");
    if !manifest_path.exists() {
        return Err(DashPrepError::validation("missing manifest.json"));
    }

    let content = std::fs::read_to_string(&manifest_path)
        .map_err(|e| DashPrepError::io(&manifest_path, e))?;
    let manifest: DatasetManifest = serde_json::from_str(&content)
        .map_err(|e| DashPrepError::validation(format!("invalid manifest.json: {e}")))?;

    if manifest.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(DashPrepError::validation(format!(
            "unsupported schema_version: {} (expected {})",
            manifest.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }

    // Every artifact the manifest lists must exist and hash to its
    // recorded checksum.
    for artifact in &manifest.artifacts {
        let path = dataset_path.join(&artifact.filename);
        let content = std::fs::read_to_string(&path).map_err(|e| DashPrepError::io(&path, e))?;
        if sha256_hex(content.as_bytes()) != artifact.sha256 {
            return Err(DashPrepError::validation(format!(
                "checksum mismatch for {}",
                artifact.filename
            )));
        }
    }

    // When the dashboard document is present it must deserialize.
    let dashboard_path = dataset_path.join("dashboard.json");
    if dashboard_path.exists() {
        let content = std::fs::read_to_string(&dashboard_path)
            .map_err(|e| DashPrepError::io(&dashboard_path, e))?;
        let _: DashboardData = serde_json::from_str(&content)
            .map_err(|e| DashPrepError::validation(format!("invalid dashboard.json: {e}")))?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the dataset manifest, preserving `created_at` across rebuilds.
fn build_manifest(
    config: &AssembleConfig,
    data: &DashboardData,
    artifacts: Vec<ArtifactMeta>,
) -> Result<DatasetManifest> {
    let now = Utc::now();
    let created_at = previous_created_at(&config.output_root.join(&config.name)).unwrap_or(now);

    let mut inputs = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        inputs.push(InputProvenance {
            role: input.role.clone(),
            path: input.path.display().to_string(),
            sha256: sha256_file(&input.path)?,
            rows: input.rows,
        });
    }

    Ok(DatasetManifest {
        schema_version: CURRENT_SCHEMA_VERSION,
        id: config.run_id.clone(),
        name: config.name.clone(),
        tool_version: config.tool_version.clone(),
        created_at,
        updated_at: now,
        researcher_count: data.researchers.len(),
        inputs,
        artifacts,
    })
}

/// `created_at` from an existing manifest, if one is readable.
fn previous_created_at(dataset_dir: &Path) -> Option<chrono::DateTime<Utc>> {
    let content = std::fs::read_to_string(dataset_dir.join("manifest.json")).ok()?;
    let manifest: DatasetManifest = serde_json::from_str(&content).ok()?;
    Some(manifest.created_at)
}

/// Write one artifact atomically and return its metadata.
fn write_artifact(dataset_dir: &Path, filename: &str, content: &str) -> Result<ArtifactMeta> {
    let target = dataset_dir.join(filename);
    write_atomic(&target, content)?;

    debug!(file = filename, size = content.len(), "wrote artifact");

    Ok(ArtifactMeta {
        filename: filename.to_string(),
        sha256: sha256_hex(content.as_bytes()),
        size_bytes: content.len(),
    })
}

/// Write to a temp file in the same directory, then rename into place.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| DashPrepError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| DashPrepError::io(target, e))?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a file's raw bytes, for input provenance.
fn sha256_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DashPrepError::io(path, e))?;
    Ok(sha256_hex(&bytes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
